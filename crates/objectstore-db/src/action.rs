//! Database action-XML generation.
//!
//! Instead of serializing a full document, a database component emits one
//! `<Action type="INSERT|UPDATE|DELETE">` directive wrapping its normal XML
//! representation, for consumption by the downstream batch-update
//! processor. Unchanged components emit nothing for themselves (their
//! children may still have changes); discarded components emit nothing at
//! all.

use objectstore_core::{Element, Error, Result};

use crate::component::{DbComponent, DbIdAllocator};
use crate::relation::RelationContext;
use crate::state::DbState;

/// Tag of one action directive.
pub const ACTION_NODE: &str = "Action";

/// Tag of the container callers collect directives into.
pub const ACTION_LIST_NODE: &str = "Actions";

/// Fresh container for one generation run.
pub fn new_action_root() -> Element {
    Element::new(ACTION_LIST_NODE)
}

/// Append the action directive(s) for one component and its children.
///
/// On first save of an inserted instance, a fresh database id is assigned
/// before the directive is written. An updated or deleted component that
/// never received a database id is a caller contract violation. The
/// `relation` is the context this component itself generates under;
/// composites derive their children's context from it inside
/// [`DbComponent::append_child_actions`].
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(component_type = T::COMPONENT_TYPE)
)]
pub fn append_action<T: DbComponent>(
    component: &mut T,
    ids: &mut DbIdAllocator,
    actions: &mut Element,
    relation: &RelationContext,
) -> Result<()> {
    let state = component.db_state();
    let db_id = match state {
        DbState::Discarded => {
            tracing::debug!("discarded component skipped");
            return Ok(());
        }
        DbState::Unchanged => {
            return component.append_child_actions(ids, actions, relation);
        }
        DbState::Inserted => match component.db_id() {
            Some(id) => id,
            None => {
                let id = ids.next_id();
                component.tracking_mut().assign_db_id(id);
                id
            }
        },
        DbState::Updated | DbState::Deleted => component.db_id().ok_or_else(|| {
            Error::invalid_argument(
                ACTION_NODE,
                format!(
                    "component \"{}\" is marked {state} but was never persisted",
                    T::COMPONENT_TYPE
                ),
            )
        })?,
    };

    if let Some(action_type) = state.action_type() {
        let mut action = Element::new(ACTION_NODE)
            .with_attribute("type", action_type)
            .with_attribute("componentType", T::COMPONENT_TYPE)
            .with_attribute("dbId", db_id.to_string());
        if !relation.is_empty() {
            action.push_element(relation.to_xml());
        }
        action.push_element(component.to_xml());
        actions.push_element(action);
        tracing::debug!(action_type, db_id = db_id.value(), "action appended");
    }

    component.append_child_actions(ids, actions, relation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::DbTracking;
    use objectstore_core::{
        Component, ParentChain, ValidationContext, expect_node, read_id, require_attribute,
    };

    /// Minimal store-backed component for exercising the driver.
    #[derive(Debug, Clone, PartialEq)]
    struct Tag {
        id: i32,
        label: String,
        tracking: DbTracking,
    }

    impl Tag {
        fn new(label: &str) -> Self {
            Self {
                id: 0,
                label: label.to_string(),
                tracking: DbTracking::new(),
            }
        }

        fn set_label(&mut self, label: &str) {
            self.label = label.to_string();
            self.tracking.touch();
        }
    }

    impl Component for Tag {
        const NODE_NAME: &'static str = "PSXTag";

        fn id(&self) -> i32 {
            self.id
        }

        fn set_id(&mut self, id: i32) {
            self.id = id;
        }

        fn from_xml(
            element: &objectstore_core::Element,
            _chain: &mut ParentChain,
        ) -> objectstore_core::Result<Self> {
            expect_node(element, Self::NODE_NAME)?;
            Ok(Self {
                id: read_id(element, Self::NODE_NAME)?,
                label: require_attribute(element, Self::NODE_NAME, "label")?.to_string(),
                tracking: DbTracking::new(),
            })
        }

        fn to_xml(&self) -> Element {
            Element::new(Self::NODE_NAME)
                .with_attribute("id", self.id.to_string())
                .with_attribute("label", self.label.clone())
        }

        fn validate(&self, _ctx: &mut ValidationContext) -> objectstore_core::Result<()> {
            Ok(())
        }
    }

    impl DbComponent for Tag {
        const COMPONENT_TYPE: &'static str = "tag";

        fn tracking(&self) -> &DbTracking {
            &self.tracking
        }

        fn tracking_mut(&mut self) -> &mut DbTracking {
            &mut self.tracking
        }
    }

    #[test]
    fn fresh_component_gets_id_and_insert_action() {
        let mut tag = Tag::new("news");
        let mut ids = DbIdAllocator::new();
        let mut actions = new_action_root();
        append_action(&mut tag, &mut ids, &mut actions, &RelationContext::new()).unwrap();

        assert_eq!(tag.db_id().unwrap().value(), 1);
        let action = actions.first_child().unwrap();
        assert_eq!(action.attribute("type"), Some("INSERT"));
        assert_eq!(action.attribute("componentType"), Some("tag"));
        assert_eq!(action.first_child().unwrap().name(), "PSXTag");
    }

    #[test]
    fn discarded_component_emits_nothing() {
        let mut tag = Tag::new("scratch");
        tag.mark_delete();
        assert_eq!(tag.db_state(), DbState::Discarded);

        let mut ids = DbIdAllocator::new();
        let mut actions = new_action_root();
        append_action(&mut tag, &mut ids, &mut actions, &RelationContext::new()).unwrap();
        assert_eq!(actions.element_count(), 0);
        assert!(tag.db_id().is_none());
    }

    #[test]
    fn loaded_then_modified_emits_update() {
        let mut tag = Tag::new("news");
        let mut ids = DbIdAllocator::new();
        tag.mark_loaded(ids.next_id());
        tag.set_label("olds");

        let mut actions = new_action_root();
        append_action(&mut tag, &mut ids, &mut actions, &RelationContext::new()).unwrap();
        let action = actions.first_child().unwrap();
        assert_eq!(action.attribute("type"), Some("UPDATE"));
    }

    #[test]
    fn unchanged_component_emits_nothing() {
        let mut tag = Tag::new("news");
        let mut ids = DbIdAllocator::new();
        tag.mark_loaded(ids.next_id());

        let mut actions = new_action_root();
        append_action(&mut tag, &mut ids, &mut actions, &RelationContext::new()).unwrap();
        assert_eq!(actions.element_count(), 0);
    }

    #[test]
    fn deleted_loaded_component_emits_delete() {
        let mut tag = Tag::new("news");
        let mut ids = DbIdAllocator::new();
        tag.mark_loaded(ids.next_id());
        tag.mark_delete();
        assert_eq!(tag.db_state(), DbState::Deleted);

        let mut actions = new_action_root();
        append_action(&mut tag, &mut ids, &mut actions, &RelationContext::new()).unwrap();
        let action = actions.first_child().unwrap();
        assert_eq!(action.attribute("type"), Some("DELETE"));
        assert_eq!(action.attribute("dbId"), Some("1"));
    }

    #[test]
    fn generation_is_repeatable_for_inserted_components() {
        // The id is assigned once; a second run reuses it.
        let mut tag = Tag::new("news");
        let mut ids = DbIdAllocator::new();
        let mut actions = new_action_root();
        append_action(&mut tag, &mut ids, &mut actions, &RelationContext::new()).unwrap();
        append_action(&mut tag, &mut ids, &mut actions, &RelationContext::new()).unwrap();
        let dbids: Vec<&str> = actions
            .children_named(ACTION_NODE)
            .filter_map(|a| a.attribute("dbId"))
            .collect();
        assert_eq!(dbids, vec!["1", "1"]);
    }

    #[test]
    fn relation_block_rides_inside_the_action() {
        let mut parent_ids = DbIdAllocator::new();
        let relation = RelationContext::new()
            .for_child("role", Some(parent_ids.next_id()))
            .unwrap();

        let mut tag = Tag::new("member");
        let mut actions = new_action_root();
        append_action(&mut tag, &mut parent_ids, &mut actions, &relation).unwrap();

        let action = actions.first_child().unwrap();
        let rel = action.child_named("Relation").unwrap();
        let key = rel.first_child().unwrap();
        assert_eq!(key.attribute("componentType"), Some("role"));
        assert_eq!(key.attribute("dbId"), Some("1"));
    }
}
