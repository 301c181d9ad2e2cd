//! Foreign-key linkage between nested database components.
//!
//! When a composite emits actions for its children, each child action must
//! be associable with the owner row without a live database round-trip at
//! generation time. The relation context carries that linkage: an ordered
//! set of (component type, database id) keys, cloned and extended per child
//! so siblings never contaminate each other.

use objectstore_core::{Element, Error, Result};

use crate::component::DbComponentId;

/// Root tag of the relation block inside an action.
pub const RELATION_NODE: &str = "Relation";

/// One foreign-key binding: the owning component's type and row id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationKey {
    pub component_type: &'static str,
    pub id: DbComponentId,
}

/// Ordered accumulator of foreign-key bindings, outermost owner first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationContext {
    keys: Vec<RelationKey>,
}

impl RelationContext {
    /// An empty context, used at the root of a generation run.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[RelationKey] {
        &self.keys
    }

    /// Row id bound for a component type, if present.
    pub fn key_for(&self, component_type: &str) -> Option<DbComponentId> {
        self.keys
            .iter()
            .find(|k| k.component_type == component_type)
            .map(|k| k.id)
    }

    /// Derive the context a child component generates under.
    ///
    /// Clones this context and appends the parent's binding. A parent
    /// without an assigned database id, or one whose type is already bound
    /// in the chain, is a caller contract violation — the generator assumes
    /// its caller already established a well-formed structure.
    pub fn for_child(
        &self,
        parent_type: &'static str,
        parent_id: Option<DbComponentId>,
    ) -> Result<Self> {
        let id = parent_id.ok_or_else(|| {
            Error::invalid_argument(
                "RelationContext",
                format!("parent component \"{parent_type}\" has no database id assigned"),
            )
        })?;
        if self.key_for(parent_type).is_some() {
            return Err(Error::invalid_argument(
                "RelationContext",
                format!("component type \"{parent_type}\" is already bound in this relation"),
            ));
        }
        let mut child = self.clone();
        child.keys.push(RelationKey {
            component_type: parent_type,
            id,
        });
        Ok(child)
    }

    /// Serialize as the relation block of an action element.
    pub fn to_xml(&self) -> Element {
        let mut root = Element::new(RELATION_NODE);
        for key in &self.keys {
            root.push_element(
                Element::new("Key")
                    .with_attribute("componentType", key.component_type)
                    .with_attribute("dbId", key.id.to_string()),
            );
        }
        root
    }
}
