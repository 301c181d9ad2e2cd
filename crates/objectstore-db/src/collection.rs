//! Ordered container of database components.
//!
//! Differs from the plain component list in one essential way: removing a
//! member does not forget it. A persisted member that is removed still owes
//! the backing store a DELETE action, so it moves to a dropped list and
//! keeps emitting until the batch is generated. Members that were never
//! persisted are discarded on removal and emit nothing.

use objectstore_core::{ComponentList, Element, ParentChain, Result, ValidationContext};

use crate::action::append_action;
use crate::component::{DbComponent, DbIdAllocator};
use crate::relation::RelationContext;

/// Typed container of database components with removal tracking.
#[derive(Debug, Clone, PartialEq)]
pub struct DbComponentList<T> {
    active: ComponentList<T>,
    dropped: Vec<T>,
}

impl<T: DbComponent> DbComponentList<T> {
    /// Create an empty list rooted at the given tag.
    pub fn new(node_name: &'static str) -> Self {
        Self {
            active: ComponentList::new(node_name),
            dropped: Vec::new(),
        }
    }

    pub fn node_name(&self) -> &'static str {
        self.active.node_name()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Append a new member; it keeps its own lifecycle state.
    pub fn push(&mut self, member: T) {
        self.active.push(member);
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.active.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.active.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.active.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.active.iter_mut()
    }

    /// Members removed from the active set but still owing actions.
    pub fn dropped(&self) -> &[T] {
        &self.dropped
    }

    /// Remove the member at `index`, marking it for deletion.
    ///
    /// The member transitions through its own lifecycle (`Deleted` when
    /// persisted, `Discarded` when not) and is retained on the dropped
    /// list so pending DELETE actions survive until generation.
    pub fn remove(&mut self, index: usize) {
        let mut member = self.active.remove(index);
        member.mark_delete();
        self.dropped.push(member);
    }

    /// Parse a list rooted at `node_name`; members come back in their
    /// freshly-constructed state and the dropped list starts empty.
    pub fn from_xml(
        node_name: &'static str,
        element: &Element,
        chain: &mut ParentChain,
    ) -> Result<Self> {
        Ok(Self {
            active: ComponentList::from_xml(node_name, element, chain)?,
            dropped: Vec::new(),
        })
    }

    /// Loader helper: record every member as loaded from the store,
    /// assigning each a row id.
    pub fn mark_all_loaded(&mut self, ids: &mut DbIdAllocator) {
        for member in self.active.iter_mut() {
            let id = ids.next_id();
            member.mark_loaded(id);
        }
    }

    /// Emit the active members only; dropped members are an action-XML
    /// concern, not a document concern.
    pub fn to_xml(&self) -> Element {
        self.active.to_xml()
    }

    /// Validate the active members.
    pub fn validate(&self, ctx: &mut ValidationContext) -> Result<()> {
        self.active.validate(ctx)
    }

    /// Emit actions for every member, active and dropped.
    pub fn append_actions(
        &mut self,
        ids: &mut DbIdAllocator,
        actions: &mut Element,
        relation: &RelationContext,
    ) -> Result<()> {
        for member in self.active.iter_mut() {
            append_action(member, ids, actions, relation)?;
        }
        for member in &mut self.dropped {
            append_action(member, ids, actions, relation)?;
        }
        Ok(())
    }
}
