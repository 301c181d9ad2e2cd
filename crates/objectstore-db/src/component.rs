//! The database-component contract.
//!
//! Extends [`Component`] with the lifecycle tracking a store-backed entity
//! needs: a divergence state, an opaque database id, and a hook for
//! emitting child actions. Entities embed a [`DbTracking`] value and route
//! their setters through [`DbTracking::touch`] so any mutation after load
//! flips the state to updated.

use serde::Serialize;

use objectstore_core::{Component, Element, Result};

use crate::relation::RelationContext;
use crate::state::DbState;

/// Opaque identifier of a component's backing-store row.
///
/// Allocated by [`DbIdAllocator`] on first save; never reused within an
/// allocator's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DbComponentId(u64);

impl DbComponentId {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for DbComponentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Allocates fresh database component ids.
///
/// One allocator per generation run; ids are opaque and only need to be
/// unique within the batch being generated.
#[derive(Debug)]
pub struct DbIdAllocator {
    next: u64,
}

impl DbIdAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next_id(&mut self) -> DbComponentId {
        let id = DbComponentId(self.next);
        self.next += 1;
        id
    }
}

impl Default for DbIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Lifecycle tracking embedded in every database component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbTracking {
    state: DbState,
    db_id: Option<DbComponentId>,
}

impl DbTracking {
    /// Tracking for a freshly constructed (never persisted) object.
    pub fn new() -> Self {
        Self {
            state: DbState::Inserted,
            db_id: None,
        }
    }

    pub fn state(&self) -> DbState {
        self.state
    }

    pub fn db_id(&self) -> Option<DbComponentId> {
        self.db_id
    }

    /// Record a field mutation.
    pub fn touch(&mut self) {
        self.state = self.state.on_modify();
    }

    /// Record a delete request.
    pub fn mark_delete(&mut self) {
        self.state = self.state.on_delete();
    }

    /// Record a successful load from the backing store.
    pub fn mark_loaded(&mut self, id: DbComponentId) {
        self.state = DbState::Unchanged;
        self.db_id = Some(id);
    }

    /// Assign the database id on first save.
    pub fn assign_db_id(&mut self, id: DbComponentId) {
        self.db_id = Some(id);
    }
}

impl Default for DbTracking {
    fn default() -> Self {
        Self::new()
    }
}

/// Contract for components whose canonical state lives in a relational
/// store.
pub trait DbComponent: Component {
    /// Component type discriminator used in action XML and relation keys.
    const COMPONENT_TYPE: &'static str;

    fn tracking(&self) -> &DbTracking;

    fn tracking_mut(&mut self) -> &mut DbTracking;

    fn db_state(&self) -> DbState {
        self.tracking().state()
    }

    fn db_id(&self) -> Option<DbComponentId> {
        self.tracking().db_id()
    }

    /// Request deletion; an inserted object becomes discarded instead.
    fn mark_delete(&mut self) {
        self.tracking_mut().mark_delete();
    }

    /// Record a load from the backing store under the given row id.
    fn mark_loaded(&mut self, id: DbComponentId) {
        self.tracking_mut().mark_loaded(id);
    }

    /// Emit actions for nested database components.
    ///
    /// Composites override this, derive a child relation from their own
    /// component type and database id, and forward to their members. The
    /// default is a leaf: no children, nothing to emit.
    fn append_child_actions(
        &mut self,
        ids: &mut DbIdAllocator,
        actions: &mut Element,
        relation: &RelationContext,
    ) -> Result<()> {
        let _ = (ids, actions, relation);
        Ok(())
    }
}
