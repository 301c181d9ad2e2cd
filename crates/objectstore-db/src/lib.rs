//! Database-component overlay for the object store.
//!
//! Components whose canonical state lives in a relational store rather
//! than a static XML document get a second serialization path: instead of
//! a full document, they emit insert/update/delete directives for a
//! downstream batch-update processor, driven by a per-instance lifecycle
//! state.
//!
//! # Design Philosophy
//!
//! - **Explicit state, explicit transitions**: [`DbState`] moves only
//!   through [`DbState::on_modify`]/[`DbState::on_delete`]; entities route
//!   setters through [`DbTracking::touch`].
//! - **Nothing for ghosts**: a component discarded before its first save
//!   never reaches the action XML.
//! - **Linkage without round-trips**: nested components are associated
//!   with their owner row through a cloned-per-child [`RelationContext`],
//!   so generation needs no live database access.
//!
//! # Example
//!
//! ```ignore
//! let mut role = Role::new("Editor")?;
//! let mut ids = DbIdAllocator::new();
//! let mut actions = new_action_root();
//! append_action(&mut role, &mut ids, &mut actions, &RelationContext::new())?;
//! // actions now holds <Action type="INSERT" ...> wrapping the role's XML.
//! ```

pub mod action;
pub mod collection;
pub mod component;
pub mod relation;
pub mod state;

pub use action::{ACTION_LIST_NODE, ACTION_NODE, append_action, new_action_root};
pub use collection::DbComponentList;
pub use component::{DbComponent, DbComponentId, DbIdAllocator, DbTracking};
pub use relation::{RELATION_NODE, RelationContext, RelationKey};
pub use state::DbState;
