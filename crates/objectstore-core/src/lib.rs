//! Core contract and protocol for the object store.
//!
//! `objectstore-core` is the **foundation layer** for the workspace. It
//! defines the component contract and the two pieces of shared mutable
//! state the protocol threads through deep recursion.
//!
//! # Role In The Architecture
//!
//! - **Contract layer**: [`Component`] is the trait every model entity
//!   implements — parse from XML, serialize back, validate, copy.
//! - **Traversal state**: [`ParentChain`] tracks structural ancestry during
//!   parsing; [`ValidationContext`] accumulates issues during the separate
//!   validation pass. Both are owned stacks passed by `&mut` borrow and
//!   kept balanced by RAII scope guards.
//! - **Data model**: [`Element`] is the owned XML tree both directions of
//!   serialization work against; [`ComponentList`] is the generic ordered
//!   container behind every "list of X" entity.
//!
//! # Who Uses This Crate
//!
//! - `objectstore-db` layers the database-component lifecycle and action
//!   generation on top of [`Component`].
//! - `objectstore` (the facade) implements the concrete entity classes.
//!
//! Everything here is single-threaded and synchronous: the chain and the
//! context are threaded through one call chain at a time, and the borrow
//! checker keeps them out of concurrent passes.

pub mod chain;
pub mod collection;
pub mod component;
pub mod error;
pub mod names;
pub mod validation;
pub mod xml;

pub use chain::{Ancestor, ChainScope, ParentChain};
pub use collection::ComponentList;
pub use component::{
    Component, expect_node, format_bool, read_bool_attribute, read_id, read_number_child,
    require_attribute, require_child,
};
pub use error::{Error, Result};
pub use names::{is_valid_name, matches_pattern, require_valid_name};
pub use validation::{
    Severity, ValidationContext, ValidationFailure, ValidationFlow, ValidationIssue,
    ValidationOptions, ValidationReport, ValidationScope, codes, run_validation,
};
pub use xml::{Element, Node};
