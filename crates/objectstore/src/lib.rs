//! Object-store entity classes.
//!
//! This is the **facade crate** for the workspace: it pulls the component
//! contract from `objectstore-core`, the store-backed lifecycle from
//! `objectstore-db`, and implements the concrete configuration entities a
//! content server's object store is made of — parameters, literals,
//! conditionals, properties, extension calls, workflow metadata, roles and
//! subjects.
//!
//! Every entity follows the same four-part contract: `from_xml` against an
//! exact DTD tag with ancestor tracking, `to_xml` as the exact inverse,
//! `validate` against a shared context, and value-style copy/equality.
//!
//! # Example
//!
//! ```
//! use objectstore::prelude::*;
//!
//! let doc = "<PSXParam name=\"page\"><DataLocator>\
//!     <PSXTextLiteral id=\"1\"><text>Home</text></PSXTextLiteral>\
//!     </DataLocator></PSXParam>";
//! let element = Element::parse_document(doc)?;
//! let param = Param::from_xml(&element, &mut ParentChain::new())?;
//! assert_eq!(param.name(), "page");
//! assert_eq!(param.value().value_text(), "Home");
//! # Ok::<(), objectstore::Error>(())
//! ```

pub mod conditional;
pub mod extension;
pub mod literal;
pub mod param;
pub mod property;
pub mod replacement;
pub mod role;
pub mod user_context;
pub mod workflow;

pub use conditional::{BoolOp, Conditional, ConditionalOp};
pub use extension::{ExtensionCall, ExtensionParamValue};
pub use literal::{NumericLiteral, TextLiteral};
pub use param::Param;
pub use property::{Property, PropertySet};
pub use replacement::ReplacementValue;
pub use role::{Role, Subject, SubjectKind};
pub use user_context::UserContext;
pub use workflow::{WorkflowInfo, WorkflowKind};

// Re-export the protocol layers so applications depend on one crate.
pub use objectstore_core::{
    Ancestor, Component, ComponentList, Element, Error, Node, ParentChain, Result, Severity,
    ValidationContext, ValidationFailure, ValidationFlow, ValidationIssue, ValidationOptions,
    ValidationReport, codes, run_validation,
};
pub use objectstore_db::{
    ACTION_LIST_NODE, ACTION_NODE, DbComponent, DbComponentId, DbComponentList, DbIdAllocator,
    DbState, DbTracking, RELATION_NODE, RelationContext, RelationKey, append_action,
    new_action_root,
};

/// Common imports for working with object-store entities.
pub mod prelude {
    pub use crate::conditional::{BoolOp, Conditional, ConditionalOp};
    pub use crate::extension::{ExtensionCall, ExtensionParamValue};
    pub use crate::literal::{NumericLiteral, TextLiteral};
    pub use crate::param::Param;
    pub use crate::property::{Property, PropertySet};
    pub use crate::replacement::ReplacementValue;
    pub use crate::role::{Role, Subject, SubjectKind};
    pub use crate::user_context::UserContext;
    pub use crate::workflow::{WorkflowInfo, WorkflowKind};

    pub use objectstore_core::{
        Component, ComponentList, Element, ParentChain, ValidationContext, ValidationFlow,
        ValidationOptions, run_validation,
    };
    pub use objectstore_db::{
        DbComponent, DbComponentList, DbIdAllocator, DbState, RelationContext, append_action,
        new_action_root,
    };
}
