//! Error types shared by the object-store crates.
//!
//! The taxonomy mirrors how the protocol distinguishes failures:
//!
//! - **Structural XML errors** (`UnknownNodeType`, `MissingAttribute`,
//!   `MissingChild`, `InvalidId`, `InvalidNumber`, `InvalidAttributeValue`,
//!   `DuplicateName`, `Xml`) are raised by `from_xml` and never caught or
//!   suppressed inside this layer.
//! - **Argument-contract violations** (`InvalidArgument`) are raised eagerly
//!   by setters and constructors, never deferred to validation.
//! - **Semantic validation failures** (`Validation`) are only ever produced
//!   by the validation context itself, when it decides to escalate an
//!   accumulated issue into a hard failure.

use thiserror::Error;

use crate::validation::ValidationFailure;

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the object-store component protocol.
#[derive(Debug, Error)]
pub enum Error {
    /// The element handed to `from_xml` does not carry the expected tag.
    #[error("unknown node type: expected <{expected}>, found <{found}>")]
    UnknownNodeType {
        /// Tag name the component requires.
        expected: &'static str,
        /// Tag name actually present in the document.
        found: String,
    },

    /// A required attribute is absent.
    #[error("<{node}> is missing required attribute \"{attribute}\"")]
    MissingAttribute {
        node: &'static str,
        attribute: &'static str,
    },

    /// A required child element is absent.
    #[error("<{node}> is missing required child <{child}>")]
    MissingChild {
        node: &'static str,
        child: &'static str,
    },

    /// An `id` attribute could not be parsed as an integer.
    ///
    /// Always raised as this variant, never as a generic number failure, so
    /// callers can distinguish a bad id from any other malformed field.
    #[error("<{node}> carries an invalid id \"{value}\"")]
    InvalidId { node: &'static str, value: String },

    /// Numeric element content or attribute content failed to parse.
    #[error("<{node}> field \"{field}\" is not a valid number: \"{value}\"")]
    InvalidNumber {
        node: &'static str,
        field: &'static str,
        value: String,
    },

    /// An enumerated attribute carries a value outside its allowed set.
    #[error("<{node}> attribute \"{attribute}\" has invalid value \"{value}\"")]
    InvalidAttributeValue {
        node: &'static str,
        attribute: &'static str,
        value: String,
    },

    /// A uniqueness rule was violated (duplicate-named member).
    #[error("<{node}> already contains an entry named \"{name}\"")]
    DuplicateName { node: &'static str, name: String },

    /// A setter or constructor rejected its argument.
    #[error("invalid argument for {target}: {reason}")]
    InvalidArgument {
        target: &'static str,
        reason: String,
    },

    /// The validation context escalated an issue into a hard failure.
    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    /// The underlying XML reader or writer failed.
    #[error("malformed XML: {0}")]
    Xml(String),
}

impl Error {
    /// Wrap any reader/writer failure into the XML variant.
    pub fn xml(err: impl std::fmt::Display) -> Self {
        Self::Xml(err.to_string())
    }

    /// Build an argument-contract violation.
    pub fn invalid_argument(target: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            target,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_node_type_names_both_tags() {
        let err = Error::UnknownNodeType {
            expected: "PSXParam",
            found: "PSXProperty".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("PSXParam"));
        assert!(text.contains("PSXProperty"));
    }

    #[test]
    fn invalid_id_carries_offending_value() {
        let err = Error::InvalidId {
            node: "PSXTextLiteral",
            value: "abc".to_string(),
        };
        assert!(err.to_string().contains("abc"));
    }
}
