//! The component contract.
//!
//! Every model entity in the object store implements [`Component`]: parse
//! from an XML element with ancestor tracking, serialize back to an
//! equivalent element, validate against a shared context, and support
//! value-style copy/equality. The free functions in this module are the
//! shared readers components use to enforce their DTD while parsing; each
//! failure mode maps to one distinguishable [`Error`] variant.

use crate::chain::ParentChain;
use crate::error::{Error, Result};
use crate::validation::ValidationContext;
use crate::xml::Element;

/// Contract implemented by every object-store entity.
///
/// `from_xml` is constructor-style: it builds a fresh value rather than
/// mutating one in place, and the compiler guarantees required fields are
/// initialized on every success path. Reloading an existing value is
/// `*slot = T::from_xml(..)?`.
pub trait Component: Clone + PartialEq {
    /// Exact XML root tag for this entity, matched case-sensitively.
    const NODE_NAME: &'static str;

    /// Component id; assigned by the owning document or collection, not
    /// globally unique. `0` means unassigned.
    fn id(&self) -> i32;

    /// Reassign the component id.
    fn set_id(&mut self, id: i32);

    /// Parse from an element whose tag must equal [`Self::NODE_NAME`].
    ///
    /// Implementations push themselves onto `chain` before recursing into
    /// child components; the scope guard restores the chain on every exit
    /// path.
    fn from_xml(element: &Element, chain: &mut ParentChain) -> Result<Self>;

    /// Serialize to an element tagged [`Self::NODE_NAME`], with attributes
    /// and children in the same order `from_xml` consumes them.
    fn to_xml(&self) -> Element;

    /// Validate this component and its children against the context.
    ///
    /// Semantic violations go through the context; only the context decides
    /// whether a reported error escalates into the `Err` arm.
    fn validate(&self, ctx: &mut ValidationContext) -> Result<()>;

    /// Replace this value's state with a field-wise copy of `other`.
    ///
    /// Owned collections are replaced wholesale, never merged.
    fn copy_from(&mut self, other: &Self) {
        *self = other.clone();
    }
}

/// Verify the element's tag matches the expected node name exactly.
pub fn expect_node(element: &Element, expected: &'static str) -> Result<()> {
    if element.name() == expected {
        Ok(())
    } else {
        Err(Error::UnknownNodeType {
            expected,
            found: element.name().to_string(),
        })
    }
}

/// Read a required attribute, distinguishing absence from any other failure.
pub fn require_attribute<'a>(
    element: &'a Element,
    node: &'static str,
    attribute: &'static str,
) -> Result<&'a str> {
    element
        .attribute(attribute)
        .ok_or(Error::MissingAttribute { node, attribute })
}

/// Read a required child element.
pub fn require_child<'a>(
    element: &'a Element,
    node: &'static str,
    child: &'static str,
) -> Result<&'a Element> {
    element
        .child_named(child)
        .ok_or(Error::MissingChild { node, child })
}

/// Read the `id` attribute.
///
/// Absent ids default to `0`; a present-but-unparseable id always raises
/// [`Error::InvalidId`], never a generic number failure.
pub fn read_id(element: &Element, node: &'static str) -> Result<i32> {
    match element.attribute("id") {
        None => Ok(0),
        Some(raw) => raw.parse::<i32>().map_err(|_| Error::InvalidId {
            node,
            value: raw.to_string(),
        }),
    }
}

/// Read an optional boolean attribute.
///
/// Booleans are rendered as the literal strings `"yes"`/`"no"`; an absent
/// attribute (or anything other than `"yes"`) reads as `false`.
pub fn read_bool_attribute(element: &Element, attribute: &str) -> bool {
    element.attribute(attribute) == Some("yes")
}

/// Render a boolean the way the DTDs spell it.
pub fn format_bool(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

/// Parse required integer content of a named child element.
pub fn read_number_child(element: &Element, node: &'static str, child: &'static str) -> Result<i64> {
    let raw = require_child(element, node, child)?.text();
    raw.trim().parse::<i64>().map_err(|_| Error::InvalidNumber {
        node,
        field: child,
        value: raw,
    })
}
