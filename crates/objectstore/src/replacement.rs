//! Replacement values and their construction registry.
//!
//! Several entities hold "a value" whose concrete kind is only known from
//! the XML tag: a literal, a user-context reference, and so on. The kinds
//! are dispatched through an explicit registry mapping the discriminator
//! tag to a factory function, built once at first use — never by dynamic
//! type-name loading.

use std::collections::HashMap;
use std::sync::OnceLock;

use objectstore_core::{
    Component, Element, Error, ParentChain, Result, ValidationContext,
};

use crate::literal::{NumericLiteral, TextLiteral};
use crate::user_context::UserContext;

/// A value plugged into a parameter, conditional, or extension argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplacementValue {
    Text(TextLiteral),
    Numeric(NumericLiteral),
    UserContext(UserContext),
}

type Factory = fn(&Element, &mut ParentChain) -> Result<ReplacementValue>;

/// Discriminator-to-factory table, resolved once at startup.
fn registry() -> &'static HashMap<&'static str, Factory> {
    static REGISTRY: OnceLock<HashMap<&'static str, Factory>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut map: HashMap<&'static str, Factory> = HashMap::new();
        map.insert(TextLiteral::NODE_NAME, |el, chain| {
            Ok(ReplacementValue::Text(TextLiteral::from_xml(el, chain)?))
        });
        map.insert(NumericLiteral::NODE_NAME, |el, chain| {
            Ok(ReplacementValue::Numeric(NumericLiteral::from_xml(
                el, chain,
            )?))
        });
        map.insert(UserContext::NODE_NAME, |el, chain| {
            Ok(ReplacementValue::UserContext(UserContext::from_xml(
                el, chain,
            )?))
        });
        map
    })
}

impl ReplacementValue {
    /// Whether a tag names a registered replacement-value kind.
    pub fn is_registered(tag: &str) -> bool {
        registry().contains_key(tag)
    }

    /// Construct the kind named by the element's tag.
    pub fn from_element(element: &Element, chain: &mut ParentChain) -> Result<Self> {
        match registry().get(element.name()) {
            Some(factory) => factory(element, chain),
            None => Err(Error::UnknownNodeType {
                expected: "ReplacementValue",
                found: element.name().to_string(),
            }),
        }
    }

    /// The concrete kind's XML tag.
    pub fn node_name(&self) -> &'static str {
        match self {
            Self::Text(_) => TextLiteral::NODE_NAME,
            Self::Numeric(_) => NumericLiteral::NODE_NAME,
            Self::UserContext(_) => UserContext::NODE_NAME,
        }
    }

    pub fn id(&self) -> i32 {
        match self {
            Self::Text(v) => v.id(),
            Self::Numeric(v) => v.id(),
            Self::UserContext(v) => v.id(),
        }
    }

    pub fn to_xml(&self) -> Element {
        match self {
            Self::Text(v) => v.to_xml(),
            Self::Numeric(v) => v.to_xml(),
            Self::UserContext(v) => v.to_xml(),
        }
    }

    pub fn validate(&self, ctx: &mut ValidationContext) -> Result<()> {
        match self {
            Self::Text(v) => v.validate(ctx),
            Self::Numeric(v) => v.validate(ctx),
            Self::UserContext(v) => v.validate(ctx),
        }
    }

    /// Display form of the value, as used in traces and issue arguments.
    pub fn value_text(&self) -> String {
        match self {
            Self::Text(v) => v.text().to_string(),
            Self::Numeric(v) => v.value().to_string(),
            Self::UserContext(v) => v.name().to_string(),
        }
    }
}

impl From<TextLiteral> for ReplacementValue {
    fn from(v: TextLiteral) -> Self {
        Self::Text(v)
    }
}

impl From<NumericLiteral> for ReplacementValue {
    fn from(v: NumericLiteral) -> Self {
        Self::Numeric(v)
    }
}

impl From<UserContext> for ReplacementValue {
    fn from(v: UserContext) -> Self {
        Self::UserContext(v)
    }
}
