//! Extension calls.
//!
//! An extension call names a server-side extension by its full reference
//! (e.g. `Java/global/makeLink`) and binds an ordered list of argument
//! values. Arguments are wrapped one level so each carries its own id and
//! can hold any registered replacement value.

use objectstore_core::{
    Ancestor, Component, ComponentList, Element, Error, ParentChain, Result, ValidationContext,
    ValidationFlow, codes, expect_node, matches_pattern, read_id, require_attribute,
};

use crate::replacement::ReplacementValue;

/// Pattern an extension reference must satisfy: path segments of word
/// characters separated by `/`.
const EXTENSION_REF_PATTERN: &str = r"^[A-Za-z][A-Za-z0-9_\-]*(/[A-Za-z0-9_\-]+)*$";

/// Wrapper element holding the ordered argument list.
const PARAMS_NODE: &str = "ExtensionParams";

/// One argument slot of an extension call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionParamValue {
    id: i32,
    value: ReplacementValue,
}

impl ExtensionParamValue {
    pub fn new(value: impl Into<ReplacementValue>) -> Self {
        Self {
            id: 0,
            value: value.into(),
        }
    }

    pub fn value(&self) -> &ReplacementValue {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<ReplacementValue>) {
        self.value = value.into();
    }
}

impl Component for ExtensionParamValue {
    const NODE_NAME: &'static str = "PSXExtensionParamValue";

    fn id(&self) -> i32 {
        self.id
    }

    fn set_id(&mut self, id: i32) {
        self.id = id;
    }

    fn from_xml(element: &Element, chain: &mut ParentChain) -> Result<Self> {
        expect_node(element, Self::NODE_NAME)?;
        let id = read_id(element, Self::NODE_NAME)?;
        let mut scope = chain.push(Ancestor::new(Self::NODE_NAME, id));
        let inner = element.first_child().ok_or(Error::MissingChild {
            node: Self::NODE_NAME,
            child: "ReplacementValue",
        })?;
        let value = ReplacementValue::from_element(inner, &mut scope)?;
        Ok(Self { id, value })
    }

    fn to_xml(&self) -> Element {
        Element::new(Self::NODE_NAME)
            .with_attribute("id", self.id.to_string())
            .with_element(self.value.to_xml())
    }

    fn validate(&self, ctx: &mut ValidationContext) -> Result<()> {
        if ctx.begin_validation(Self::NODE_NAME, &self.value.value_text()) == ValidationFlow::Skip
        {
            return Ok(());
        }
        let mut scope = ctx.push_parent(Ancestor::new(Self::NODE_NAME, self.id));
        self.value.validate(&mut scope)?;
        Ok(())
    }
}

/// A call to a named server extension with ordered arguments.
///
/// ```xml
/// <PSXExtensionCall id="0" name="Java/global/makeLink">
///   <ExtensionParams>
///     <PSXExtensionParamValue id="0">
///       <PSXTextLiteral id="1"><text>index</text></PSXTextLiteral>
///     </PSXExtensionParamValue>
///   </ExtensionParams>
/// </PSXExtensionCall>
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ExtensionCall {
    id: i32,
    name: String,
    params: ComponentList<ExtensionParamValue>,
}

impl ExtensionCall {
    /// Create a call to the named extension; the reference is checked
    /// eagerly.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        Self::check_ref(&name)?;
        Ok(Self {
            id: 0,
            name,
            params: ComponentList::new(PARAMS_NODE),
        })
    }

    fn check_ref(name: &str) -> Result<()> {
        if matches_pattern(name, EXTENSION_REF_PATTERN) {
            Ok(())
        } else {
            Err(Error::invalid_argument(
                "PSXExtensionCall/name",
                format!("\"{name}\" is not a valid extension reference"),
            ))
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        Self::check_ref(&name)?;
        self.name = name;
        Ok(())
    }

    /// Append an argument value.
    pub fn push_param(&mut self, param: ExtensionParamValue) {
        self.params.push(param);
    }

    pub fn params(&self) -> &ComponentList<ExtensionParamValue> {
        &self.params
    }
}

impl Component for ExtensionCall {
    const NODE_NAME: &'static str = "PSXExtensionCall";

    fn id(&self) -> i32 {
        self.id
    }

    fn set_id(&mut self, id: i32) {
        self.id = id;
    }

    fn from_xml(element: &Element, chain: &mut ParentChain) -> Result<Self> {
        expect_node(element, Self::NODE_NAME)?;
        let id = read_id(element, Self::NODE_NAME)?;
        let name = require_attribute(element, Self::NODE_NAME, "name")?.to_string();

        let mut scope = chain.push(Ancestor::new(Self::NODE_NAME, id));
        let params = match element.child_named(PARAMS_NODE) {
            Some(wrapper) => ComponentList::from_xml(PARAMS_NODE, wrapper, &mut scope)?,
            None => ComponentList::new(PARAMS_NODE),
        };

        Ok(Self { id, name, params })
    }

    fn to_xml(&self) -> Element {
        Element::new(Self::NODE_NAME)
            .with_attribute("id", self.id.to_string())
            .with_attribute("name", self.name.clone())
            .with_element(self.params.to_xml())
    }

    fn validate(&self, ctx: &mut ValidationContext) -> Result<()> {
        if ctx.begin_validation(Self::NODE_NAME, &self.name) == ValidationFlow::Skip {
            return Ok(());
        }
        if Self::check_ref(&self.name).is_err() {
            ctx.error(Self::NODE_NAME, codes::INVALID_NAME, &[&self.name])?;
        }
        let mut scope = ctx.push_parent(Ancestor::new(Self::NODE_NAME, self.id));
        self.params.validate(&mut scope)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literal::{NumericLiteral, TextLiteral};

    #[test]
    fn round_trips_with_and_without_params() {
        let mut call = ExtensionCall::new("Java/global/makeLink").unwrap();
        call.push_param(ExtensionParamValue::new(TextLiteral::new("index")));
        call.push_param(ExtensionParamValue::new(NumericLiteral::new(7)));
        let back = ExtensionCall::from_xml(&call.to_xml(), &mut ParentChain::new()).unwrap();
        assert_eq!(call, back);

        let bare = ExtensionCall::new("local/noop").unwrap();
        let back = ExtensionCall::from_xml(&bare.to_xml(), &mut ParentChain::new()).unwrap();
        assert_eq!(bare, back);
    }

    #[test]
    fn params_keep_insertion_order() {
        let mut call = ExtensionCall::new("local/concat").unwrap();
        call.push_param(ExtensionParamValue::new(TextLiteral::new("b")));
        call.push_param(ExtensionParamValue::new(TextLiteral::new("a")));
        let back = ExtensionCall::from_xml(&call.to_xml(), &mut ParentChain::new()).unwrap();
        let texts: Vec<String> = back.params().iter().map(|p| p.value().value_text()).collect();
        assert_eq!(texts, vec!["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn malformed_reference_is_rejected_eagerly() {
        assert!(ExtensionCall::new("Java//global").is_err());
        assert!(ExtensionCall::new("/leading").is_err());
        assert!(ExtensionCall::new("spaces are bad").is_err());
    }

    #[test]
    fn foreign_member_tag_is_rejected() {
        let doc = "<PSXExtensionCall id=\"0\" name=\"local/noop\">\
            <ExtensionParams><PSXProperty name=\"a\"><Value>1</Value></PSXProperty></ExtensionParams>\
            </PSXExtensionCall>";
        let el = Element::parse_document(doc).unwrap();
        let err = ExtensionCall::from_xml(&el, &mut ParentChain::new()).unwrap_err();
        assert!(matches!(err, Error::UnknownNodeType { .. }));
    }
}
