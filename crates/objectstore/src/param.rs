//! Request parameters.

use objectstore_core::{
    Ancestor, Component, Element, Error, ParentChain, Result, ValidationContext, ValidationFlow,
    codes, expect_node, is_valid_name, read_id, require_attribute, require_child,
    require_valid_name,
};

use crate::replacement::ReplacementValue;

/// Wrapper element holding a parameter's value.
const DATA_LOCATOR_NODE: &str = "DataLocator";

/// A named parameter bound to a replacement value.
///
/// ```xml
/// <PSXParam name="page">
///   <DataLocator>
///     <PSXTextLiteral id="1"><text>Home</text></PSXTextLiteral>
///   </DataLocator>
/// </PSXParam>
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    id: i32,
    name: String,
    value: ReplacementValue,
}

impl Param {
    /// Create a parameter. The name must satisfy the component naming
    /// rules; the check is eager.
    pub fn new(name: impl Into<String>, value: impl Into<ReplacementValue>) -> Result<Self> {
        let name = name.into();
        require_valid_name("PSXParam/name", &name)?;
        Ok(Self {
            id: 0,
            name,
            value: value.into(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        require_valid_name("PSXParam/name", &name)?;
        self.name = name;
        Ok(())
    }

    pub fn value(&self) -> &ReplacementValue {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<ReplacementValue>) {
        self.value = value.into();
    }
}

impl Component for Param {
    const NODE_NAME: &'static str = "PSXParam";

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
        let locator = require_child(element, Self::NODE_NAME, DATA_LOCATOR_NODE)?;
        let value_el = locator.first_child().ok_or(Error::MissingChild {
            node: Self::NODE_NAME,
            child: "DataLocator value",
        })?;
        let value = ReplacementValue::from_element(value_el, &mut scope)?;

        Ok(Self { id, name, value })
    }

    fn to_xml(&self) -> Element {
        let mut root = Element::new(Self::NODE_NAME);
        if self.id != 0 {
            root.set_attribute("id", self.id.to_string());
        }
        root.set_attribute("name", self.name.clone());
        root.push_element(Element::new(DATA_LOCATOR_NODE).with_element(self.value.to_xml()));
        root
    }

    fn validate(&self, ctx: &mut ValidationContext) -> Result<()> {
        if ctx.begin_validation(Self::NODE_NAME, &self.name) == ValidationFlow::Skip {
            return Ok(());
        }
        if !is_valid_name(&self.name) {
            ctx.error(Self::NODE_NAME, codes::INVALID_NAME, &[&self.name])?;
        }
        let mut scope = ctx.push_parent(Ancestor::new(Self::NODE_NAME, self.id));
        self.value.validate(&mut scope)?;
        Ok(())
    }
}
