//! Literal replacement values.
//!
//! Literals are the simplest replacement values: a fixed piece of text or
//! a fixed number, resolved to itself at request time.

use objectstore_core::{
    Ancestor, Component, Element, ParentChain, Result, ValidationContext, expect_node, read_id,
    read_number_child, require_child,
};

/// A fixed text value.
///
/// ```xml
/// <PSXTextLiteral id="1"><text>Home</text></PSXTextLiteral>
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextLiteral {
    id: i32,
    text: String,
}

impl TextLiteral {
    /// Create a literal with the given text. Empty text is legal.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: 0,
            text: text.into(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}

impl Component for TextLiteral {
    const NODE_NAME: &'static str = "PSXTextLiteral";

    fn id(&self) -> i32 {
        self.id
    }

    fn set_id(&mut self, id: i32) {
        self.id = id;
    }

    fn from_xml(element: &Element, chain: &mut ParentChain) -> Result<Self> {
        expect_node(element, Self::NODE_NAME)?;
        let id = read_id(element, Self::NODE_NAME)?;
        let _scope = chain.push(Ancestor::new(Self::NODE_NAME, id));
        let text = require_child(element, Self::NODE_NAME, "text")?.text();
        Ok(Self { id, text })
    }

    fn to_xml(&self) -> Element {
        Element::new(Self::NODE_NAME)
            .with_attribute("id", self.id.to_string())
            .with_element(Element::new("text").with_text(self.text.clone()))
    }

    fn validate(&self, ctx: &mut ValidationContext) -> Result<()> {
        // No required fields beyond structure; empty text is a legal literal.
        let _ = ctx.begin_validation(Self::NODE_NAME, &self.text);
        Ok(())
    }
}

/// A fixed numeric value.
///
/// ```xml
/// <PSXNumericLiteral id="2"><number>42</number></PSXNumericLiteral>
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NumericLiteral {
    id: i32,
    value: i64,
}

impl NumericLiteral {
    pub fn new(value: i64) -> Self {
        Self { id: 0, value }
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn set_value(&mut self, value: i64) {
        self.value = value;
    }
}

impl Component for NumericLiteral {
    const NODE_NAME: &'static str = "PSXNumericLiteral";

    fn id(&self) -> i32 {
        self.id
    }

    fn set_id(&mut self, id: i32) {
        self.id = id;
    }

    fn from_xml(element: &Element, chain: &mut ParentChain) -> Result<Self> {
        expect_node(element, Self::NODE_NAME)?;
        let id = read_id(element, Self::NODE_NAME)?;
        let _scope = chain.push(Ancestor::new(Self::NODE_NAME, id));
        let value = read_number_child(element, Self::NODE_NAME, "number")?;
        Ok(Self { id, value })
    }

    fn to_xml(&self) -> Element {
        Element::new(Self::NODE_NAME)
            .with_attribute("id", self.id.to_string())
            .with_element(Element::new("number").with_text(self.value.to_string()))
    }

    fn validate(&self, ctx: &mut ValidationContext) -> Result<()> {
        let _ = ctx.begin_validation(Self::NODE_NAME, &self.value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use objectstore_core::Error;

    #[test]
    fn text_literal_round_trips() {
        let mut lit = TextLiteral::new("Home");
        lit.set_id(1);
        let xml = lit.to_xml();
        let back = TextLiteral::from_xml(&xml, &mut ParentChain::new()).unwrap();
        assert_eq!(lit, back);
    }

    #[test]
    fn text_child_is_required() {
        let el = Element::parse_document("<PSXTextLiteral id=\"1\"/>").unwrap();
        let err = TextLiteral::from_xml(&el, &mut ParentChain::new()).unwrap_err();
        assert!(matches!(err, Error::MissingChild { .. }));
    }

    #[test]
    fn numeric_literal_rejects_non_numbers() {
        let el = Element::parse_document(
            "<PSXNumericLiteral><number>forty-two</number></PSXNumericLiteral>",
        )
        .unwrap();
        let err = NumericLiteral::from_xml(&el, &mut ParentChain::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidNumber { .. }));
    }

    #[test]
    fn copy_from_replaces_state() {
        let mut a = TextLiteral::new("old");
        let b = TextLiteral::new("new");
        a.copy_from(&b);
        assert_eq!(a, b);
    }
}
