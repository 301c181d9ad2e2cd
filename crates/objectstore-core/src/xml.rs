//! Owned XML element tree.
//!
//! The component protocol works against a small in-memory tree rather than a
//! streaming reader: `from_xml` walks children positionally and `to_xml`
//! rebuilds an equivalent tree, so both sides need ordered attributes and
//! ordered children. `quick-xml` is only touched here, at the parse/write
//! boundary; everything above consumes the `Element` API.
//!
//! Attribute order and child order are preserved exactly as parsed, which is
//! what lets `from_xml(to_xml(x))` round-trip structurally.

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::{Error, Result};

/// A child node: either a nested element or a run of character data.
///
/// Character data is stored unescaped; escaping happens only on write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An XML element with ordered attributes and ordered children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    /// Create an empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Tag name of this element.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up an attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Append an attribute, preserving insertion order.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(slot) = self.attributes.iter_mut().find(|(k, _)| *k == name) {
            slot.1 = value;
        } else {
            self.attributes.push((name, value));
        }
    }

    /// Builder-style attribute append.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Ordered attribute pairs.
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Append a child element.
    pub fn push_element(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    /// Append character data.
    pub fn push_text(&mut self, text: impl Into<String>) {
        self.children.push(Node::Text(text.into()));
    }

    /// Builder-style child append.
    pub fn with_element(mut self, child: Element) -> Self {
        self.push_element(child);
        self
    }

    /// Builder-style text append.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.push_text(text);
        self
    }

    /// All children, elements and text runs alike, in document order.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Child elements in document order, skipping text runs.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        })
    }

    /// First child element, if any.
    pub fn first_child(&self) -> Option<&Element> {
        self.child_elements().next()
    }

    /// First child element with the given tag name.
    pub fn child_named(&self, name: &str) -> Option<&Element> {
        self.child_elements().find(|el| el.name == name)
    }

    /// All child elements with the given tag name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.child_elements().filter(move |el| el.name == name)
    }

    /// Concatenated character data directly under this element.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for node in &self.children {
            if let Node::Text(t) = node {
                out.push_str(t);
            }
        }
        out
    }

    /// Text content of the first child element with the given name.
    pub fn child_text(&self, name: &str) -> Option<String> {
        self.child_named(name).map(Element::text)
    }

    /// Number of child elements (text runs excluded).
    pub fn element_count(&self) -> usize {
        self.child_elements().count()
    }

    /// Parse the root element out of an XML document string.
    ///
    /// Leading/trailing whitespace in character data is trimmed, so
    /// indentation never becomes part of the tree.
    #[tracing::instrument(level = "debug", skip(input), fields(len = input.len()))]
    pub fn parse_document(input: &str) -> Result<Element> {
        let mut reader = Reader::from_str(input);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event().map_err(Error::xml)? {
                Event::Start(start) => {
                    let element = element_from_start(&start)?;
                    stack.push(element);
                }
                Event::Empty(start) => {
                    let element = element_from_start(&start)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| Error::Xml("unbalanced end tag".to_string()))?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(text) => {
                    let content = text.unescape().map_err(Error::xml)?;
                    if content.is_empty() {
                        continue;
                    }
                    match stack.last_mut() {
                        Some(parent) => parent.push_text(content.into_owned()),
                        None => {
                            return Err(Error::Xml(
                                "character data outside the document element".to_string(),
                            ));
                        }
                    }
                }
                Event::CData(data) => {
                    let content =
                        String::from_utf8(data.into_inner().into_owned()).map_err(Error::xml)?;
                    match stack.last_mut() {
                        Some(parent) => parent.push_text(content),
                        None => {
                            return Err(Error::Xml(
                                "character data outside the document element".to_string(),
                            ));
                        }
                    }
                }
                Event::Eof => break,
                // Declarations, comments, processing instructions and doctypes
                // carry no model state.
                Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
            }
        }

        if !stack.is_empty() {
            return Err(Error::Xml("unterminated element".to_string()));
        }
        root.ok_or_else(|| Error::Xml("document has no root element".to_string()))
    }

    /// Serialize this element (and its subtree) as an XML fragment.
    pub fn to_xml_string(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        write_element(&mut writer, self)?;
        let bytes = writer.into_inner();
        String::from_utf8(bytes).map_err(Error::xml)
    }

    /// Serialize as a complete document with an XML declaration.
    pub fn to_document_string(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(Error::xml)?;
        write_element(&mut writer, self)?;
        let bytes = writer.into_inner();
        String::from_utf8(bytes).map_err(Error::xml)
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.to_xml_string() {
            Ok(s) => f.write_str(&s),
            Err(_) => Err(std::fmt::Error),
        }
    }
}

fn element_from_start(start: &BytesStart<'_>) -> Result<Element> {
    let name = String::from_utf8(start.name().as_ref().to_vec()).map_err(Error::xml)?;
    let mut element = Element::new(name);
    for attr in start.attributes() {
        let attr = attr.map_err(Error::xml)?;
        let key = String::from_utf8(attr.key.as_ref().to_vec()).map_err(Error::xml)?;
        let value = attr.unescape_value().map_err(Error::xml)?.into_owned();
        element.set_attribute(key, value);
    }
    Ok(element)
}

fn attach(stack: &mut Vec<Element>, root: &mut Option<Element>, element: Element) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => {
            parent.push_element(element);
            Ok(())
        }
        None => {
            if root.is_some() {
                return Err(Error::Xml("multiple root elements".to_string()));
            }
            *root = Some(element);
            Ok(())
        }
    }
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<()> {
    let mut start = BytesStart::new(element.name());
    for (key, value) in element.attributes() {
        start.push_attribute((key.as_str(), value.as_str()));
    }
    writer
        .write_event(Event::Start(start))
        .map_err(Error::xml)?;
    for node in element.children() {
        match node {
            Node::Element(child) => write_element(writer, child)?,
            Node::Text(text) => {
                writer
                    .write_event(Event::Text(BytesText::new(text)))
                    .map_err(Error::xml)?;
            }
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name())))
        .map_err(Error::xml)?;
    Ok(())
}
