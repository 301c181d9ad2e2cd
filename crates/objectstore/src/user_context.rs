//! User-context replacement value.

use objectstore_core::{
    Ancestor, Component, Element, Error, ParentChain, Result, ValidationContext, ValidationFlow,
    codes, expect_node, read_id, require_child,
};

/// A reference into the requestor's session context, resolved at request
/// time (e.g. `User/Name`).
///
/// ```xml
/// <PSXUserContext id="3"><name>User/Name</name></PSXUserContext>
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserContext {
    id: i32,
    name: String,
}

impl UserContext {
    /// Create a reference to the named session field. The name must be
    /// non-empty; path separators are allowed.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::invalid_argument(
                "PSXUserContext/name",
                "name may not be empty",
            ));
        }
        Ok(Self { id: 0, name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::invalid_argument(
                "PSXUserContext/name",
                "name may not be empty",
            ));
        }
        self.name = name;
        Ok(())
    }
}

impl Component for UserContext {
    const NODE_NAME: &'static str = "PSXUserContext";

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
        let name = require_child(element, Self::NODE_NAME, "name")?.text();
        Ok(Self { id, name })
    }

    fn to_xml(&self) -> Element {
        Element::new(Self::NODE_NAME)
            .with_attribute("id", self.id.to_string())
            .with_element(Element::new("name").with_text(self.name.clone()))
    }

    fn validate(&self, ctx: &mut ValidationContext) -> Result<()> {
        if ctx.begin_validation(Self::NODE_NAME, &self.name) == ValidationFlow::Skip {
            return Ok(());
        }
        if self.name.is_empty() {
            ctx.error(
                Self::NODE_NAME,
                codes::REQUIRED_FIELD_MISSING,
                &[Self::NODE_NAME, "name"],
            )?;
        }
        Ok(())
    }
}
