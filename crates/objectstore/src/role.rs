//! Roles and their member subjects.
//!
//! Both entities are store-backed: besides their document XML they emit
//! insert/update/delete directives, and a role's subjects are linked to the
//! owning role row through the relation context at generation time.

use objectstore_core::{
    Ancestor, Component, Element, Error, ParentChain, Result, ValidationContext, ValidationFlow,
    codes, expect_node, is_valid_name, read_id, require_attribute, require_valid_name,
};
use objectstore_db::{
    DbComponent, DbComponentList, DbIdAllocator, DbTracking, RelationContext,
};

use crate::property::{Property, PropertySet};

/// Whether a subject names a single user or a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubjectKind {
    #[default]
    User,
    Group,
}

impl SubjectKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Group => "group",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "user" => Some(Self::User),
            "group" => Some(Self::Group),
            _ => None,
        }
    }
}

/// A member of a role.
///
/// ```xml
/// <PSXSubject id="0" name="editor1" type="user"/>
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    id: i32,
    name: String,
    kind: SubjectKind,
    tracking: DbTracking,
}

impl Subject {
    pub fn new(name: impl Into<String>, kind: SubjectKind) -> Result<Self> {
        let name = name.into();
        require_valid_name("PSXSubject/name", &name)?;
        Ok(Self {
            id: 0,
            name,
            kind,
            tracking: DbTracking::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        require_valid_name("PSXSubject/name", &name)?;
        self.name = name;
        self.tracking.touch();
        Ok(())
    }

    pub fn kind(&self) -> SubjectKind {
        self.kind
    }

    pub fn set_kind(&mut self, kind: SubjectKind) {
        self.kind = kind;
        self.tracking.touch();
    }
}

impl Component for Subject {
    const NODE_NAME: &'static str = "PSXSubject";

    fn id(&self) -> i32 {
        self.id
    }

    fn set_id(&mut self, id: i32) {
        self.id = id;
    }

    fn from_xml(element: &Element, _chain: &mut ParentChain) -> Result<Self> {
        expect_node(element, Self::NODE_NAME)?;
        let id = read_id(element, Self::NODE_NAME)?;
        let name = require_attribute(element, Self::NODE_NAME, "name")?.to_string();
        let raw_kind = require_attribute(element, Self::NODE_NAME, "type")?;
        let kind = SubjectKind::parse(raw_kind).ok_or_else(|| Error::InvalidAttributeValue {
            node: Self::NODE_NAME,
            attribute: "type",
            value: raw_kind.to_string(),
        })?;
        Ok(Self {
            id,
            name,
            kind,
            tracking: DbTracking::new(),
        })
    }

    fn to_xml(&self) -> Element {
        Element::new(Self::NODE_NAME)
            .with_attribute("id", self.id.to_string())
            .with_attribute("name", self.name.clone())
            .with_attribute("type", self.kind.as_str())
    }

    fn validate(&self, ctx: &mut ValidationContext) -> Result<()> {
        if ctx.begin_validation(Self::NODE_NAME, &self.name) == ValidationFlow::Skip {
            return Ok(());
        }
        if !is_valid_name(&self.name) {
            ctx.error(Self::NODE_NAME, codes::INVALID_NAME, &[&self.name])?;
        }
        Ok(())
    }
}

impl DbComponent for Subject {
    const COMPONENT_TYPE: &'static str = "subject";

    fn tracking(&self) -> &DbTracking {
        &self.tracking
    }

    fn tracking_mut(&mut self) -> &mut DbTracking {
        &mut self.tracking
    }
}

/// Wrapper element holding a role's subjects.
const SUBJECTS_NODE: &str = "Subjects";

/// A named role with attribute properties and member subjects.
///
/// ```xml
/// <PSXRole id="0" name="Editor">
///   <PSXPropertySet>...</PSXPropertySet>
///   <Subjects>
///     <PSXSubject id="0" name="editor1" type="user"/>
///   </Subjects>
/// </PSXRole>
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Role {
    id: i32,
    name: String,
    attributes: PropertySet,
    subjects: DbComponentList<Subject>,
    tracking: DbTracking,
}

impl Role {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        require_valid_name("PSXRole/name", &name)?;
        Ok(Self {
            id: 0,
            name,
            attributes: PropertySet::new(),
            subjects: DbComponentList::new(SUBJECTS_NODE),
            tracking: DbTracking::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        require_valid_name("PSXRole/name", &name)?;
        self.name = name;
        self.tracking.touch();
        Ok(())
    }

    pub fn attributes(&self) -> &PropertySet {
        &self.attributes
    }

    /// Set an attribute property; the role row owns its attributes, so
    /// this counts as a role mutation.
    pub fn set_attribute(&mut self, property: Property) -> Result<()> {
        self.attributes.remove(property.name());
        self.attributes.push(property)?;
        self.tracking.touch();
        Ok(())
    }

    pub fn subjects(&self) -> &DbComponentList<Subject> {
        &self.subjects
    }

    pub fn subjects_mut(&mut self) -> &mut DbComponentList<Subject> {
        &mut self.subjects
    }

    pub fn add_subject(&mut self, subject: Subject) {
        self.subjects.push(subject);
    }

    /// Remove the subject at `index`, keeping its pending delete action.
    pub fn remove_subject(&mut self, index: usize) {
        self.subjects.remove(index);
    }
}

impl Component for Role {
    const NODE_NAME: &'static str = "PSXRole";

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
        let attributes = match element.child_named(PropertySet::NODE_NAME) {
            Some(el) => PropertySet::from_xml(el, &mut scope)?,
            None => PropertySet::new(),
        };
        let subjects = match element.child_named(SUBJECTS_NODE) {
            Some(el) => DbComponentList::from_xml(SUBJECTS_NODE, el, &mut scope)?,
            None => DbComponentList::new(SUBJECTS_NODE),
        };

        Ok(Self {
            id,
            name,
            attributes,
            subjects,
            tracking: DbTracking::new(),
        })
    }

    fn to_xml(&self) -> Element {
        Element::new(Self::NODE_NAME)
            .with_attribute("id", self.id.to_string())
            .with_attribute("name", self.name.clone())
            .with_element(self.attributes.to_xml())
            .with_element(self.subjects.to_xml())
    }

    fn validate(&self, ctx: &mut ValidationContext) -> Result<()> {
        if ctx.begin_validation(Self::NODE_NAME, &self.name) == ValidationFlow::Skip {
            return Ok(());
        }
        if !is_valid_name(&self.name) {
            ctx.error(Self::NODE_NAME, codes::INVALID_NAME, &[&self.name])?;
        }
        let mut scope = ctx.push_parent(Ancestor::new(Self::NODE_NAME, self.id));
        self.attributes.validate(&mut scope)?;
        self.subjects.validate(&mut scope)?;
        Ok(())
    }
}

impl DbComponent for Role {
    const COMPONENT_TYPE: &'static str = "role";

    fn tracking(&self) -> &DbTracking {
        &self.tracking
    }

    fn tracking_mut(&mut self) -> &mut DbTracking {
        &mut self.tracking
    }

    fn append_child_actions(
        &mut self,
        ids: &mut DbIdAllocator,
        actions: &mut Element,
        relation: &RelationContext,
    ) -> Result<()> {
        if self.subjects.is_empty() && self.subjects.dropped().is_empty() {
            return Ok(());
        }
        tracing::debug!(
            role = %self.name,
            subjects = self.subjects.len(),
            dropped = self.subjects.dropped().len(),
            "generating subject actions"
        );
        let child_relation = relation.for_child(Self::COMPONENT_TYPE, self.db_id())?;
        self.subjects.append_actions(ids, actions, &child_relation)
    }
}
