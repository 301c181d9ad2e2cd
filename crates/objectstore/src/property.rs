//! Named properties and property sets.

use objectstore_core::{
    Ancestor, Component, ComponentList, Element, Error, ParentChain, Result, ValidationContext,
    ValidationFlow, codes, expect_node, format_bool, is_valid_name, read_bool_attribute, read_id,
    require_attribute, require_child, require_valid_name,
};

/// A single name/value pair.
///
/// ```xml
/// <PSXProperty name="sys_community" locked="no"><Value>10</Value></PSXProperty>
/// ```
///
/// A locked property cannot be overridden at lower configuration levels;
/// the flag defaults to unlocked when the attribute is absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    id: i32,
    name: String,
    value: String,
    locked: bool,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        let name = name.into();
        require_valid_name("PSXProperty/name", &name)?;
        Ok(Self {
            id: 0,
            name,
            value: value.into(),
            locked: false,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        require_valid_name("PSXProperty/name", &name)?;
        self.name = name;
        Ok(())
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn locked(&self) -> bool {
        self.locked
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }
}

impl Component for Property {
    const NODE_NAME: &'static str = "PSXProperty";

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
        let locked = read_bool_attribute(element, "locked");
        let _scope = chain.push(Ancestor::new(Self::NODE_NAME, id));
        let value = require_child(element, Self::NODE_NAME, "Value")?.text();
        Ok(Self {
            id,
            name,
            value,
            locked,
        })
    }

    fn to_xml(&self) -> Element {
        Element::new(Self::NODE_NAME)
            .with_attribute("name", self.name.clone())
            .with_attribute("locked", format_bool(self.locked))
            .with_element(Element::new("Value").with_text(self.value.clone()))
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

/// A set of uniquely-named properties.
///
/// Members are kept ordered by name at all times, so serialization is
/// diff-stable regardless of insertion order, and a reload of emitted XML
/// compares equal to the source object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertySet {
    members: ComponentList<Property>,
}

impl PropertySet {
    pub fn new() -> Self {
        Self {
            members: ComponentList::new(Self::NODE_NAME),
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Property> {
        self.members.iter()
    }

    /// Insert a property at its name-ordered position.
    ///
    /// A duplicate name is rejected and the set is left untouched.
    pub fn push(&mut self, property: Property) -> Result<()> {
        match self.position_for(property.name()) {
            Ok(_) => Err(Error::DuplicateName {
                node: Self::NODE_NAME,
                name: property.name().to_string(),
            }),
            Err(index) => {
                self.members.insert(index, property);
                Ok(())
            }
        }
    }

    /// Look up a property by name.
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.position_for(name).ok().and_then(|i| self.members.get(i))
    }

    /// Remove and return the named property, if present.
    pub fn remove(&mut self, name: &str) -> Option<Property> {
        self.position_for(name).ok().map(|i| self.members.remove(i))
    }

    /// `Ok(i)` when the name is at `i`, `Err(i)` with its insertion point
    /// otherwise. Sets are small; a linear scan over the sorted members is
    /// enough.
    fn position_for(&self, name: &str) -> std::result::Result<usize, usize> {
        for (i, p) in self.members.iter().enumerate() {
            match p.name().cmp(name) {
                std::cmp::Ordering::Less => {}
                std::cmp::Ordering::Equal => return Ok(i),
                std::cmp::Ordering::Greater => return Err(i),
            }
        }
        Err(self.members.len())
    }
}

impl Default for PropertySet {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for PropertySet {
    const NODE_NAME: &'static str = "PSXPropertySet";

    fn id(&self) -> i32 {
        self.members.id()
    }

    fn set_id(&mut self, id: i32) {
        self.members.set_id(id);
    }

    fn from_xml(element: &Element, chain: &mut ParentChain) -> Result<Self> {
        let parsed = ComponentList::<Property>::from_xml(Self::NODE_NAME, element, chain)?;
        let id = parsed.id();
        let mut set = Self::new();
        set.set_id(id);
        for property in parsed {
            set.push(property)?;
        }
        Ok(set)
    }

    fn to_xml(&self) -> Element {
        self.members.to_xml()
    }

    fn validate(&self, ctx: &mut ValidationContext) -> Result<()> {
        self.members.validate(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn members_are_ordered_by_name_regardless_of_insertion() {
        let mut set = PropertySet::new();
        set.push(Property::new("zeta", "1").unwrap()).unwrap();
        set.push(Property::new("alpha", "2").unwrap()).unwrap();
        set.push(Property::new("mid", "3").unwrap()).unwrap();
        let names: Vec<&str> = set.iter().map(Property::name).collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn duplicate_names_are_rejected_and_set_is_untouched() {
        let mut set = PropertySet::new();
        set.push(Property::new("alpha", "1").unwrap()).unwrap();
        let err = set.push(Property::new("alpha", "2").unwrap()).unwrap_err();
        assert!(matches!(err, Error::DuplicateName { .. }));
        assert_eq!(set.len(), 1);
        assert_eq!(set.property("alpha").unwrap().value(), "1");
    }

    #[test]
    fn round_trips_including_locked_flag() {
        let mut set = PropertySet::new();
        let mut locked = Property::new("sys_community", "10").unwrap();
        locked.set_locked(true);
        set.push(locked).unwrap();
        set.push(Property::new("sys_lang", "en-us").unwrap()).unwrap();

        let back = PropertySet::from_xml(&set.to_xml(), &mut ParentChain::new()).unwrap();
        assert_eq!(set, back);
        assert!(back.property("sys_community").unwrap().locked());
        assert!(!back.property("sys_lang").unwrap().locked());
    }

    #[test]
    fn duplicate_names_in_xml_are_rejected() {
        let doc = "<PSXPropertySet>\
            <PSXProperty name=\"a\" locked=\"no\"><Value>1</Value></PSXProperty>\
            <PSXProperty name=\"a\" locked=\"no\"><Value>2</Value></PSXProperty>\
            </PSXPropertySet>";
        let el = Element::parse_document(doc).unwrap();
        let err = PropertySet::from_xml(&el, &mut ParentChain::new()).unwrap_err();
        assert!(matches!(err, Error::DuplicateName { .. }));
    }

    #[test]
    fn remove_returns_the_member() {
        let mut set = PropertySet::new();
        set.push(Property::new("alpha", "1").unwrap()).unwrap();
        let removed = set.remove("alpha").unwrap();
        assert_eq!(removed.value(), "1");
        assert!(set.is_empty());
        assert!(set.remove("alpha").is_none());
    }
}
