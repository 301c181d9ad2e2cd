//! Generic ordered container of components.
//!
//! Every "list of X" entity (parameters, rules, properties, subjects) is a
//! [`ComponentList`] of one member type. The member type is a compile-time
//! parameter, so the insertion seam is guarded by the type system; the only
//! runtime check left is rejecting unexpected tags while parsing.
//!
//! Members keep insertion order and are emitted in that order — variants
//! that need diff-stable output (the property set) sort on emission in
//! their own `to_xml`, not here.

use crate::chain::{Ancestor, ParentChain};
use crate::component::{Component, expect_node, read_id};
use crate::error::{Error, Result};
use crate::validation::ValidationContext;
use crate::xml::Element;

/// Ordered, typed container of components.
///
/// The list itself follows the component calling conventions (it pushes
/// itself onto the parent chain, carries an id, serializes to its own root
/// element), but its root tag varies per use, so it is configured at
/// construction rather than through a trait constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentList<T> {
    node_name: &'static str,
    id: i32,
    members: Vec<T>,
}

impl<T: Component> ComponentList<T> {
    /// Create an empty list rooted at the given tag.
    pub fn new(node_name: &'static str) -> Self {
        Self {
            node_name,
            id: 0,
            members: Vec::new(),
        }
    }

    /// Root tag this list serializes under.
    pub fn node_name(&self) -> &'static str {
        self.node_name
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn set_id(&mut self, id: i32) {
        self.id = id;
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Append a member. Member typing is enforced by the signature.
    pub fn push(&mut self, member: T) {
        self.members.push(member);
    }

    /// Insert a member at `index`, shifting later members right.
    pub fn insert(&mut self, index: usize, member: T) {
        self.members.insert(index, member);
    }

    /// Remove and return the member at `index`.
    pub fn remove(&mut self, index: usize) -> T {
        self.members.remove(index)
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.members.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.members.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.members.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.members.iter_mut()
    }

    pub fn clear(&mut self) {
        self.members.clear();
    }

    /// Parse a list rooted at `node_name` whose children are all members.
    ///
    /// Consumes every child element tagged with the member node name, in
    /// document order; any other tag is a structural error.
    pub fn from_xml(
        node_name: &'static str,
        element: &Element,
        chain: &mut ParentChain,
    ) -> Result<Self> {
        expect_node(element, node_name)?;
        let id = read_id(element, node_name)?;
        let mut list = Self {
            node_name,
            id,
            members: Vec::new(),
        };
        let mut scope = chain.push(Ancestor::new(node_name, id));
        for child in element.child_elements() {
            if child.name() == T::NODE_NAME {
                list.members.push(T::from_xml(child, &mut scope)?);
            } else {
                return Err(Error::UnknownNodeType {
                    expected: T::NODE_NAME,
                    found: child.name().to_string(),
                });
            }
        }
        Ok(list)
    }

    /// Re-parse in place: clears existing members, then consumes the
    /// element exactly as [`ComponentList::from_xml`] does.
    pub fn reload(&mut self, element: &Element, chain: &mut ParentChain) -> Result<()> {
        *self = Self::from_xml(self.node_name, element, chain)?;
        Ok(())
    }

    /// Emit the root element with one child per member, in insertion order.
    pub fn to_xml(&self) -> Element {
        let mut root = Element::new(self.node_name);
        if self.id != 0 {
            root.set_attribute("id", self.id.to_string());
        }
        for member in &self.members {
            root.push_element(member.to_xml());
        }
        root
    }

    /// Forward validation to every member unconditionally, inside a pushed
    /// parent scope.
    pub fn validate(&self, ctx: &mut ValidationContext) -> Result<()> {
        let mut scope = ctx.push_parent(Ancestor::new(self.node_name, self.id));
        for member in &self.members {
            member.validate(&mut scope)?;
        }
        Ok(())
    }
}

impl<'a, T> IntoIterator for &'a ComponentList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

impl<T> IntoIterator for ComponentList<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.into_iter()
    }
}
