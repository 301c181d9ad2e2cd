//! Ancestor tracking for the `from_xml` recursion.
//!
//! While a component tree is being parsed, each frame needs to know its
//! structural ancestry without the components holding permanent
//! back-references. The chain is an explicit stack passed down by `&mut`
//! borrow; it is a traversal aid, not an ownership relation, and is thrown
//! away once parsing completes.
//!
//! Balance is the load-bearing invariant: the chain's length equals the
//! recursion depth at every point, and every push is undone when the frame
//! that pushed it exits, success or error. `push` therefore hands back a
//! [`ChainScope`] guard that truncates the chain to its pre-push length on
//! drop, so an early `?` return can never leave a stale ancestor behind for
//! sibling processing to trip over.

use std::ops::{Deref, DerefMut};

/// Lightweight descriptor of one ancestor component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ancestor {
    /// XML node name of the ancestor.
    pub node_name: &'static str,
    /// Component id of the ancestor (0 when unassigned).
    pub id: i32,
}

impl Ancestor {
    pub fn new(node_name: &'static str, id: i32) -> Self {
        Self { node_name, id }
    }
}

/// Stack of ancestor descriptors, document root first.
#[derive(Debug, Default)]
pub struct ParentChain {
    entries: Vec<Ancestor>,
}

impl ParentChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current recursion depth.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The immediate parent of the node currently being parsed.
    pub fn parent(&self) -> Option<&Ancestor> {
        self.entries.last()
    }

    /// Ancestors from document root to immediate parent.
    pub fn ancestors(&self) -> impl Iterator<Item = &Ancestor> {
        self.entries.iter()
    }

    /// Nearest enclosing ancestor with the given node name, if any.
    pub fn nearest(&self, node_name: &str) -> Option<&Ancestor> {
        self.entries
            .iter()
            .rev()
            .find(|a| a.node_name == node_name)
    }

    /// Push an ancestor for the duration of a child recursion.
    ///
    /// The returned guard derefs to the chain, so child `from_xml` calls
    /// take `&mut scope` directly. Dropping the guard truncates back to the
    /// pre-push length, which also cleans up after any nested pushes a
    /// panicking or erroring callee failed to unwind itself.
    pub fn push(&mut self, ancestor: Ancestor) -> ChainScope<'_> {
        let restore_len = self.entries.len();
        self.entries.push(ancestor);
        ChainScope {
            chain: self,
            restore_len,
        }
    }
}

/// Guard returned by [`ParentChain::push`]; restores the pre-push length on
/// drop.
#[derive(Debug)]
pub struct ChainScope<'a> {
    chain: &'a mut ParentChain,
    restore_len: usize,
}

impl Deref for ChainScope<'_> {
    type Target = ParentChain;

    fn deref(&self) -> &ParentChain {
        self.chain
    }
}

impl DerefMut for ChainScope<'_> {
    fn deref_mut(&mut self) -> &mut ParentChain {
        self.chain
    }
}

impl Drop for ChainScope<'_> {
    fn drop(&mut self) {
        self.chain.entries.truncate(self.restore_len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drop_restore_length() {
        let mut chain = ParentChain::new();
        {
            let mut scope = chain.push(Ancestor::new("PSXRole", 1));
            assert_eq!(scope.len(), 1);
            {
                let inner = scope.push(Ancestor::new("PSXPropertySet", 2));
                assert_eq!(inner.len(), 2);
                assert_eq!(inner.parent().unwrap().node_name, "PSXPropertySet");
            }
            assert_eq!(scope.len(), 1);
        }
        assert!(chain.is_empty());
    }

    #[test]
    fn guard_cleans_up_leaked_nested_pushes() {
        let mut chain = ParentChain::new();
        {
            let mut scope = chain.push(Ancestor::new("Outer", 0));
            // A callee that pushes without structured cleanup; the mem::forget
            // models an unwound frame that never dropped its own guard.
            let inner = scope.push(Ancestor::new("Leaked", 0));
            std::mem::forget(inner);
        }
        assert_eq!(chain.len(), 0);
    }

    #[test]
    fn nearest_finds_closest_match() {
        let mut chain = ParentChain::new();
        let mut a = chain.push(Ancestor::new("PSXRole", 1));
        let mut b = a.push(Ancestor::new("PSXPropertySet", 2));
        let c = b.push(Ancestor::new("PSXRole", 3));
        assert_eq!(c.nearest("PSXRole").unwrap().id, 3);
        assert_eq!(c.nearest("PSXPropertySet").unwrap().id, 2);
        assert!(c.nearest("PSXSubject").is_none());
    }
}
