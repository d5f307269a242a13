use crate::{
    base::{self, Location, RBRoot},
    iter::Iter,
    link::Dir,
    node::Linked,
    order::{Compare, Mode, Natural, Unique},
    verify::{Verify, Violation},
};
use std::{
    fmt::{self, Debug, Formatter},
    marker::PhantomData,
};

/// An intrusive red black tree over caller owned records.
///
/// The tree stores nothing but its root link and the ordering relation `C`. Records are borrowed
/// for `'a`, so they outlive the tree; linking a record writes only into its embedded
/// [`Links`](crate::Links). The tree never allocates or frees. Dropping it returns every record to
/// the unlinked state.
///
/// `M` selects whether equal keys may coexist, see [`Unique`] and
/// [`Duplicates`](crate::Duplicates).
pub struct RBTree<'a, T: Linked, C = Natural, M = Unique> {
    root:    RBRoot<'a, T>,
    compare: C,
    _mode:   PhantomData<fn() -> M>,
}

impl<'a, T: Linked> RBTree<'a, T> {
    pub const fn new() -> Self {
        RBTree {
            root:    RBRoot::new(),
            compare: Natural,
            _mode:   PhantomData,
        }
    }
}

impl<'a, T: Linked, C: Default, M> Default for RBTree<'a, T, C, M> {
    fn default() -> Self {
        RBTree::with_compare(C::default())
    }
}

impl<'a, T: Linked, C, M> RBTree<'a, T, C, M> {
    /// A new empty tree ordered by `compare`.
    pub const fn with_compare(compare: C) -> Self {
        RBTree {
            root: RBRoot::new(),
            compare,
            _mode: PhantomData,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    #[inline]
    pub fn root(&self) -> Option<&'a T> {
        self.root.root()
    }

    /// The record with the smallest key.
    #[inline]
    pub fn first(&self) -> Option<&'a T> {
        self.root.first()
    }

    /// The record with the largest key.
    #[inline]
    pub fn last(&self) -> Option<&'a T> {
        self.root.last()
    }

    /// In order iterator over the linked records.
    #[inline]
    pub fn iter(&self) -> Iter<'_, 'a, T> {
        Iter::new(self.first(), self.last())
    }

    /// Number of linked records. Walks the whole tree.
    pub fn count(&self) -> usize {
        self.iter().count()
    }

    /// Number of nodes on the longest path from the root. Walks the whole tree.
    pub fn height(&self) -> usize {
        self.root.height()
    }

    /// Unlinks every record.
    pub fn clear(&mut self) {
        self.root.clear()
    }

    /// The in order successor of `node`.
    ///
    /// # Safety
    ///
    /// `node` must be linked into `self`.
    pub unsafe fn next(&self, node: &'a T) -> Option<&'a T> {
        debug_assert!(self.root.holds(node), "node is not linked into this tree");
        base::step(node, Dir::Right)
    }

    /// The in order predecessor of `node`.
    ///
    /// # Safety
    ///
    /// `node` must be linked into `self`.
    pub unsafe fn prev(&self, node: &'a T) -> Option<&'a T> {
        debug_assert!(self.root.holds(node), "node is not linked into this tree");
        base::step(node, Dir::Left)
    }

    /// Unlinks `node` and returns it, ready for reuse.
    ///
    /// # Safety
    ///
    /// `node` must be linked into `self`, e.g. a record returned by [`RBTree::search`]. Debug builds
    /// check this, at the cost of a walk to the root. Passing a record that was never linked
    /// always panics.
    pub unsafe fn remove(&mut self, node: &'a T) -> &'a T {
        self.root.remove(node);
        node
    }

    /// Unlinks and returns the record with the smallest key.
    pub fn pop_first(&mut self) -> Option<&'a T> {
        let first = self.first()?;
        self.root.remove(first);
        Some(first)
    }

    /// Unlinks and returns the record with the largest key.
    pub fn pop_last(&mut self) -> Option<&'a T> {
        let last = self.last()?;
        self.root.remove(last);
        Some(last)
    }
}

impl<'a, T: Linked, C: Compare<T::Key>, M: Mode> RBTree<'a, T, C, M> {
    /// A record whose key equals `key`. With duplicates, which of the equal records is returned
    /// is unspecified.
    pub fn search(&self, key: &T::Key) -> Option<&'a T> {
        self.root.search(key, &self.compare)
    }

    pub fn contains_key(&self, key: &T::Key) -> bool {
        self.search(key).is_some()
    }

    /// Links `node` into the tree.
    ///
    /// `node` must be unlinked, else this panics. With [`Unique`] keys, `node`'s key must not be
    /// present yet; debug builds check this. Use [`RBTree::try_insert`] when the key may be present.
    pub fn insert(&mut self, node: &'a T) {
        let location = if M::DUPLICATES {
            self.root.vacant_after(node.key(), &self.compare)
        } else {
            match self.root.location(node.key(), &self.compare) {
                Location::Vacant(location) => location,
                Location::Occupied { .. } => {
                    debug_assert!(false, "inserted a key that is already present");
                    self.root.vacant_after(node.key(), &self.compare)
                }
            }
        };
        self.root.insert(node, location)
    }

    /// Links `node` unless a record with an equal key is present, in which case that record is
    /// returned and `node` is left untouched. Takes a single descent.
    pub fn try_insert(&mut self, node: &'a T) -> Result<&'a T, &'a T> {
        match self.root.location(node.key(), &self.compare) {
            Location::Vacant(location) => {
                self.root.insert(node, location);
                Ok(node)
            }
            Location::Occupied { node: resident } => Err(resident),
        }
    }

    /// Unlinks and returns a record whose key equals `key`.
    pub fn remove_key(&mut self, key: &T::Key) -> Option<&'a T> {
        let node = self.search(key)?;
        self.root.remove(node);
        Some(node)
    }

    /// Checks every red black invariant, the key order, and the parent links.
    pub fn verify(&self) -> Result<Verify, Violation> {
        self.root.verify(&self.compare, M::DUPLICATES)
    }
}

impl<'a, T: Linked, C, M> Drop for RBTree<'a, T, C, M> {
    fn drop(&mut self) {
        self.root.clear()
    }
}

impl<'t, 'a, T: Linked, C, M> IntoIterator for &'t RBTree<'a, T, C, M> {
    type IntoIter = Iter<'t, 'a, T>;
    type Item = &'a T;

    #[inline]
    fn into_iter(self) -> Iter<'t, 'a, T> {
        self.iter()
    }
}

impl<'a, T: Linked, C, M> Debug for RBTree<'a, T, C, M>
where
    T::Key: Debug,
{
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter
            .debug_set()
            .entries(self.iter().map(|node| node.key()))
            .finish()
    }
}
