//! The ordering relation and the duplicate key policy of a tree.

/// A strict less than relation over keys.
///
/// Two keys `a` and `b` are equal when `!less(a, b) && !less(b, a)`. The relation must be a strict
/// total order over every key ever inserted into the same tree. This is not checked; a relation
/// that is not transitive leaves the tree unordered (though still balanced).
pub trait Compare<K: ?Sized> {
    fn less(&self, a: &K, b: &K) -> bool;

    #[inline]
    fn equal(&self, a: &K, b: &K) -> bool {
        !self.less(a, b) && !self.less(b, a)
    }
}

/// Orders keys by their `Ord` implementation.
#[derive(Copy, Clone, Default, Debug)]
pub struct Natural;

impl<K: Ord + ?Sized> Compare<K> for Natural {
    #[inline]
    fn less(&self, a: &K, b: &K) -> bool {
        a < b
    }
}

impl<K: ?Sized, F: Fn(&K, &K) -> bool> Compare<K> for F {
    #[inline]
    fn less(&self, a: &K, b: &K) -> bool {
        self(a, b)
    }
}

/// Duplicate key policy, chosen when the tree type is instantiated.
pub trait Mode {
    const DUPLICATES: bool;
}

/// Every key in the tree is distinct. Inserting a key that is already present is a contract
/// violation, caught by a debug assertion.
#[derive(Copy, Clone, Debug)]
pub enum Unique {}

/// Equal keys may coexist. A new node with a key equal to a resident one is placed after it (to the
/// right), so equal keys stay adjacent in order.
///
/// Long runs of equal keys are chained through the tree structure. For heavy duplication, prefer a
/// counter or list inside a single node.
#[derive(Copy, Clone, Debug)]
pub enum Duplicates {}

impl Mode for Unique {
    const DUPLICATES: bool = false;
}

impl Mode for Duplicates {
    const DUPLICATES: bool = true;
}
