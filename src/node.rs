//! Records that can be linked into a tree.

use crate::link::Links;
use std::fmt::{self, Debug, Formatter};

/// A record with embedded [`Links`] and a key.
///
/// # Safety
///
/// `links` must return the same `Links` embedded in `self` on every call, and no two records may
/// share a `Links`. Neither method may panic, touch any tree, or change the key of a record while
/// it is linked.
///
/// # Example
///
/// ```
/// use intrusive_rbtree::{Linked, Links, RBTree};
///
/// struct Timer {
///     deadline: u64,
///     links:    Links<Timer>,
///     name:     &'static str,
/// }
///
/// unsafe impl Linked for Timer {
///     type Key = u64;
///
///     fn links(&self) -> &Links<Self> {
///         &self.links
///     }
///
///     fn key(&self) -> &u64 {
///         &self.deadline
///     }
/// }
///
/// let a = Timer { deadline: 30, links: Links::new(), name: "a" };
/// let b = Timer { deadline: 10, links: Links::new(), name: "b" };
/// let mut timers = RBTree::new();
/// timers.insert(&a);
/// timers.insert(&b);
/// assert_eq!(timers.first().map(|t| t.name), Some("b"));
/// ```
pub unsafe trait Linked: Sized {
    type Key: ?Sized;

    fn links(&self) -> &Links<Self>;

    fn key(&self) -> &Self::Key;
}

macro_rules! rb_node {
    ($(#[$attr:meta])* $name:ident { $($fields:tt)* }) => {
        $(#[$attr])*
        #[repr(C)]
        pub struct $name<K, V = ()> {
            $($fields)*
        }

        impl<K, V> $name<K, V> {
            /// A new unlinked node.
            #[inline]
            pub const fn new(key: K, value: V) -> Self {
                $name {
                    key,
                    links: Links::new(),
                    value,
                }
            }

            /// Stores a new key and clears the links, making the node ready for insertion.
            ///
            /// Taking `&mut self` guarantees no tree still borrows the node.
            #[inline]
            pub fn init(&mut self, key: K) {
                self.key = key;
                self.links = Links::new();
            }

            #[inline]
            pub fn key(&self) -> &K {
                &self.key
            }

            #[inline]
            pub fn value(&self) -> &V {
                &self.value
            }

            #[inline]
            pub fn value_mut(&mut self) -> &mut V {
                &mut self.value
            }

            #[inline]
            pub fn into_inner(self) -> (K, V) {
                (self.key, self.value)
            }

            #[inline]
            pub fn links(&self) -> &Links<Self> {
                &self.links
            }

            #[inline]
            pub fn is_linked(&self) -> bool {
                self.links.is_linked()
            }
        }

        unsafe impl<K, V> Linked for $name<K, V> {
            type Key = K;

            #[inline]
            fn links(&self) -> &Links<Self> {
                &self.links
            }

            #[inline]
            fn key(&self) -> &K {
                &self.key
            }
        }

        impl<K: Debug, V: Debug> Debug for $name<K, V> {
            fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
                formatter
                    .debug_struct(stringify!($name))
                    .field("key", &self.key)
                    .field("value", &self.value)
                    .field("linked", &self.links.is_linked())
                    .finish()
            }
        }
    };
}

rb_node! {
    /// A ready made record: links, then key, then an optional value.
    RBNode {
        links: Links<RBNode<K, V>>,
        key:   K,
        value: V,
    }
}

rb_node! {
    /// Same as [`RBNode`] but with the key at offset zero, for code that reads the key straight
    /// out of the record's memory.
    KeyFirstNode {
        key:   K,
        links: Links<KeyFirstNode<K, V>>,
        value: V,
    }
}
