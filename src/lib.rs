//! An intrusive red black tree.
//!
//! `intrusive-rbtree` keeps caller owned records in key order without allocating. Each record
//! embeds its own [`Links`] (two child links and a parent link with the node color packed into
//! its low bit), and the tree is nothing more than a root link plus an ordering relation.
//!
//! # Examples
//!
//! Records borrowed by a tree must outlive it:
//! ```
//! use intrusive_rbtree::{RBNode, RBTree};
//!
//! let nodes: Vec<_> = [10, 20, 30].iter().map(|&k| RBNode::new(k, ())).collect();
//! let mut tree = RBTree::new();
//! for node in &nodes {
//!     tree.insert(node);
//! }
//! assert_eq!(*tree.root().unwrap().key(), 20);
//! assert!(tree.contains_key(&30));
//! ```
//!
//! Removing by key hands the record back, unlinked and ready for reuse:
//! ```
//! # use intrusive_rbtree::{RBNode, RBTree};
//! let a = RBNode::new("a", 1);
//! let b = RBNode::new("b", 2);
//! let mut tree = RBTree::new();
//! tree.insert(&a);
//! tree.insert(&b);
//! let removed = tree.remove_key(&"a").unwrap();
//! assert_eq!(*removed.value(), 1);
//! assert!(!a.is_linked());
//! assert_eq!(tree.iter().map(|n| *n.key()).collect::<Vec<_>>(), ["b"]);
//! ```
//!
//! A custom ordering, and duplicate keys:
//! ```
//! use intrusive_rbtree::{Duplicates, RBNode, RBTree};
//!
//! let nodes: Vec<_> = [3, 5, 5, 1].iter().map(|&k| RBNode::new(k, ())).collect();
//! let mut tree: RBTree<'_, _, _, Duplicates> = RBTree::with_compare(|a: &i32, b: &i32| b < a);
//! for node in &nodes {
//!     tree.insert(node);
//! }
//! let keys: Vec<_> = tree.iter().map(|n| *n.key()).collect();
//! assert_eq!(keys, [5, 5, 3, 1]);
//! ```
//!
//! # Features
//!
//! * Every operation is `O(log n)` and never allocates. The tree does not track its size.
//! * Records are borrowed, never owned. Dropping or clearing a tree unlinks every record.
//! * Unique keys by default, or [`Duplicates`] as a type parameter.
//! * Ordering by `Ord` ([`Natural`]) or any [`Compare`], including closures.
//! * Not thread safe: [`Links`] uses `Cell`, so records are neither `Send` nor `Sync`.
//! * `--features stats` records rotations, fixup lengths and search depths, see [`stats`].

#![warn(macro_use_extern_crate)]
#![warn(missing_debug_implementations)]
#![warn(unused_lifetimes)]
#![deny(rust_2018_compatibility)]
#![deny(rust_2018_idioms)]
#![deny(unused_must_use)]

#[macro_use]
mod internal;

mod base;
mod iter;
mod link;
mod node;
mod order;
pub mod stats;
mod tree;
mod verify;

pub use crate::{
    iter::Iter,
    link::{Color, Links},
    node::{KeyFirstNode, Linked, RBNode},
    order::{Compare, Duplicates, Mode, Natural, Unique},
    tree::RBTree,
    verify::{Verify, Violation},
};
