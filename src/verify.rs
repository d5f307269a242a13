//! Invariant checking, for tests and debugging.

use std::{
    error,
    fmt::{self, Display, Formatter},
};

/// Shape of a tree that passed [`RBTree::verify`](crate::RBTree::verify).
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub struct Verify {
    /// Number of black nodes on every path from the root to an absent child.
    pub black_height: usize,
    /// Fewest nodes on a path from the root to an absent child.
    pub min_depth:    usize,
    /// Most nodes on a path from the root to an absent child, i.e. the height of the tree.
    pub max_depth:    usize,
}

/// A broken tree invariant. Any of these means the tree was corrupted, or the ordering relation is
/// not a strict total order.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Violation {
    /// The root has a parent link.
    RootHasParent,
    /// The root is red.
    RedRoot,
    /// A child does not point back at its parent.
    ParentMismatch,
    /// A red node has a red child.
    ConsecutiveReds,
    /// The two children of a node have different black heights, (left, right).
    UnbalancedBlacks(usize, usize),
    /// An in order neighbour is on the wrong side of a node.
    SortError,
    /// A subtree's longest path is more than twice its shortest path, (min, max).
    DepthSkew(usize, usize),
}

impl Display for Violation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Violation::RootHasParent => write!(f, "root has a parent"),
            Violation::RedRoot => write!(f, "root is red"),
            Violation::ParentMismatch => write!(f, "child does not link back to its parent"),
            Violation::ConsecutiveReds => write!(f, "red node with a red child"),
            Violation::UnbalancedBlacks(left, right) => {
                write!(f, "unbalanced blacks, left={} right={}", left, right)
            }
            Violation::SortError => write!(f, "keys out of order"),
            Violation::DepthSkew(min, max) => {
                write!(f, "depth skew, min={} max={}", min, max)
            }
        }
    }
}

impl error::Error for Violation {}
