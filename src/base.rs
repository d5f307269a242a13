// based off of https://en.wikipedia.org/wiki/Red%E2%80%93black_tree, CLRS and the linux kernel

use crate::{
    link::{Color, Dir, Link},
    node::Linked,
    order::Compare,
    stats,
    verify::{Verify, Violation},
};
use std::{marker::PhantomData, ptr, ptr::NonNull};

#[inline]
fn as_link<T>(node: &T) -> NonNull<T> {
    NonNull::from(node)
}

// Every link stored in the nodes of a tree was created from an `&'a T` handed to that tree, so the
// target stays valid for as long as the tree can reach it.
#[inline]
fn deref<'a, T>(link: Link<T>) -> Option<&'a T> {
    link.map(|link| unsafe { &*link.as_ptr() })
}

#[inline]
fn parent_of<'a, T: Linked>(node: &'a T) -> Option<&'a T> {
    deref(node.links().parent())
}

#[inline]
fn child<'a, T: Linked>(node: &'a T, dir: Dir) -> Option<&'a T> {
    deref(node.links().child(dir))
}

#[inline]
unsafe fn valid<'a, T>(node: Option<&'a T>) -> &'a T {
    match node {
        Some(node) => node,
        None => unreach!("unwrapping a null link"),
    }
}

/// Absent nodes count as black.
#[inline]
fn red<'a, T: Linked>(node: Option<&'a T>) -> Option<&'a T> {
    node.filter(|node| node.links().is_red())
}

#[inline]
fn is_same<T>(node: Option<&T>, other: &T) -> bool {
    node.map_or(false, |node| ptr::eq(node, other))
}

/// Which side of `parent` holds `node`.
#[inline]
fn child_dir<T: Linked>(parent: &T, node: &T) -> Dir {
    if parent.links().left() == Some(as_link(node)) {
        Dir::Left
    } else {
        Dir::Right
    }
}

#[inline]
fn set_black<T: Linked>(node: &T) {
    node.links().set_color(Color::Black)
}

#[inline]
fn set_red<T: Linked>(node: &T) {
    node.links().set_color(Color::Red)
}

pub(crate) enum VacantLocation<'a, T> {
    Empty,
    Left { parent: &'a T },
    Right { parent: &'a T },
}

pub(crate) enum Location<'a, T> {
    Vacant(VacantLocation<'a, T>),
    Occupied { node: &'a T },
}

/// Where the deletion fixup goes next. Mirrors the case analysis on the sibling `s` of the short
/// side, its close nephew `c` and its distant nephew `d`.
enum RemoveCase<'a, T> {
    Examine,
    RedSibling { s: &'a T, c: &'a T },
    DistantRed { s: &'a T, d: &'a T },
    CloseRed { s: &'a T, c: &'a T },
    RedParent { s: &'a T },
}

/// The root link of a tree, and every structural algorithm.
pub(crate) struct RBRoot<'a, T> {
    root:    Link<T>,
    _marker: PhantomData<&'a T>,
}

impl<'a, T> RBRoot<'a, T> {
    pub const fn new() -> Self {
        RBRoot {
            root:    None,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    #[inline]
    pub fn root(&self) -> Option<&'a T> {
        deref(self.root)
    }
}

impl<'a, T: Linked> RBRoot<'a, T> {
    pub fn search<C: Compare<T::Key>>(&self, key: &T::Key, compare: &C) -> Option<&'a T> {
        match self.location(key, compare) {
            Location::Occupied { node } => Some(node),
            Location::Vacant(_) => None,
        }
    }

    /// Three way descent: stops at the first node whose key equals `key`.
    pub fn location<C: Compare<T::Key>>(&self, key: &T::Key, compare: &C) -> Location<'a, T> {
        let mut this = match self.root() {
            Some(root) => root,
            None => return Location::Vacant(VacantLocation::Empty),
        };
        let mut depth = 1;
        let location = loop {
            if compare.less(key, this.key()) {
                match child(this, Dir::Left) {
                    Some(left) => this = left,
                    None => break Location::Vacant(VacantLocation::Left { parent: this }),
                }
            } else if compare.less(this.key(), key) {
                match child(this, Dir::Right) {
                    Some(right) => this = right,
                    None => break Location::Vacant(VacantLocation::Right { parent: this }),
                }
            } else {
                break Location::Occupied { node: this };
            }
            depth += 1;
        };
        stats::search_depth(depth);
        location
    }

    /// Two way descent to a leaf position. Keys equal to `key` are passed on the left, so a new
    /// node lands after all of them.
    pub fn vacant_after<C: Compare<T::Key>>(
        &self,
        key: &T::Key,
        compare: &C,
    ) -> VacantLocation<'a, T> {
        let mut this = match self.root() {
            Some(root) => root,
            None => return VacantLocation::Empty,
        };
        let mut depth = 1;
        let location = loop {
            if compare.less(key, this.key()) {
                match child(this, Dir::Left) {
                    Some(left) => this = left,
                    None => break VacantLocation::Left { parent: this },
                }
            } else {
                match child(this, Dir::Right) {
                    Some(right) => this = right,
                    None => break VacantLocation::Right { parent: this },
                }
            }
            depth += 1;
        };
        stats::search_depth(depth);
        location
    }

    /// Returns true if `node` hangs off this tree's root.
    pub fn holds(&self, node: &'a T) -> bool {
        let mut this = node;
        while let Some(parent) = parent_of(this) {
            this = parent;
        }
        self.root == Some(as_link(this))
    }

    /*  Right rotate around P (dir = Right):
             P                   S
           /   \                /  \
          S     T     -->      ..   P
         / \                       /  \
        .. C                      C    T

        Left rotate around P (dir = Left):
             P                   S
           /   \                /  \
          T     S              P   ..
               / \     -->    /  \
              C  ..          T    C
    */
    /// Moves `p`'s child opposite `dir` into `p`'s place. Colors are untouched. Returns the new
    /// subtree root.
    fn rotate(&mut self, p: &'a T, dir: Dir) -> &'a T {
        let g = parent_of(p);
        let s = unsafe { valid(child(p, !dir)) };
        let c = child(s, dir);

        p.links().set_child(!dir, c.map(as_link));
        if let Some(c) = c {
            c.links().set_parent(Some(as_link(p)));
        }

        s.links().set_child(dir, Some(as_link(p)));
        p.links().set_parent(Some(as_link(s)));

        s.links().set_parent(g.map(as_link));
        match g {
            Some(g) => g.links().set_child(child_dir(g, p), Some(as_link(s))),
            None => self.root = Some(as_link(s)),
        }
        stats::rotation();
        s
    }

    /// Puts `dest` where `src` hangs. `src`'s own links are left alone.
    fn transplant(&mut self, src: &'a T, dest: Option<&'a T>) {
        let parent = parent_of(src);
        match parent {
            Some(parent) => parent
                .links()
                .set_child(child_dir(parent, src), dest.map(as_link)),
            None => self.root = dest.map(as_link),
        }
        if let Some(dest) = dest {
            dest.links().set_parent(parent.map(as_link));
        }
    }

    pub fn insert(&mut self, node: &'a T, location: VacantLocation<'a, T>) {
        let links = node.links();
        assert!(!links.is_linked(), "node is already linked into a tree");
        debug_assert!(links.left().is_none() && links.right().is_none());

        let (parent, dir) = match location {
            VacantLocation::Empty => {
                debug_assert!(self.root.is_none());
                links.set_parent_color(None, Color::Black);
                self.root = Some(as_link(node));
                return;
            }
            VacantLocation::Left { parent } => (parent, Dir::Left),
            VacantLocation::Right { parent } => (parent, Dir::Right),
        };
        debug_assert!(parent.links().child(dir).is_none());
        links.set_parent_color(Some(as_link(parent)), Color::Red);
        parent.links().set_child(dir, Some(as_link(node)));
        self.insert_fixup(node);
    }

    fn insert_fixup(&mut self, node: &'a T) {
        let mut passes = 1;
        let mut this = node;
        let mut parent = unsafe { valid(parent_of(this)) };
        loop {
            if parent.links().is_black() {
                break;
            }
            let gp = match parent_of(parent) {
                Some(gp) => gp,
                None => {
                    // red root
                    set_black(parent);
                    break;
                }
            };
            let dir = child_dir(gp, parent);
            if let Some(uncle) = red(child(gp, !dir)) {
                // push gp's blackness down to parent and uncle, then start over from gp
                set_black(parent);
                set_black(uncle);
                set_red(gp);
                this = gp;
                match parent_of(this) {
                    Some(next) => parent = next,
                    None => {
                        set_black(this);
                        break;
                    }
                }
                passes += 1;
                continue;
            }
            if is_same(child(parent, !dir), this) {
                // inner grandchild, make it outer
                self.rotate(parent, dir);
                parent = unsafe { valid(child(gp, dir)) };
            }
            set_black(parent);
            set_red(gp);
            self.rotate(gp, !dir);
            break;
        }
        stats::insert_fixup_passes(passes);
    }

    /// Unlinks `node`, which must belong to this tree, and resets its links.
    pub fn remove(&mut self, node: &'a T) {
        let links = node.links();
        assert!(links.is_linked(), "node is not linked into a tree");
        debug_assert!(self.holds(node), "node is linked into a different tree");

        match (child(node, Dir::Left), child(node, Dir::Right)) {
            (None, None) => match parent_of(node) {
                None => self.root = None,
                Some(parent) => {
                    let dir = child_dir(parent, node);
                    parent.links().set_child(dir, None);
                    if links.is_black() {
                        self.remove_fixup(parent, dir);
                    }
                }
            },
            (Some(only), None) | (None, Some(only)) => {
                unsafe {
                    assume!(
                        links.is_black() && only.links().is_red(),
                        "a node with a single child must be black with a red child"
                    )
                };
                set_black(only);
                self.transplant(node, Some(only));
            }
            (Some(left), Some(right)) => {
                let mut successor = right;
                while let Some(next) = child(successor, Dir::Left) {
                    successor = next;
                }
                let successor_black = successor.links().is_black();
                let successor_parent = unsafe { valid(parent_of(successor)) };
                let successor_dir = child_dir(successor_parent, successor);
                let successor_child = child(successor, Dir::Right);

                if !ptr::eq(successor_parent, node) {
                    self.transplant(successor, successor_child);
                    successor.links().set_child(Dir::Right, Some(as_link(right)));
                    right.links().set_parent(Some(as_link(successor)));
                }
                self.transplant(node, Some(successor));
                successor.links().set_child(Dir::Left, Some(as_link(left)));
                left.links().set_parent(Some(as_link(successor)));
                successor.links().set_color(links.color());

                if let Some(successor_child) = successor_child {
                    unsafe {
                        assume!(
                            successor_black && successor_child.links().is_red(),
                            "a successor with a child must be black with a red child"
                        )
                    };
                    set_black(successor_child);
                } else if successor_black {
                    let short = if ptr::eq(successor_parent, node) {
                        successor
                    } else {
                        successor_parent
                    };
                    self.remove_fixup(short, successor_dir);
                }
            }
        }
        links.reset();
    }

    /// `parent`'s subtree on side `dir` holds one black node less than its other side.
    fn remove_fixup(&mut self, parent: &'a T, dir: Dir) {
        let mut passes = 1;
        let mut p = parent;
        let mut dir = dir;
        let mut case = RemoveCase::Examine;
        loop {
            case = match case {
                RemoveCase::Examine => {
                    let s = unsafe { valid(child(p, !dir)) };
                    let d = red(child(s, !dir));
                    let c = red(child(s, dir));
                    if s.links().is_red() {
                        // a red sibling has two black children, since the short side is not empty
                        RemoveCase::RedSibling {
                            s,
                            c: unsafe { valid(child(s, dir)) },
                        }
                    } else if let Some(d) = d {
                        RemoveCase::DistantRed { s, d }
                    } else if let Some(c) = c {
                        RemoveCase::CloseRed { s, c }
                    } else if p.links().is_red() {
                        RemoveCase::RedParent { s }
                    } else {
                        // every path through p is now short by one, move the deficit up
                        set_red(s);
                        match parent_of(p) {
                            Some(gp) => {
                                dir = child_dir(gp, p);
                                p = gp;
                                passes += 1;
                                RemoveCase::Examine
                            }
                            None => break,
                        }
                    }
                }
                RemoveCase::RedSibling { s, c } => {
                    self.rotate(p, dir);
                    set_red(p);
                    set_black(s);
                    // the close nephew is the new sibling, and is black
                    let s = c;
                    if let Some(d) = red(child(s, !dir)) {
                        RemoveCase::DistantRed { s, d }
                    } else if let Some(c) = red(child(s, dir)) {
                        RemoveCase::CloseRed { s, c }
                    } else {
                        RemoveCase::RedParent { s }
                    }
                }
                RemoveCase::CloseRed { s, c } => {
                    self.rotate(s, !dir);
                    set_red(s);
                    set_black(c);
                    RemoveCase::DistantRed { s: c, d: s }
                }
                RemoveCase::DistantRed { s, d } => {
                    self.rotate(p, dir);
                    s.links().set_color(p.links().color());
                    set_black(p);
                    set_black(d);
                    break;
                }
                RemoveCase::RedParent { s } => {
                    set_red(s);
                    set_black(p);
                    break;
                }
            }
        }
        stats::remove_fixup_passes(passes);
    }

    /// Resets the links of every node, leaving the tree empty.
    pub fn clear(&mut self) {
        let mut this = self.root();
        self.root = None;
        while let Some(node) = this {
            if let Some(left) = child(node, Dir::Left) {
                this = Some(left);
            } else if let Some(right) = child(node, Dir::Right) {
                this = Some(right);
            } else {
                let parent = parent_of(node);
                if let Some(parent) = parent {
                    parent.links().set_child(child_dir(parent, node), None);
                }
                node.links().reset();
                this = parent;
            }
        }
    }

    #[inline]
    pub fn first(&self) -> Option<&'a T> {
        self.root().map(|root| extreme(root, Dir::Left))
    }

    #[inline]
    pub fn last(&self) -> Option<&'a T> {
        self.root().map(|root| extreme(root, Dir::Right))
    }

    /// Nodes on the longest path from the root.
    pub fn height(&self) -> usize {
        fn height<T: Linked>(node: Option<&T>) -> usize {
            node.map_or(0, |node| {
                1 + height(child(node, Dir::Left)).max(height(child(node, Dir::Right)))
            })
        }
        height(self.root())
    }

    /// Checks every tree invariant. `duplicates` relaxes the order check to allow equal keys.
    pub fn verify<C: Compare<T::Key>>(
        &self,
        compare: &C,
        duplicates: bool,
    ) -> Result<Verify, Violation> {
        let root = match self.root() {
            Some(root) => root,
            None => return Ok(Verify::default()),
        };
        if root.links().parent().is_some() {
            return Err(Violation::RootHasParent);
        }
        if root.links().is_red() {
            return Err(Violation::RedRoot);
        }
        verify_subtree(root, compare, duplicates).map(|subtree| subtree.report)
    }
}

/// The last node reached by repeatedly stepping to the `dir` child.
#[inline]
fn extreme<'a, T: Linked>(node: &'a T, dir: Dir) -> &'a T {
    let mut this = node;
    while let Some(next) = child(this, dir) {
        this = next;
    }
    this
}

/// In order neighbour of `node`: the successor for `Dir::Right`, the predecessor for `Dir::Left`.
pub(crate) fn step<'a, T: Linked>(node: &'a T, dir: Dir) -> Option<&'a T> {
    if let Some(next) = child(node, dir) {
        return Some(extreme(next, !dir));
    }
    let mut this = node;
    loop {
        let parent = parent_of(this)?;
        if child_dir(parent, this) != dir {
            return Some(parent);
        }
        this = parent;
    }
}

struct Subtree<'a, T> {
    report: Verify,
    min:    Option<&'a T>,
    max:    Option<&'a T>,
}

fn verify_subtree<'a, T: Linked, C: Compare<T::Key>>(
    node: &'a T,
    compare: &C,
    duplicates: bool,
) -> Result<Subtree<'a, T>, Violation> {
    let is_red = node.links().is_red();
    let left = verify_child(node, Dir::Left, compare, duplicates)?;
    let right = verify_child(node, Dir::Right, compare, duplicates)?;

    let (lb, rb) = (left.report.black_height, right.report.black_height);
    if lb != rb {
        return Err(Violation::UnbalancedBlacks(lb, rb));
    }
    let key = node.key();
    let left_ok = left.max.map_or(true, |max| {
        if duplicates {
            !compare.less(key, max.key())
        } else {
            compare.less(max.key(), key)
        }
    });
    let right_ok = right.min.map_or(true, |min| {
        if duplicates {
            !compare.less(min.key(), key)
        } else {
            compare.less(key, min.key())
        }
    });
    if !left_ok || !right_ok {
        return Err(Violation::SortError);
    }

    let report = Verify {
        black_height: lb + if is_red { 0 } else { 1 },
        min_depth:    left.report.min_depth.min(right.report.min_depth) + 1,
        max_depth:    left.report.max_depth.max(right.report.max_depth) + 1,
    };
    if report.max_depth > report.min_depth * 2 {
        return Err(Violation::DepthSkew(report.min_depth, report.max_depth));
    }
    Ok(Subtree {
        report,
        min: Some(left.min.unwrap_or(node)),
        max: Some(right.max.unwrap_or(node)),
    })
}

fn verify_child<'a, T: Linked, C: Compare<T::Key>>(
    node: &'a T,
    dir: Dir,
    compare: &C,
    duplicates: bool,
) -> Result<Subtree<'a, T>, Violation> {
    let child = match child(node, dir) {
        Some(child) => child,
        None => return Ok(Subtree::empty()),
    };
    if child.links().parent() != Some(as_link(node)) {
        return Err(Violation::ParentMismatch);
    }
    if node.links().is_red() && child.links().is_red() {
        return Err(Violation::ConsecutiveReds);
    }
    verify_subtree(child, compare, duplicates)
}

impl<'a, T> Subtree<'a, T> {
    fn empty() -> Self {
        Subtree {
            report: Verify::default(),
            min:    None,
            max:    None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{node::RBNode, order::Natural};

    fn leaf<'a>(root: &mut RBRoot<'a, RBNode<i32>>, node: &'a RBNode<i32>) {
        let location = root.vacant_after(node.key(), &Natural);
        root.insert(node, location);
    }

    fn keys(root: &RBRoot<'_, RBNode<i32>>) -> Vec<i32> {
        let mut keys = Vec::new();
        let mut this = root.first();
        while let Some(node) = this {
            keys.push(*node.key());
            this = step(node, Dir::Right);
        }
        keys
    }

    #[test]
    fn rotate_preserves_order_and_parents() {
        let nodes: Vec<_> = [4, 2, 6, 1, 3, 5, 7]
            .iter()
            .map(|&k| RBNode::new(k, ()))
            .collect();
        let mut root = RBRoot::new();
        for node in &nodes {
            leaf(&mut root, node);
        }
        let before = keys(&root);

        let old_root = root.root().unwrap();
        let new_root = root.rotate(old_root, Dir::Left);
        assert_eq!(*new_root.key(), 6);
        assert!(is_same(root.root(), new_root));
        assert!(new_root.links().parent().is_none());
        assert!(is_same(child(new_root, Dir::Left), old_root));
        assert!(is_same(parent_of(old_root), new_root));
        assert_eq!(*child(old_root, Dir::Right).unwrap().key(), 5);
        assert_eq!(keys(&root), before);

        let back = root.rotate(new_root, Dir::Right);
        assert!(ptr::eq(back, old_root));
        assert_eq!(keys(&root), before);
        root.verify(&Natural, false).unwrap();
        root.clear();
    }

    #[test]
    fn ascending_three() {
        let nodes: Vec<_> = (1..=3).map(|k| RBNode::new(k * 10, ())).collect();
        let mut root = RBRoot::new();
        for node in &nodes {
            leaf(&mut root, node);
        }
        let top = root.root().unwrap();
        assert_eq!(*top.key(), 20);
        assert!(top.links().is_black());
        assert!(child(top, Dir::Left).unwrap().links().is_red());
        assert!(child(top, Dir::Right).unwrap().links().is_red());
        root.clear();
        assert!(nodes.iter().all(|node| !node.is_linked()));
    }

    #[test]
    fn step_both_ways() {
        let nodes: Vec<_> = (0..32).map(|k| RBNode::new(k, ())).collect();
        let mut root = RBRoot::new();
        for node in nodes.iter().rev() {
            leaf(&mut root, node);
        }
        assert_eq!(keys(&root), (0..32).collect::<Vec<_>>());

        let mut back = Vec::new();
        let mut this = root.last();
        while let Some(node) = this {
            back.push(*node.key());
            this = step(node, Dir::Left);
        }
        assert_eq!(back, (0..32).rev().collect::<Vec<_>>());
        root.clear();
    }

    #[test]
    fn holds() {
        let a = RBNode::new(1, ());
        let b = RBNode::new(2, ());
        let mut first = RBRoot::new();
        let mut second = RBRoot::new();
        leaf(&mut first, &a);
        leaf(&mut second, &b);
        assert!(first.holds(&a));
        assert!(!first.holds(&b));
        first.clear();
        second.clear();
    }

    #[test]
    fn verify_catches_red_root() {
        let a = RBNode::new(1, ());
        let mut root = RBRoot::new();
        leaf(&mut root, &a);
        a.links().set_color(Color::Red);
        assert_eq!(root.verify(&Natural, false), Err(Violation::RedRoot));
        a.links().set_color(Color::Black);
        assert!(root.verify(&Natural, false).is_ok());
        root.clear();
    }

    #[test]
    fn verify_catches_unsorted() {
        let nodes: Vec<_> = (0..3).map(|k| RBNode::new(k, ())).collect();
        let mut root = RBRoot::new();
        for node in &nodes {
            leaf(&mut root, node);
        }
        let reversed = |a: &i32, b: &i32| b < a;
        assert_eq!(root.verify(&reversed, false), Err(Violation::SortError));
        root.clear();
    }
}
