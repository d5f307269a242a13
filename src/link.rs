//! Per node linkage: two child links and a packed parent/color word.

use std::{
    cell::Cell,
    fmt::{self, Debug, Formatter},
    marker::PhantomData,
    ops::Not,
    ptr::NonNull,
};

pub(crate) type Link<T> = Option<NonNull<T>>;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Color {
    Black = 0,
    Red = 1,
}

/// Which child of a node.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) enum Dir {
    Left = 0,
    Right = 1,
}

impl Not for Dir {
    type Output = Dir;

    #[inline]
    fn not(self) -> Dir {
        match self {
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

const COLOR_MASK: usize = 1;

// A parentless red node is never part of a valid tree (the root is black), so that bit pattern
// marks a node as not linked into any tree.
const UNLINKED: usize = Color::Red as usize;

/// packed pointer/color
///
/// Nodes embed a `Links`, which contains a `usize`, so every node address has its low bit clear.
pub(crate) struct ParentColor<T> {
    raw:     Cell<usize>,
    _marker: PhantomData<*const T>,
}

impl<T> ParentColor<T> {
    #[inline]
    const fn unlinked() -> Self {
        ParentColor {
            raw:     Cell::new(UNLINKED),
            _marker: PhantomData,
        }
    }

    #[inline]
    fn is_unlinked(&self) -> bool {
        self.raw.get() == UNLINKED
    }

    #[inline]
    fn reset(&self) {
        self.raw.set(UNLINKED)
    }

    #[inline]
    fn color(&self) -> Color {
        if self.raw.get() & COLOR_MASK != Color::Black as _ {
            Color::Red
        } else {
            Color::Black
        }
    }

    #[inline]
    fn parent(&self) -> Link<T> {
        NonNull::new((self.raw.get() & !COLOR_MASK) as *mut T)
    }

    #[inline]
    fn set(&self, parent: Link<T>, color: Color) {
        let addr = parent.map_or(0, |parent| parent.as_ptr() as usize);
        debug_assert!(addr & COLOR_MASK == 0, "misaligned node");
        self.raw.set(addr | color as usize)
    }

    #[inline]
    fn set_parent(&self, parent: Link<T>) {
        self.set(parent, self.color())
    }

    #[inline]
    fn set_color(&self, color: Color) {
        self.raw.set((self.raw.get() & !COLOR_MASK) | color as usize)
    }
}

/// The links a record must embed to be placed in an [`RBTree`](crate::RBTree).
///
/// A fresh `Links` is unlinked. The tree owns the contents while the record is linked, and resets
/// them when the record is removed or the tree is dropped.
#[repr(C)]
pub struct Links<T> {
    parent_color: ParentColor<T>,
    left:         Cell<Link<T>>,
    right:        Cell<Link<T>>,
}

impl<T> Default for Links<T> {
    #[inline]
    fn default() -> Self {
        Links::new()
    }
}

impl<T> Debug for Links<T> {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        if self.is_linked() {
            formatter
                .debug_struct("Links")
                .field("parent", &self.parent())
                .field("color", &self.color())
                .field("left", &self.left.get())
                .field("right", &self.right.get())
                .finish()
        } else {
            formatter.pad("Links { unlinked }")
        }
    }
}

impl<T> Links<T> {
    #[inline]
    pub const fn new() -> Self {
        Links {
            parent_color: ParentColor::unlinked(),
            left:         Cell::new(None),
            right:        Cell::new(None),
        }
    }

    /// Returns true if the record is currently part of a tree.
    #[inline]
    pub fn is_linked(&self) -> bool {
        !self.parent_color.is_unlinked()
    }

    /// The parent of a linked record, or `None` for the root and for unlinked records.
    #[inline]
    pub fn parent(&self) -> Option<NonNull<T>> {
        self.parent_color.parent()
    }

    /// Color of a linked record. Meaningless for unlinked records.
    #[inline]
    pub fn color(&self) -> Color {
        self.parent_color.color()
    }

    #[inline]
    pub fn is_red(&self) -> bool {
        self.color() == Color::Red
    }

    #[inline]
    pub fn is_black(&self) -> bool {
        self.color() == Color::Black
    }

    #[inline]
    pub fn left(&self) -> Option<NonNull<T>> {
        self.left.get()
    }

    #[inline]
    pub fn right(&self) -> Option<NonNull<T>> {
        self.right.get()
    }

    #[inline]
    pub(crate) fn child(&self, dir: Dir) -> Link<T> {
        match dir {
            Dir::Left => self.left.get(),
            Dir::Right => self.right.get(),
        }
    }

    #[inline]
    pub(crate) fn set_child(&self, dir: Dir, child: Link<T>) {
        match dir {
            Dir::Left => self.left.set(child),
            Dir::Right => self.right.set(child),
        }
    }

    #[inline]
    pub(crate) fn set_parent(&self, parent: Link<T>) {
        self.parent_color.set_parent(parent)
    }

    #[inline]
    pub(crate) fn set_color(&self, color: Color) {
        self.parent_color.set_color(color)
    }

    #[inline]
    pub(crate) fn set_parent_color(&self, parent: Link<T>, color: Color) {
        self.parent_color.set(parent, color)
    }

    /// Puts the links back into the unlinked state.
    #[inline]
    pub(crate) fn reset(&self) {
        self.left.set(None);
        self.right.set(None);
        self.parent_color.reset();
    }
}
