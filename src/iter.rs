use crate::{base, link::Dir, node::Linked};
use std::{
    fmt::{self, Debug, Formatter},
    iter::FusedIterator,
    marker::PhantomData,
    ptr,
};

/// In order iterator over an [`RBTree`](crate::RBTree), stepping through the parent links. Borrows
/// the tree for `'t`, so the tree cannot change underneath it.
pub struct Iter<'t, 'a, T> {
    front: Option<&'a T>,
    back:  Option<&'a T>,
    _tree: PhantomData<&'t ()>,
}

impl<'t, 'a, T> Iter<'t, 'a, T> {
    #[inline]
    pub(crate) fn new(front: Option<&'a T>, back: Option<&'a T>) -> Self {
        Iter {
            front,
            back,
            _tree: PhantomData,
        }
    }

    // front and back met
    #[inline]
    fn finish(&mut self) {
        self.front = None;
        self.back = None;
    }
}

impl<'t, 'a, T> Clone for Iter<'t, 'a, T> {
    #[inline]
    fn clone(&self) -> Self {
        Iter::new(self.front, self.back)
    }
}

impl<'t, 'a, T> Debug for Iter<'t, 'a, T> {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.pad("Iter { .. }")
    }
}

impl<'t, 'a, T: Linked> Iterator for Iter<'t, 'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<&'a T> {
        let node = self.front?;
        match self.back {
            Some(back) if ptr::eq(back, node) => self.finish(),
            _ => self.front = base::step(node, Dir::Right),
        }
        Some(node)
    }
}

impl<'t, 'a, T: Linked> DoubleEndedIterator for Iter<'t, 'a, T> {
    #[inline]
    fn next_back(&mut self) -> Option<&'a T> {
        let node = self.back?;
        match self.front {
            Some(front) if ptr::eq(front, node) => self.finish(),
            _ => self.back = base::step(node, Dir::Left),
        }
        Some(node)
    }
}

impl<'t, 'a, T: Linked> FusedIterator for Iter<'t, 'a, T> {}
