//! Ascending in-order iteration over a tree version.
//!
//! Nodes have no parent links, so both iterators keep an explicit stack of
//! the ancestors whose left subtree is still being visited. `next` pops the
//! top of the stack and pushes the left spine of that node's right subtree.
//!
//! Nodes are immutable, so any number of iterators can walk the same or
//! different versions at once without affecting each other.

use super::ReferenceCounter;
use super::node::{Link, Node};
use smallvec::SmallVec;
use std::iter::FusedIterator;

/// Ancestor stack depth kept inline. A red-black tree of height 32 holds
/// at least 65535 values.
const INLINE_DEPTH: usize = 32;

/// A borrowing iterator over the values of a
/// [`PersistentRedBlackTree`](super::PersistentRedBlackTree) in ascending order.
///
/// Once exhausted it keeps returning `None`; create a new iterator to walk
/// the tree again.
pub struct PersistentRedBlackTreeIterator<'a, T> {
    stack: SmallVec<[&'a Node<T>; INLINE_DEPTH]>,
    remaining: usize,
}

impl<'a, T> PersistentRedBlackTreeIterator<'a, T> {
    pub(crate) fn new(root: &'a Link<T>, length: usize) -> Self {
        let mut iterator = Self {
            stack: SmallVec::new(),
            remaining: length,
        };
        iterator.push_left_spine(root);
        iterator
    }

    fn push_left_spine(&mut self, link: &'a Link<T>) {
        let mut current = link;
        while let Some(node) = current.node() {
            self.stack.push(node);
            current = &node.left;
        }
    }
}

impl<'a, T> Iterator for PersistentRedBlackTreeIterator<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(&node.right);
        self.remaining = self.remaining.saturating_sub(1);
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for PersistentRedBlackTreeIterator<'_, T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T> FusedIterator for PersistentRedBlackTreeIterator<'_, T> {}

/// An owning iterator over the values of a
/// [`PersistentRedBlackTree`](super::PersistentRedBlackTree) in ascending order.
///
/// Holds shared references to the nodes it has yet to visit, so it stays
/// valid after the tree it came from is dropped.
pub struct PersistentRedBlackTreeIntoIterator<T> {
    stack: SmallVec<[ReferenceCounter<Node<T>>; INLINE_DEPTH]>,
    remaining: usize,
}

impl<T> PersistentRedBlackTreeIntoIterator<T> {
    pub(crate) fn new(root: &Link<T>, length: usize) -> Self {
        let mut iterator = Self {
            stack: SmallVec::new(),
            remaining: length,
        };
        iterator.push_left_spine(root);
        iterator
    }

    fn push_left_spine(&mut self, link: &Link<T>) {
        let mut current = link.node().cloned();
        while let Some(node) = current {
            current = node.left.node().cloned();
            self.stack.push(node);
        }
    }
}

impl<T: Clone> Iterator for PersistentRedBlackTreeIntoIterator<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(&node.right);
        self.remaining = self.remaining.saturating_sub(1);
        Some(node.value.clone())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T: Clone> ExactSizeIterator for PersistentRedBlackTreeIntoIterator<T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T: Clone> FusedIterator for PersistentRedBlackTreeIntoIterator<T> {}
