//! Persistent (immutable) red-black tree of unique ordered values.
//!
//! This module provides [`PersistentRedBlackTree`], one immutable version
//! of an ordered set. Mutating operations return a new tree and leave the
//! receiver untouched; only the nodes on the modified path are new, and
//! everything else is shared with the previous version.
//!
//! - O(log N) insert, delete and find
//! - O(log N) min/max
//! - O(1) clone, len and `is_empty`
//!
//! # Examples
//!
//! ```rust
//! use versioned_rbtree::persistent::PersistentRedBlackTree;
//!
//! let tree = PersistentRedBlackTree::try_from_values([5, 4, 7, 6, 8, 9]).unwrap();
//! let values: Vec<&i32> = tree.iter().collect();
//! assert_eq!(values, vec![&4, &5, &6, &7, &8, &9]);
//!
//! // The original is untouched by a delete
//! let smaller = tree.delete(&7).unwrap();
//! assert!(tree.contains(&7));
//! assert!(!smaller.contains(&7));
//! assert!(smaller.validate());
//! ```

use super::delete::delete_value;
use super::insert::insert_value;
use super::iterator::{PersistentRedBlackTreeIntoIterator, PersistentRedBlackTreeIterator};
use super::node::{Link, NodeHandle};
use super::search::find;
use super::validate;
use crate::error::TreeError;
use std::fmt;

// =============================================================================
// PersistentRedBlackTree Definition
// =============================================================================

/// An immutable red-black tree holding unique values in ascending order.
///
/// Cloning is O(1): both clones share the same root. Every node is
/// immutable, so a tree can be read from anywhere while newer versions are
/// being built from it.
///
/// # Time Complexity
///
/// | Operation  | Complexity |
/// |------------|------------|
/// | `new`      | O(1)       |
/// | `insert`   | O(log N)   |
/// | `delete`   | O(log N)   |
/// | `find`     | O(log N)   |
/// | `min`/`max`| O(log N)   |
/// | `len`      | O(1)       |
/// | `validate` | O(N)       |
pub struct PersistentRedBlackTree<T> {
    root: Link<T>,
    length: usize,
}

impl<T> Clone for PersistentRedBlackTree<T> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            length: self.length,
        }
    }
}

impl<T> PersistentRedBlackTree<T> {
    /// Creates a new empty tree.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use versioned_rbtree::persistent::PersistentRedBlackTree;
    ///
    /// let tree: PersistentRedBlackTree<i32> = PersistentRedBlackTree::new();
    /// assert!(tree.is_empty());
    /// assert!(tree.root().is_none());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            root: Link::Empty,
            length: 0,
        }
    }

    /// Returns the number of values in the tree.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the tree contains no values.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns a handle to the root node, or `None` for an empty tree.
    #[must_use]
    pub fn root(&self) -> Option<NodeHandle<T>> {
        NodeHandle::from_link(&self.root)
    }

    /// Returns an iterator over the values in ascending order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use versioned_rbtree::persistent::PersistentRedBlackTree;
    ///
    /// let tree = PersistentRedBlackTree::try_from_values([3, 1, 2]).unwrap();
    /// let mut iterator = tree.iter();
    /// assert_eq!(iterator.next(), Some(&1));
    /// assert_eq!(iterator.len(), 2);
    /// ```
    #[must_use]
    pub fn iter(&self) -> PersistentRedBlackTreeIterator<'_, T> {
        PersistentRedBlackTreeIterator::new(&self.root, self.length)
    }
}

impl<T: Ord + Clone> PersistentRedBlackTree<T> {
    /// Returns a new tree that also contains `value`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::DuplicateValue`] if `value` is already present.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use versioned_rbtree::TreeError;
    /// use versioned_rbtree::persistent::PersistentRedBlackTree;
    ///
    /// let tree = PersistentRedBlackTree::new().insert(1).unwrap();
    /// let larger = tree.insert(2).unwrap();
    ///
    /// assert_eq!(tree.len(), 1);   // Original unchanged
    /// assert_eq!(larger.len(), 2); // New version
    /// assert_eq!(larger.insert(2).err(), Some(TreeError::DuplicateValue));
    /// ```
    pub fn insert(&self, value: T) -> Result<Self, TreeError> {
        Ok(Self {
            root: insert_value(&self.root, value)?,
            length: self.length + 1,
        })
    }

    /// Returns a new tree without `value`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::EmptyTreeUnderflow`] if the tree is empty and
    /// [`TreeError::NotFound`] if `value` is not present.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use versioned_rbtree::TreeError;
    /// use versioned_rbtree::persistent::PersistentRedBlackTree;
    ///
    /// let tree = PersistentRedBlackTree::try_from_values([1, 2]).unwrap();
    /// let smaller = tree.delete(&1).unwrap();
    /// assert_eq!(smaller.iter().collect::<Vec<_>>(), vec![&2]);
    /// assert_eq!(smaller.delete(&1).err(), Some(TreeError::NotFound));
    /// ```
    pub fn delete(&self, value: &T) -> Result<Self, TreeError> {
        Ok(Self {
            root: delete_value(&self.root, value)?,
            length: self.length.saturating_sub(1),
        })
    }

    /// Builds a tree by inserting `values` in order.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::DuplicateValue`] on the first repeated value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use versioned_rbtree::TreeError;
    /// use versioned_rbtree::persistent::PersistentRedBlackTree;
    ///
    /// assert!(PersistentRedBlackTree::try_from_values([2, 1, 3]).is_ok());
    /// assert_eq!(
    ///     PersistentRedBlackTree::try_from_values([1, 2, 3, 2]).err(),
    ///     Some(TreeError::DuplicateValue)
    /// );
    /// ```
    pub fn try_from_values<I>(values: I) -> Result<Self, TreeError>
    where
        I: IntoIterator<Item = T>,
    {
        values
            .into_iter()
            .try_fold(Self::new(), |tree, value| tree.insert(value))
    }
}

impl<T: Ord> PersistentRedBlackTree<T> {
    /// Returns a handle to the node holding `value`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NotFound`] if `value` is not present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use versioned_rbtree::TreeError;
    /// use versioned_rbtree::persistent::PersistentRedBlackTree;
    ///
    /// let tree = PersistentRedBlackTree::try_from_values([2, 1, 3]).unwrap();
    /// assert_eq!(tree.find(&3).map(|node| *node.value()), Ok(3));
    /// assert_eq!(tree.find(&4).err(), Some(TreeError::NotFound));
    /// ```
    pub fn find(&self, value: &T) -> Result<NodeHandle<T>, TreeError> {
        find(&self.root, value).map(|node| NodeHandle::new(node.clone()))
    }

    /// Returns `true` if the tree contains `value`.
    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        find(&self.root, value).is_ok()
    }

    /// Returns the smallest value.
    #[must_use]
    pub fn min(&self) -> Option<&T> {
        self.iter().next()
    }

    /// Returns the largest value.
    #[must_use]
    pub fn max(&self) -> Option<&T> {
        let mut current = self.root.node()?;
        while let Some(right) = current.right.node() {
            current = right;
        }
        Some(&current.value)
    }

    /// Returns `true` if every red-black invariant holds.
    ///
    /// Intended for tests and self-checks; mutations never call it.
    #[must_use]
    pub fn validate(&self) -> bool {
        self.check_invariants().is_ok()
    }

    /// Checks every red-black invariant, reporting the first violation.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvariantViolation`] describing what is broken.
    pub fn check_invariants(&self) -> Result<(), TreeError> {
        validate::check(&self.root).map_err(TreeError::from)
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T> Default for PersistentRedBlackTree<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialEq> PartialEq for PersistentRedBlackTree<T> {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for PersistentRedBlackTree<T> {}

impl<T: fmt::Debug> fmt::Debug for PersistentRedBlackTree<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

/// Renders the tree structure as `value+colour[left,right]`.
///
/// Colours are tagged `r` and `b`; absent children and the empty tree
/// render as `null`.
///
/// # Examples
///
/// ```rust
/// use versioned_rbtree::persistent::PersistentRedBlackTree;
///
/// let tree = PersistentRedBlackTree::try_from_values([2, 1, 3]).unwrap();
/// assert_eq!(tree.to_string(), "2b[1r[null,null],3r[null,null]]");
/// ```
impl<T: fmt::Display> fmt::Display for PersistentRedBlackTree<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.root.write_structure(formatter)
    }
}

impl<'a, T> IntoIterator for &'a PersistentRedBlackTree<T> {
    type Item = &'a T;
    type IntoIter = PersistentRedBlackTreeIterator<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Clone> IntoIterator for PersistentRedBlackTree<T> {
    type Item = T;
    type IntoIter = PersistentRedBlackTreeIntoIterator<T>;

    fn into_iter(self) -> Self::IntoIter {
        PersistentRedBlackTreeIntoIterator::new(&self.root, self.length)
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<T> serde::Serialize for PersistentRedBlackTree<T>
where
    T: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(feature = "serde")]
struct PersistentRedBlackTreeVisitor<T> {
    marker: std::marker::PhantomData<T>,
}

#[cfg(feature = "serde")]
impl<'de, T> serde::de::Visitor<'de> for PersistentRedBlackTreeVisitor<T>
where
    T: serde::Deserialize<'de> + Ord + Clone,
{
    type Value = PersistentRedBlackTree<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence of unique values")
    }

    fn visit_seq<A>(self, mut sequence: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let mut tree = PersistentRedBlackTree::new();
        while let Some(value) = sequence.next_element()? {
            tree = tree.insert(value).map_err(serde::de::Error::custom)?;
        }
        Ok(tree)
    }
}

#[cfg(feature = "serde")]
impl<'de, T> serde::Deserialize<'de> for PersistentRedBlackTree<T>
where
    T: serde::Deserialize<'de> + Ord + Clone,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(PersistentRedBlackTreeVisitor {
            marker: std::marker::PhantomData,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
