//! Version history over persistent red-black trees.
//!
//! [`VersionedRedBlackTree`] is the only mutable object in the crate: it owns
//! an append-only list of tree versions. Index 0 is always the empty tree,
//! and every successful insert, delete or revert appends exactly one
//! version. Failed operations append nothing.

use super::iterator::PersistentRedBlackTreeIterator;
use super::node::NodeHandle;
use super::tree::PersistentRedBlackTree;
use crate::error::TreeError;
use std::fmt;

/// A red-black tree that remembers every version it has been through.
///
/// Reading the history never copies nodes: every version shares its
/// unchanged subtrees with the one it was derived from.
///
/// # Examples
///
/// ```rust
/// use versioned_rbtree::VersionedRedBlackTree;
///
/// let mut tree = VersionedRedBlackTree::new();
/// for value in [7, 5, 8] {
///     tree.insert(value).unwrap();
/// }
/// tree.delete(&5).unwrap();
///
/// // The empty tree plus four mutations
/// assert_eq!(tree.version_count(), 5);
/// assert!(tree.get_version(0).unwrap().is_empty());
/// assert!(tree.get_version(3).unwrap().contains(&5));
/// assert!(!tree.current().contains(&5));
/// ```
pub struct VersionedRedBlackTree<T> {
    versions: Vec<PersistentRedBlackTree<T>>,
    /// Shares its root with the last entry of `versions`.
    current: PersistentRedBlackTree<T>,
}

impl<T> Clone for VersionedRedBlackTree<T> {
    fn clone(&self) -> Self {
        Self {
            versions: self.versions.clone(),
            current: self.current.clone(),
        }
    }
}

impl<T> VersionedRedBlackTree<T> {
    /// Creates a history holding only the empty version.
    #[must_use]
    pub fn new() -> Self {
        Self {
            versions: vec![PersistentRedBlackTree::new()],
            current: PersistentRedBlackTree::new(),
        }
    }

    /// Creates a history starting at the empty version followed by `root`.
    ///
    /// An empty `root` yields the same history as [`new`](Self::new).
    #[must_use]
    pub fn from_root(root: PersistentRedBlackTree<T>) -> Self {
        let mut history = Self::new();
        if !root.is_empty() {
            history.commit(root);
        }
        history
    }

    /// Returns the latest version.
    #[must_use]
    pub const fn current(&self) -> &PersistentRedBlackTree<T> {
        &self.current
    }

    /// Number of values in the latest version.
    #[must_use]
    pub fn len(&self) -> usize {
        self.current().len()
    }

    /// Returns `true` if the latest version holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.current().is_empty()
    }

    /// Number of recorded versions, including the initial empty one.
    #[must_use]
    pub fn version_count(&self) -> usize {
        self.versions.len()
    }

    /// Root of every version, oldest first. Empty versions yield `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use versioned_rbtree::VersionedRedBlackTree;
    ///
    /// let mut tree = VersionedRedBlackTree::new();
    /// tree.insert(1).unwrap();
    /// tree.insert(2).unwrap();
    ///
    /// let roots: Vec<Option<i32>> = tree
    ///     .history()
    ///     .iter()
    ///     .map(|root| root.as_ref().map(|node| *node.value()))
    ///     .collect();
    /// assert_eq!(roots, vec![None, Some(1), Some(1)]);
    /// ```
    #[must_use]
    pub fn history(&self) -> Vec<Option<NodeHandle<T>>> {
        self.versions
            .iter()
            .map(PersistentRedBlackTree::root)
            .collect()
    }

    /// Iterates over the recorded versions, oldest first.
    pub fn versions(&self) -> impl ExactSizeIterator<Item = &PersistentRedBlackTree<T>> {
        self.versions.iter()
    }

    /// Returns the version at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::VersionOutOfRange`] if `index` is not a recorded
    /// version.
    pub fn get_version(&self, index: usize) -> Result<&PersistentRedBlackTree<T>, TreeError> {
        self.versions
            .get(index)
            .ok_or(TreeError::VersionOutOfRange {
                index,
                versions: self.versions.len(),
            })
    }

    /// Returns the version recorded before the current one.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NoPreviousVersion`] if only the initial version
    /// exists.
    pub fn get_previous_version(&self) -> Result<&PersistentRedBlackTree<T>, TreeError> {
        let versions = self.versions.len();
        versions
            .checked_sub(2)
            .and_then(|index| self.versions.get(index))
            .ok_or(TreeError::NoPreviousVersion { versions })
    }

    /// Iterates over the values of the latest version in ascending order.
    #[must_use]
    pub fn iter(&self) -> PersistentRedBlackTreeIterator<'_, T> {
        self.current().iter()
    }

    /// Appends the previous version again, making it current.
    ///
    /// History is never rewritten; reverting is itself a new version.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NoPreviousVersion`] if only the initial version
    /// exists.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use versioned_rbtree::VersionedRedBlackTree;
    ///
    /// let mut tree = VersionedRedBlackTree::new();
    /// tree.insert(1).unwrap();
    /// tree.insert(2).unwrap();
    /// tree.revert().unwrap();
    ///
    /// assert!(!tree.contains(&2));
    /// assert_eq!(tree.version_count(), 4);
    /// ```
    pub fn revert(&mut self) -> Result<(), TreeError> {
        let previous = self.get_previous_version()?.clone();
        tracing::debug!(
            reverted_to = self.versions.len() - 2,
            "reverting to previous version"
        );
        self.commit(previous);
        Ok(())
    }

    fn commit(&mut self, version: PersistentRedBlackTree<T>) {
        tracing::debug!(
            version = self.versions.len(),
            length = version.len(),
            "committed tree version"
        );
        self.versions.push(version.clone());
        self.current = version;
    }
}

impl<T: Ord + Clone> VersionedRedBlackTree<T> {
    /// Inserts `value` into the latest version and records the result.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::DuplicateValue`] if `value` is already present.
    /// No version is recorded in that case.
    pub fn insert(&mut self, value: T) -> Result<(), TreeError> {
        let next = self.current().insert(value)?;
        self.commit(next);
        Ok(())
    }

    /// Deletes `value` from the latest version and records the result.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::EmptyTreeUnderflow`] if the latest version is
    /// empty and [`TreeError::NotFound`] if `value` is not present. No
    /// version is recorded in either case.
    pub fn delete(&mut self, value: &T) -> Result<(), TreeError> {
        let next = self.current().delete(value)?;
        self.commit(next);
        Ok(())
    }
}

impl<T: Ord> VersionedRedBlackTree<T> {
    /// Finds `value` in the latest version.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NotFound`] if `value` is not present.
    pub fn find(&self, value: &T) -> Result<NodeHandle<T>, TreeError> {
        self.current().find(value)
    }

    /// Returns `true` if the latest version contains `value`.
    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        self.current().contains(value)
    }

    /// Returns `true` if the latest version satisfies every red-black
    /// invariant.
    #[must_use]
    pub fn validate(&self) -> bool {
        self.current().validate()
    }

    /// Checks the latest version, reporting the first violation.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvariantViolation`] describing what is broken.
    pub fn check_invariants(&self) -> Result<(), TreeError> {
        self.current().check_invariants()
    }
}

impl<T> Default for VersionedRedBlackTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for VersionedRedBlackTree<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("VersionedRedBlackTree")
            .field("versions", &self.versions.len())
            .field("current", self.current())
            .finish()
    }
}

/// Renders the structure of the latest version.
impl<T: fmt::Display> fmt::Display for VersionedRedBlackTree<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.current(), formatter)
    }
}

impl<'a, T> IntoIterator for &'a VersionedRedBlackTree<T> {
    type Item = &'a T;
    type IntoIter = PersistentRedBlackTreeIterator<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
