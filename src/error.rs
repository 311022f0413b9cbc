//! Error types for versioned red-black trees.
//!
//! Every fallible operation reports to its immediate caller through
//! [`TreeError`]. Nothing is retried: all operations are deterministic
//! in-memory computations, and a failed mutation never produces a new
//! version.

use thiserror::Error;

/// A red-black invariant that a tree failed to satisfy.
///
/// Produced only by validation. Seeing one means the balancing code has a
/// bug, not that the caller supplied bad data.
///
/// # Examples
///
/// ```rust
/// use versioned_rbtree::InvariantViolation;
///
/// let violation = InvariantViolation::BlackHeightMismatch { left: 2, right: 1 };
/// assert_eq!(
///     violation.to_string(),
///     "black height differs between subtrees (left 2, right 1)"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// The root of a non-empty tree is red.
    #[error("the root is not black")]
    RedRoot,
    /// A red node has a red child.
    #[error("a red node has a red child")]
    RedRedEdge,
    /// Two subtrees of one node contain different numbers of black nodes.
    #[error("black height differs between subtrees (left {left}, right {right})")]
    BlackHeightMismatch {
        /// Black height of the left subtree.
        left: usize,
        /// Black height of the right subtree.
        right: usize,
    },
    /// In-order traversal is not strictly ascending.
    #[error("in-order traversal is not strictly ascending")]
    OutOfOrder,
    /// The delete sentinel is still attached to the tree.
    #[error("the delete sentinel is still attached to the tree")]
    SentinelReachable,
}

/// Errors reported by tree and history operations.
///
/// # Examples
///
/// ```rust
/// use versioned_rbtree::{TreeError, VersionedRedBlackTree};
///
/// let mut tree = VersionedRedBlackTree::new();
/// tree.insert(1).unwrap();
/// assert_eq!(tree.insert(1), Err(TreeError::DuplicateValue));
/// assert_eq!(tree.version_count(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The value is already present; insertion never merges duplicates.
    #[error("value already exists in the tree")]
    DuplicateValue,
    /// The value is not present.
    #[error("value not found in the tree")]
    NotFound,
    /// A delete was attempted on an empty tree.
    #[error("cannot delete from an empty tree")]
    EmptyTreeUnderflow,
    /// There is no version before the current one.
    #[error("no previous version (history holds {versions} version(s))")]
    NoPreviousVersion {
        /// Number of versions in the history.
        versions: usize,
    },
    /// A version index past the end of the history was requested.
    #[error("version {index} out of range (history holds {versions} version(s))")]
    VersionOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of versions in the history.
        versions: usize,
    },
    /// A red-black invariant does not hold.
    #[error("invariant violated: {0}")]
    InvariantViolation(#[from] InvariantViolation),
}
