//! Persistent red-black trees and their version history.
//!
//! This module provides:
//!
//! - [`PersistentRedBlackTree`]: one immutable version of an ordered set,
//!   balanced as a red-black tree
//! - [`VersionedRedBlackTree`]: an append-only history of such versions
//! - [`NodeHandle`]: a read-only view of a node inside any version
//!
//! # Structural Sharing
//!
//! Nodes are never modified after construction. An insert or delete copies
//! only the nodes on the path from the root to the change (plus the few
//! touched by rotations) and shares every other subtree with the version
//! it was derived from. Nodes carry no parent links; the balancing code
//! re-locates ancestors by value in the latest intermediate root.
//!
//! # Examples
//!
//! ```rust
//! use versioned_rbtree::persistent::{Colour, VersionedRedBlackTree};
//!
//! let mut tree = VersionedRedBlackTree::new();
//! for value in [5, 4, 7, 6, 8, 9] {
//!     tree.insert(value).unwrap();
//! }
//!
//! let root = tree.current().root().unwrap();
//! assert_eq!(*root.value(), 5);
//! assert_eq!(root.colour(), Colour::Black);
//!
//! // Every earlier version is still intact
//! let third = tree.get_version(3).unwrap();
//! assert_eq!(third.iter().copied().collect::<Vec<_>>(), vec![4, 5, 7]);
//! ```

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer type.
///
/// When the `arc` feature is enabled, this is `std::sync::Arc`, so that
/// versions can be read from several threads at once.
///
/// When the `arc` feature is disabled (default), this is `std::rc::Rc`.
#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

mod delete;
mod history;
mod insert;
mod iterator;
mod node;
mod search;
mod tree;
mod validate;

pub use history::VersionedRedBlackTree;
pub use iterator::PersistentRedBlackTreeIntoIterator;
pub use iterator::PersistentRedBlackTreeIterator;
pub use node::Colour;
pub use node::NodeHandle;
pub use tree::PersistentRedBlackTree;

// =============================================================================
// Tests
// =============================================================================
