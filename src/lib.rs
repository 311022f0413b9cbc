//! # versioned-rbtree
//!
//! A persistent red-black tree that keeps every version it has been through.
//!
//! ## Overview
//!
//! Each insert or delete produces a new immutable tree that shares all
//! unchanged subtrees with the version it was derived from. The versions
//! are recorded in an append-only history, so any earlier state of the set
//! can be read at any time at no extra cost.
//!
//! - **Persistent Trees**: [`persistent::PersistentRedBlackTree`], an
//!   immutable ordered set with O(log N) insert, delete and find
//! - **Version History**: [`VersionedRedBlackTree`], the mutable owner of
//!   the version list
//! - **Validation**: invariant checks reporting [`InvariantViolation`]
//!
//! ## Feature Flags
//!
//! - `arc`: Share nodes through `Arc` instead of `Rc`, making versions
//!   `Send + Sync`
//! - `serde`: Serialize trees as ascending sequences of values
//!
//! ## Example
//!
//! ```rust
//! use versioned_rbtree::prelude::*;
//!
//! let mut tree = VersionedRedBlackTree::new();
//! for value in [5, 4, 7, 6, 8, 9] {
//!     tree.insert(value).unwrap();
//! }
//! tree.delete(&7).unwrap();
//!
//! assert!(tree.validate());
//! assert_eq!(tree.find(&7).err(), Some(TreeError::NotFound));
//! assert!(tree.get_previous_version().unwrap().contains(&7));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```rust
/// use versioned_rbtree::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::*;
    pub use crate::persistent::*;
}

pub mod error;
pub mod persistent;

pub use error::{InvariantViolation, TreeError};
pub use persistent::{NodeHandle, PersistentRedBlackTree, VersionedRedBlackTree};
