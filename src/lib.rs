//! # persistent-set
//!
//! A persistent ordered set: inserting or erasing never destroys a version
//! of the set that was observed earlier. Copies are cheap and independent.
//!
//! ## Overview
//!
//! The set is an unbalanced binary search tree with path copying. Each
//! mutation duplicates the nodes on its root-to-target path and shares every
//! other node with prior versions. Cursors walk the tree in both directions
//! without parent links.
//!
//! ## Feature Flags
//!
//! - `arc`: share nodes through `Arc` instead of `Rc`, making sets `Send + Sync`
//! - `serde`: serialize a set as a sequence of keys in ascending order
//!
//! ## Example
//!
//! ```rust
//! use persistent_set::prelude::*;
//!
//! let mut set = PersistentSet::new();
//! let (_, inserted) = set.insert(10_u32);
//! assert!(inserted);
//!
//! let snapshot = set.clone();
//! set.insert(20);
//! assert_eq!(snapshot.len(), 1);
//! assert_eq!(set.len(), 2);
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
/// use persistent_set::prelude::*;
/// ```
pub mod prelude {
    pub use crate::persistent::*;
}

pub mod persistent;
