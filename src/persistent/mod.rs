//! Persistent ordered set.
//!
//! This module provides [`PersistentSet`], an ordered set in which every
//! mutation preserves all previously observed versions:
//!
//! - [`PersistentSet`]: the set itself, copied in O(1)
//! - [`PersistentSetCursor`]: a bidirectional cursor over one version
//! - [`PersistentSetIterator`]: a borrowing in-order iterator
//! - [`SentinelKey`]: key types with a reserved maximum value
//! - [`PersistentSetError`]: rejected operations
//!
//! # Structural Sharing
//!
//! Insert and erase copy only the nodes on the path from the root to the
//! affected key. Everything else is shared with earlier versions, and a
//! shared node is never written to.
//!
//! # Examples
//!
//! ```rust
//! use persistent_set::persistent::PersistentSet;
//!
//! let mut set: PersistentSet<i32> = [5, 3, 8, 1, 4].into_iter().collect();
//! let before = set.clone();
//!
//! let position = set.find(&3);
//! set.erase(&position);
//!
//! assert_eq!(format!("{set}"), "{1, 4, 5, 8}");
//! assert_eq!(format!("{before}"), "{1, 3, 4, 5, 8}");
//! assert_eq!(set.find(&3), set.end());
//! ```

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer type.
///
/// When the `arc` feature is enabled, this is `std::sync::Arc`,
/// which is thread-safe but has slightly higher overhead.
///
/// When the `arc` feature is disabled (default), this is `std::rc::Rc`,
/// which is faster but not thread-safe.
#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

mod cursor;
mod error;
mod node;
mod sentinel;
mod set;

pub use cursor::PersistentSetCursor;
pub use error::PersistentSetError;
pub use sentinel::SentinelKey;
pub use set::PersistentSet;
pub use set::PersistentSetIterator;

// =============================================================================
// Tests
// =============================================================================
