//! Error types for [`PersistentSet`](super::PersistentSet).

use thiserror::Error;

/// Represents a rejected set operation.
///
/// Every variant is a caller-side precondition failure. The panicking
/// entry points ([`PersistentSet::erase`](super::PersistentSet::erase)) turn
/// these into a panic; the `try_` variants hand them back instead.
///
/// # Examples
///
/// ```rust
/// use persistent_set::persistent::{PersistentSet, PersistentSetError};
///
/// let mut set: PersistentSet<i32> = PersistentSet::new();
/// let end = set.end();
/// assert_eq!(set.try_erase(&end), Err(PersistentSetError::EndPosition));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PersistentSetError {
    /// The cursor points at the `end()` position, which cannot be erased.
    #[error("cannot erase the end() position")]
    EndPosition,
    /// The cursor was issued by another set or by an earlier version of this one.
    #[error("cursor does not belong to the current version of this set")]
    ForeignCursor,
    /// The key is already a member of the set.
    #[error("key is already present in the set")]
    AlreadyPresent,
    /// The key is the reserved sentinel value.
    #[error("key is reserved as the end() sentinel")]
    ReservedKey,
}
