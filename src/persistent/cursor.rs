//! Bidirectional cursor over one version of a [`PersistentSet`](super::PersistentSet).

use super::ReferenceCounter;
use super::node::{self, Link};
use super::sentinel::SentinelKey;
use std::fmt;

/// A bidirectional position inside one version of a
/// [`PersistentSet`](super::PersistentSet).
///
/// A cursor is the pair (current node, root of the version it was issued
/// against). Nodes carry no parent links, so stepping out of a subtree searches
/// again from the captured root.
///
/// Two cursors are equal if and only if they reference the same node; equal
/// keys in different versions do not make cursors equal.
///
/// Holding a cursor keeps its version alive. Once the set it came from is
/// mutated, the cursor no longer belongs to the live version (it cannot be
/// passed to [`erase`](super::PersistentSet::erase)), but it can still be
/// moved and read over the snapshot it captured.
///
/// Moving forward from `end()` or backward from `begin()` is outside the
/// cursor contract: neither panics, but the resulting position is
/// unspecified (forward from `end()` currently stays at `end()`).
///
/// # Examples
///
/// ```rust
/// use persistent_set::persistent::PersistentSet;
///
/// let set: PersistentSet<i32> = [5, 3, 8].into_iter().collect();
///
/// let mut cursor = set.begin();
/// assert_eq!(*cursor.key(), 3);
/// cursor.move_next();
/// assert_eq!(*cursor.key(), 5);
///
/// let previous = cursor.step_next();
/// assert_eq!(*previous.key(), 5);
/// assert_eq!(*cursor.key(), 8);
///
/// cursor.move_next();
/// assert_eq!(cursor, set.end());
/// ```
pub struct PersistentSetCursor<K> {
    position: Link<K>,
    root: Link<K>,
}

impl<K> PersistentSetCursor<K> {
    pub(crate) const fn new(position: Link<K>, root: Link<K>) -> Self {
        Self { position, root }
    }

    /// Returns the key at the current position.
    ///
    /// At `end()` this is the sentinel key.
    #[inline]
    #[must_use]
    pub fn key(&self) -> &K {
        &self.position.key
    }

    /// Returns `true` if this cursor was issued against the version rooted at `root`.
    pub(crate) fn belongs_to(&self, root: &Link<K>) -> bool {
        ReferenceCounter::ptr_eq(&self.root, root)
    }
}

impl<K: Ord> PersistentSetCursor<K> {
    /// Advances to the next key in order (pre-increment).
    pub fn move_next(&mut self) -> &mut Self {
        let next = match self.position.right.as_ref() {
            Some(right) => node::leftmost(right).clone(),
            None => node::successor_from(&self.root, &self.position.key).clone(),
        };
        self.position = next;
        self
    }

    /// Retreats to the previous key in order (pre-decrement).
    pub fn move_prev(&mut self) -> &mut Self {
        let previous = match self.position.left.as_ref() {
            Some(left) => node::rightmost(left).clone(),
            None => node::predecessor_from(&self.root, &self.position.key).clone(),
        };
        self.position = previous;
        self
    }

    /// Advances and returns the position held before moving (post-increment).
    #[must_use = "use `move_next` if the previous position is not needed"]
    pub fn step_next(&mut self) -> Self {
        let previous = self.clone();
        self.move_next();
        previous
    }

    /// Retreats and returns the position held before moving (post-decrement).
    #[must_use = "use `move_prev` if the previous position is not needed"]
    pub fn step_prev(&mut self) -> Self {
        let previous = self.clone();
        self.move_prev();
        previous
    }
}

impl<K: SentinelKey> PersistentSetCursor<K> {
    /// Returns `true` if the cursor is at the `end()` position.
    #[inline]
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.position.key.is_sentinel()
    }
}

impl<K> Clone for PersistentSetCursor<K> {
    fn clone(&self) -> Self {
        Self {
            position: self.position.clone(),
            root: self.root.clone(),
        }
    }
}

impl<K> PartialEq for PersistentSetCursor<K> {
    fn eq(&self, other: &Self) -> bool {
        ReferenceCounter::ptr_eq(&self.position, &other.position)
    }
}

impl<K> Eq for PersistentSetCursor<K> {}

impl<K: fmt::Debug> fmt::Debug for PersistentSetCursor<K> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("PersistentSetCursor")
            .field("key", self.key())
            .finish_non_exhaustive()
    }
}
