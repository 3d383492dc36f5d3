//! Persistent ordered set based on a path-copying binary search tree.
//!
//! This module provides [`PersistentSet`], an ordered set whose versions
//! share structure. Mutation copies only the nodes on the root-to-target
//! path; copying a set allocates a single node.
//!
//! # Overview
//!
//! - O(h) find, insert, erase, where h is the tree height
//! - O(1) copy (one node allocated)
//! - O(1) len and `is_empty`
//! - bidirectional cursors ([`PersistentSetCursor`]) without parent links
//!
//! The tree is not rebalanced, so h is bounded only by the number of keys.
//!
//! # Examples
//!
//! ```rust
//! use persistent_set::persistent::PersistentSet;
//!
//! let mut set = PersistentSet::new();
//! for key in [5, 3, 8, 1, 4] {
//!     set.insert(key);
//! }
//!
//! // Snapshot before erasing
//! let snapshot = set.clone();
//! set.remove(&3);
//!
//! assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec![1, 4, 5, 8]);
//! assert_eq!(snapshot.iter().copied().collect::<Vec<_>>(), vec![1, 3, 4, 5, 8]);
//! ```
//!
//! # Internal Structure
//!
//! Every version contains exactly one node holding
//! [`SentinelKey::SENTINEL`]. It is created as the root of a new set and,
//! because the tree never rotates and the sentinel is never erased, it stays
//! the root and the right-most node. It marks the `end()` position.

use super::ReferenceCounter;
use super::cursor::PersistentSetCursor;
use super::error::PersistentSetError;
use super::node::{self, Link, Node};
use super::sentinel::SentinelKey;
use smallvec::SmallVec;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FromIterator;

// =============================================================================
// PersistentSet Definition
// =============================================================================

/// A persistent ordered set of [`SentinelKey`] keys.
///
/// Mutating operations take `&mut self` and never disturb any other version:
/// every copy made with [`Clone`] and every outstanding
/// [`PersistentSetCursor`] keeps observing the keys it saw.
///
/// # Time Complexity
///
/// | Operation      | Complexity        |
/// |----------------|-------------------|
/// | `new`          | O(1)              |
/// | `clone`        | O(1)              |
/// | `find`         | O(h)              |
/// | `insert`       | O(h)              |
/// | `erase`        | O(h)              |
/// | `begin`/`end`  | O(h)              |
/// | `len`          | O(1)              |
///
/// # Examples
///
/// ```rust
/// use persistent_set::persistent::PersistentSet;
///
/// let mut set = PersistentSet::new();
/// let (cursor, inserted) = set.insert(42);
/// assert!(inserted);
/// assert_eq!(*cursor.key(), 42);
///
/// let (again, inserted) = set.insert(42);
/// assert!(!inserted);
/// assert_eq!(again, set.find(&42));
/// ```
pub struct PersistentSet<K> {
    /// Root node, always the sentinel
    root: Link<K>,
    /// Number of keys, sentinel excluded
    length: usize,
}

impl<K> PersistentSet<K> {
    /// Returns the number of keys in the set.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the set contains no keys.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns an iterator over the keys in ascending order.
    ///
    /// The sentinel is never yielded.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_set::persistent::PersistentSet;
    ///
    /// let set: PersistentSet<u8> = [3, 1, 2].into_iter().collect();
    /// let keys: Vec<&u8> = set.iter().collect();
    /// assert_eq!(keys, vec![&1, &2, &3]);
    /// ```
    #[must_use]
    pub fn iter(&self) -> PersistentSetIterator<'_, K> {
        let mut iterator = PersistentSetIterator {
            stack: SmallVec::new(),
            remaining: self.length,
        };
        iterator.push_left_spine(Some(&self.root));
        iterator
    }

    fn cursor_at(&self, position: Link<K>) -> PersistentSetCursor<K> {
        PersistentSetCursor::new(position, self.root.clone())
    }
}

impl<K: SentinelKey> PersistentSet<K> {
    /// Creates a new empty set holding only the sentinel.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_set::persistent::PersistentSet;
    ///
    /// let set: PersistentSet<i64> = PersistentSet::new();
    /// assert!(set.is_empty());
    /// assert_eq!(set.begin(), set.end());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: ReferenceCounter::new(Node::leaf(K::SENTINEL)),
            length: 0,
        }
    }

    /// Returns a cursor at `key`, or [`end`](Self::end) if the key is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_set::persistent::PersistentSet;
    ///
    /// let set: PersistentSet<i32> = [1, 2].into_iter().collect();
    /// assert_eq!(*set.find(&2).key(), 2);
    /// assert_eq!(set.find(&3), set.end());
    /// ```
    #[must_use]
    pub fn find(&self, key: &K) -> PersistentSetCursor<K> {
        node::find(&self.root, key)
            .filter(|found| found.key == *key)
            .cloned()
            .map_or_else(|| self.end(), |found| self.cursor_at(found))
    }

    /// Returns `true` if `key` is a member of the set.
    ///
    /// The sentinel is not a member.
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        !key.is_sentinel() && node::find(&self.root, key).is_some()
    }

    /// Inserts `key`, returning a cursor at it and whether it was newly added.
    ///
    /// An existing key is left in place and reported with `false`. The
    /// sentinel key counts as always present, so inserting it returns
    /// `(end(), false)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_set::persistent::PersistentSet;
    ///
    /// let mut set = PersistentSet::new();
    /// assert!(set.insert(7_u16).1);
    /// assert!(!set.insert(7_u16).1);
    ///
    /// let (cursor, inserted) = set.insert(u16::MAX);
    /// assert!(!inserted);
    /// assert_eq!(cursor, set.end());
    /// ```
    pub fn insert(&mut self, key: K) -> (PersistentSetCursor<K>, bool) {
        if let Some(existing) = node::find(&self.root, &key).cloned() {
            tracing::trace!(length = self.length, "key already present");
            return (self.cursor_at(existing), false);
        }

        let (position, inserted) = node::insert(&mut self.root, key);
        if inserted {
            self.length += 1;
            tracing::trace!(length = self.length, "inserted key");
        }
        (self.cursor_at(position), inserted)
    }

    /// Inserts `key`, rejecting keys that are present or reserved.
    ///
    /// # Errors
    ///
    /// - [`PersistentSetError::ReservedKey`] if `key` is the sentinel
    /// - [`PersistentSetError::AlreadyPresent`] if `key` is already a member
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_set::persistent::{PersistentSet, PersistentSetError};
    ///
    /// let mut set = PersistentSet::new();
    /// assert!(set.try_insert(1_i8).is_ok());
    /// assert_eq!(set.try_insert(1_i8), Err(PersistentSetError::AlreadyPresent));
    /// assert_eq!(set.try_insert(i8::MAX), Err(PersistentSetError::ReservedKey));
    /// ```
    pub fn try_insert(
        &mut self,
        key: K,
    ) -> Result<PersistentSetCursor<K>, PersistentSetError> {
        if key.is_sentinel() {
            return Err(PersistentSetError::ReservedKey);
        }
        match self.insert(key) {
            (position, true) => Ok(position),
            (_, false) => Err(PersistentSetError::AlreadyPresent),
        }
    }

    /// Removes the key at `position`.
    ///
    /// Only the nodes on the path to the removed key are copied; other
    /// versions sharing them are unaffected.
    ///
    /// # Panics
    ///
    /// Panics if `position` is [`end`](Self::end) or was not issued by this
    /// exact version of the set. Use [`try_erase`](Self::try_erase) to get
    /// the error back instead.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_set::persistent::PersistentSet;
    ///
    /// let mut set: PersistentSet<i32> = [1, 2, 3].into_iter().collect();
    /// let position = set.find(&2);
    /// set.erase(&position);
    /// assert!(!set.contains(&2));
    /// ```
    pub fn erase(&mut self, position: &PersistentSetCursor<K>) {
        if let Err(error) = self.try_erase(position) {
            panic!("PersistentSet::erase: {error}");
        }
    }

    /// Removes the key at `position`, reporting precondition violations.
    ///
    /// The cursor is checked before any node is copied, so a rejected call
    /// leaves the set untouched.
    ///
    /// # Errors
    ///
    /// - [`PersistentSetError::ForeignCursor`] if `position` belongs to another
    ///   set or to an earlier version of this one
    /// - [`PersistentSetError::EndPosition`] if `position` is `end()`
    pub fn try_erase(
        &mut self,
        position: &PersistentSetCursor<K>,
    ) -> Result<(), PersistentSetError> {
        if !position.belongs_to(&self.root) {
            return Err(PersistentSetError::ForeignCursor);
        }
        if position.is_end() {
            return Err(PersistentSetError::EndPosition);
        }

        let key = position.key().clone();
        let erased = self.erase_key(&key);
        debug_assert!(erased, "a cursor of this version points at a member");
        Ok(())
    }

    /// Removes `key` if present, returning whether it was a member.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_set::persistent::PersistentSet;
    ///
    /// let mut set: PersistentSet<i32> = [1, 2].into_iter().collect();
    /// assert!(set.remove(&1));
    /// assert!(!set.remove(&1));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn remove(&mut self, key: &K) -> bool {
        // No cursor is held here, so nodes this version owns alone are
        // updated in place.
        self.contains(key) && self.erase_key(key)
    }

    fn erase_key(&mut self, key: &K) -> bool {
        let root = ReferenceCounter::make_mut(&mut self.root);
        let erased = node::erase_below(root, key);
        if erased {
            self.length -= 1;
            tracing::trace!(length = self.length, "erased key");
        }
        erased
    }

    /// Returns a cursor at the smallest key, or at `end()` if the set is empty.
    #[must_use]
    pub fn begin(&self) -> PersistentSetCursor<K> {
        self.cursor_at(node::leftmost(&self.root).clone())
    }

    /// Returns a cursor at the sentinel, one past the largest key.
    #[must_use]
    pub fn end(&self) -> PersistentSetCursor<K> {
        self.cursor_at(node::rightmost(&self.root).clone())
    }

    /// Returns the smallest key.
    #[must_use]
    pub fn first(&self) -> Option<&K> {
        if self.is_empty() {
            return None;
        }
        Some(&node::leftmost(&self.root).key)
    }

    /// Returns the largest key.
    #[must_use]
    pub fn last(&self) -> Option<&K> {
        if self.is_empty() {
            return None;
        }
        let end = node::rightmost(&self.root);
        let last = end.left.as_ref().map_or_else(
            || node::predecessor_from(&self.root, &end.key),
            |left| node::rightmost(left),
        );
        Some(&last.key)
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// An iterator over the keys of a [`PersistentSet`] in ascending order.
///
/// Walks the tree with an explicit stack of pending ancestors instead of
/// parent links.
pub struct PersistentSetIterator<'a, K> {
    stack: SmallVec<[&'a Node<K>; 32]>,
    remaining: usize,
}

impl<'a, K> PersistentSetIterator<'a, K> {
    fn push_left_spine(&mut self, mut link: Option<&'a Link<K>>) {
        while let Some(current) = link {
            self.stack.push(current);
            link = current.left.as_ref();
        }
    }
}

impl<'a, K> Iterator for PersistentSetIterator<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        // The sentinel is last in order, so counting keys stops just before it.
        if self.remaining == 0 {
            return None;
        }
        let current = self.stack.pop()?;
        self.push_left_spine(current.right.as_ref());
        self.remaining -= 1;
        Some(&current.key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for PersistentSetIterator<'_, K> {
    fn len(&self) -> usize {
        self.remaining
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K: Clone> Clone for PersistentSet<K> {
    /// Copies the set by duplicating the root node only.
    ///
    /// Both children stay shared with `self`; later mutations of either set
    /// copy whatever they touch.
    fn clone(&self) -> Self {
        tracing::trace!(length = self.length, "copied set");
        Self {
            root: ReferenceCounter::new((*self.root).clone()),
            length: self.length,
        }
    }
}

impl<K: SentinelKey> Default for PersistentSet<K> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: SentinelKey> FromIterator<K> for PersistentSet<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<K: SentinelKey> Extend<K> for PersistentSet<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<'a, K> IntoIterator for &'a PersistentSet<K> {
    type Item = &'a K;
    type IntoIter = PersistentSetIterator<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: PartialEq> PartialEq for PersistentSet<K> {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length && self.iter().eq(other.iter())
    }
}

impl<K: Eq> Eq for PersistentSet<K> {}

impl<K: Hash> Hash for PersistentSet<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.length.hash(state);
        for key in self {
            key.hash(state);
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for PersistentSet<K> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

impl<K: fmt::Display> fmt::Display for PersistentSet<K> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for key in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{key}")?;
        }
        write!(formatter, "}}")
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<K> serde::Serialize for PersistentSet<K>
where
    K: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut sequence = serializer.serialize_seq(Some(self.len()))?;
        for key in self {
            sequence.serialize_element(key)?;
        }
        sequence.end()
    }
}

#[cfg(feature = "serde")]
struct PersistentSetVisitor<K> {
    marker: std::marker::PhantomData<K>,
}

#[cfg(feature = "serde")]
impl<'de, K> serde::de::Visitor<'de> for PersistentSetVisitor<K>
where
    K: serde::Deserialize<'de> + SentinelKey,
{
    type Value = PersistentSet<K>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence of keys")
    }

    fn visit_seq<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let mut set = PersistentSet::new();
        while let Some(key) = access.next_element::<K>()? {
            if key.is_sentinel() {
                return Err(serde::de::Error::custom(PersistentSetError::ReservedKey));
            }
            set.insert(key);
        }
        Ok(set)
    }
}

#[cfg(feature = "serde")]
impl<'de, K> serde::Deserialize<'de> for PersistentSet<K>
where
    K: serde::Deserialize<'de> + SentinelKey,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(PersistentSetVisitor {
            marker: std::marker::PhantomData,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================


// =============================================================================
// Send + Sync Tests (arc feature only)
// =============================================================================
