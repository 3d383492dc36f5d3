//! Key types usable in a [`PersistentSet`](super::PersistentSet).

/// A totally ordered key type with a reserved maximum value.
///
/// Every set holds exactly one node with [`SentinelKey::SENTINEL`]. It is the
/// last node in order and marks the `end()` position. The sentinel value is
/// therefore reserved: inserting it is a no-op that reports the key as
/// already present.
///
/// # Implementing SentinelKey
///
/// For custom key types, provide a value that compares greater than every
/// key that will be inserted:
///
/// ```rust
/// use persistent_set::persistent::{PersistentSet, SentinelKey};
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
/// struct Score(u8);
///
/// impl SentinelKey for Score {
///     const SENTINEL: Self = Score(u8::MAX);
/// }
///
/// let set: PersistentSet<Score> = [Score(7), Score(3)].into_iter().collect();
/// assert_eq!(set.first(), Some(&Score(3)));
/// assert_eq!(<char as SentinelKey>::SENTINEL, char::MAX);
/// ```
pub trait SentinelKey: Ord + Clone {
    /// The maximum value, greater than every key that may be inserted.
    const SENTINEL: Self;

    /// Returns `true` if `self` is the reserved sentinel value.
    #[inline]
    fn is_sentinel(&self) -> bool {
        *self == Self::SENTINEL
    }
}

macro_rules! impl_sentinel_key {
    ($($key:ty),* $(,)?) => {
        $(
            impl SentinelKey for $key {
                const SENTINEL: Self = Self::MAX;
            }
        )*
    };
}

impl_sentinel_key!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, char,
);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_sentinel_is_maximum() {
        assert_eq!(i32::SENTINEL, i32::MAX);
        assert_eq!(u64::SENTINEL, u64::MAX);
        assert!(i64::MAX.is_sentinel());
        assert!(!0_i64.is_sentinel());
    }
}
