//! Path-copying binary search tree nodes.
//!
//! A [`Node`] never holds a parent link. Every node may be shared by any
//! number of set versions and cursors, so a node is only written through a
//! handle obtained from [`ReferenceCounter::make_mut`], which duplicates it
//! first whenever anything else can still observe it. Unchanged subtrees stay
//! shared with every earlier version.
//!
//! Successor and predecessor queries that cannot be answered by descending
//! into a child are answered by searching again from the root
//! ([`successor_from`] and [`predecessor_from`]).

use super::ReferenceCounter;
use std::cmp::Ordering;

/// Shared handle to a node.
pub(crate) type Link<K> = ReferenceCounter<Node<K>>;

/// A single tree node.
///
/// `Clone` is the shallow duplicate used by path copying: the copy gets its
/// own key and shares both children with the original.
#[derive(Clone)]
pub(crate) struct Node<K> {
    pub(crate) key: K,
    pub(crate) left: Option<Link<K>>,
    pub(crate) right: Option<Link<K>>,
}

impl<K> Node<K> {
    /// Creates a node with no children.
    pub(crate) const fn leaf(key: K) -> Self {
        Self {
            key,
            left: None,
            right: None,
        }
    }
}

// =============================================================================
// Read-only Descent
// =============================================================================

/// Finds the node holding `key` below (and including) `root`.
pub(crate) fn find<'a, K: Ord>(root: &'a Link<K>, key: &K) -> Option<&'a Link<K>> {
    let mut current = root;
    loop {
        let next = match key.cmp(&current.key) {
            Ordering::Equal => return Some(current),
            Ordering::Less => current.left.as_ref(),
            Ordering::Greater => current.right.as_ref(),
        };
        current = next?;
    }
}

/// Follows left children down to the smallest node of a subtree.
pub(crate) fn leftmost<K>(root: &Link<K>) -> &Link<K> {
    let mut current = root;
    while let Some(left) = current.left.as_ref() {
        current = left;
    }
    current
}

/// Follows right children down to the largest node of a subtree.
pub(crate) fn rightmost<K>(root: &Link<K>) -> &Link<K> {
    let mut current = root;
    while let Some(right) = current.right.as_ref() {
        current = right;
    }
    current
}

/// Searches from `node` for the closest key strictly greater than `key`.
///
/// Only meaningful when the node holding `key` has no right child. The last
/// node left of which the search turned is the answer; if the search never
/// turns left, `node` itself is returned.
pub(crate) fn successor_from<'a, K: Ord>(node: &'a Link<K>, key: &K) -> &'a Link<K> {
    let mut best = node;
    let mut current = Some(node);
    while let Some(candidate) = current {
        if candidate.key > *key {
            best = candidate;
            current = candidate.left.as_ref();
        } else {
            current = candidate.right.as_ref();
        }
    }
    best
}

/// Mirror of [`successor_from`]: closest key strictly less than `key`.
pub(crate) fn predecessor_from<'a, K: Ord>(node: &'a Link<K>, key: &K) -> &'a Link<K> {
    let mut best = node;
    let mut current = Some(node);
    while let Some(candidate) = current {
        if candidate.key < *key {
            best = candidate;
            current = candidate.right.as_ref();
        } else {
            current = candidate.left.as_ref();
        }
    }
    best
}

// =============================================================================
// Path-copying Mutation
// =============================================================================

/// Inserts `key` below `slot`, privatizing every node on the way down.
///
/// Returns the node that holds `key` afterwards together with `true` when a
/// new leaf was created. When the key is already present the existing node is
/// returned and nothing below it is copied.
pub(crate) fn insert<K: Ord + Clone>(mut slot: &mut Link<K>, key: K) -> (Link<K>, bool) {
    loop {
        let ordering = key.cmp(&slot.key);
        if ordering == Ordering::Equal {
            return (slot.clone(), false);
        }

        let node = ReferenceCounter::make_mut(slot);
        let child = if ordering == Ordering::Less {
            &mut node.left
        } else {
            &mut node.right
        };

        match child {
            Some(existing) => slot = existing,
            None => {
                let leaf = ReferenceCounter::new(Node::leaf(key));
                *child = Some(leaf.clone());
                return (leaf, true);
            }
        }
    }
}

/// Unlinks the node holding `key` from the subtree below `parent`.
///
/// `parent` must already be private to the version under mutation, and the
/// key must be present strictly below it. Returns `false` if the search ran
/// off the tree, in which case only the copied path has changed.
pub(crate) fn erase_below<K: Ord + Clone>(mut parent: &mut Node<K>, key: &K) -> bool {
    loop {
        let slot = if *key < parent.key {
            &mut parent.left
        } else {
            &mut parent.right
        };

        if slot.as_ref().is_some_and(|child| child.key == *key) {
            *slot = slot.take().and_then(splice_out);
            return true;
        }

        match slot {
            Some(child) => parent = ReferenceCounter::make_mut(child),
            None => return false,
        }
    }
}

/// Builds the subtree that takes the place of `target` once it is removed.
///
/// With a left subtree, that subtree is privatized down its right spine and
/// `target`'s right subtree is hung off the in-order predecessor. Without one,
/// the right subtree (possibly empty) takes its place unchanged. Children of
/// a `target` no other version holds are moved rather than shared.
fn splice_out<K: Clone>(target: Link<K>) -> Option<Link<K>> {
    let (left, right) = match ReferenceCounter::try_unwrap(target) {
        Ok(mut node) => (node.left.take(), node.right.take()),
        Err(shared) => (shared.left.clone(), shared.right.clone()),
    };

    match left {
        None => right,
        Some(mut replacement) => {
            attach_rightmost(&mut replacement, right);
            Some(replacement)
        }
    }
}

fn attach_rightmost<K: Clone>(slot: &mut Link<K>, subtree: Option<Link<K>>) {
    let mut node = ReferenceCounter::make_mut(slot);
    loop {
        match node.right {
            Some(ref mut right) => node = ReferenceCounter::make_mut(right),
            None => {
                node.right = subtree;
                return;
            }
        }
    }
}

// =============================================================================
// Teardown
// =============================================================================

impl<K> Drop for Node<K> {
    // Unbalanced trees can be as deep as they are large; release exclusively
    // owned descendants from a work list instead of recursing.
    fn drop(&mut self) {
        let mut pending: Vec<Link<K>> = Vec::new();
        pending.extend(self.left.take());
        pending.extend(self.right.take());

        while let Some(link) = pending.pop() {
            if let Ok(mut node) = ReferenceCounter::try_unwrap(link) {
                pending.extend(node.left.take());
                pending.extend(node.right.take());
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn build(keys: &[i32]) -> Link<i32> {
        let mut root = ReferenceCounter::new(Node::leaf(i32::MAX));
        for &key in keys {
            insert(&mut root, key);
        }
        root
    }

    fn in_order(root: &Link<i32>, output: &mut Vec<i32>) {
        if let Some(left) = root.left.as_ref() {
            in_order(left, output);
        }
        output.push(root.key);
        if let Some(right) = root.right.as_ref() {
            in_order(right, output);
        }
    }

    fn keys_of(root: &Link<i32>) -> Vec<i32> {
        let mut output = Vec::new();
        in_order(root, &mut output);
        output
    }

    #[rstest]
    fn test_find_present_and_absent() {
        let root = build(&[5, 3, 8]);
        assert_eq!(find(&root, &3).map(|node| node.key), Some(3));
        assert_eq!(find(&root, &8).map(|node| node.key), Some(8));
        assert!(find(&root, &4).is_none());
    }

    #[rstest]
    fn test_insert_reports_existing_key() {
        let mut root = build(&[5, 3]);
        let (node, inserted) = insert(&mut root, 3);
        assert!(!inserted);
        assert_eq!(node.key, 3);
        assert_eq!(keys_of(&root), vec![3, 5, i32::MAX]);
    }

    #[rstest]
    fn test_insert_copies_only_the_search_path() {
        let original = build(&[50, 20, 80, 10, 30]);
        let mut copy = ReferenceCounter::new((*original).clone());

        insert(&mut copy, 25);

        let original_fifty = original.left.as_ref().map(ReferenceCounter::clone);
        let copied_fifty = copy.left.as_ref().map(ReferenceCounter::clone);
        let (Some(original_fifty), Some(copied_fifty)) = (original_fifty, copied_fifty) else {
            panic!("50 must sit left of the sentinel");
        };
        assert!(!ReferenceCounter::ptr_eq(&original_fifty, &copied_fifty));

        // 80 lies off the path and stays shared.
        let shared = original_fifty
            .right
            .as_ref()
            .zip(copied_fifty.right.as_ref())
            .is_some_and(|(left, right)| ReferenceCounter::ptr_eq(left, right));
        assert!(shared);

        assert_eq!(keys_of(&original), vec![10, 20, 30, 50, 80, i32::MAX]);
        assert_eq!(keys_of(&copy), vec![10, 20, 25, 30, 50, 80, i32::MAX]);
    }

    #[rstest]
    #[case(&[5, 3, 8, 1, 4], 3, vec![1, 4, 5, 8])]
    #[case(&[5, 3, 8, 1, 4], 1, vec![3, 4, 5, 8])]
    #[case(&[5, 3, 8, 1, 4], 5, vec![1, 3, 4, 8])]
    #[case(&[5, 3, 8, 1, 4], 8, vec![1, 3, 4, 5])]
    #[case(&[5, 3, 8, 6, 9, 7], 8, vec![3, 5, 6, 7, 9])]
    #[case(&[5], 5, vec![])]
    fn test_erase_keeps_order(
        #[case] keys: &[i32],
        #[case] target: i32,
        #[case] expected: Vec<i32>,
    ) {
        let mut root = build(keys);
        assert!(erase_below(ReferenceCounter::make_mut(&mut root), &target));

        let mut expected = expected;
        expected.push(i32::MAX);
        assert_eq!(keys_of(&root), expected);
    }

    #[rstest]
    fn test_erase_does_not_disturb_shared_version() {
        let original = build(&[5, 3, 8, 1, 4]);
        let mut copy = ReferenceCounter::new((*original).clone());

        assert!(erase_below(ReferenceCounter::make_mut(&mut copy), &3));

        assert_eq!(keys_of(&original), vec![1, 3, 4, 5, 8, i32::MAX]);
        assert_eq!(keys_of(&copy), vec![1, 4, 5, 8, i32::MAX]);
    }

    #[rstest]
    fn test_erase_missing_key_reports_false() {
        let mut root = build(&[5, 3]);
        assert!(!erase_below(ReferenceCounter::make_mut(&mut root), &4));
        assert_eq!(keys_of(&root), vec![3, 5, i32::MAX]);
    }

    #[rstest]
    #[case(1, 3)]
    #[case(4, 5)]
    #[case(8, i32::MAX)]
    fn test_successor_from_root(#[case] key: i32, #[case] expected: i32) {
        let root = build(&[5, 3, 8, 1, 4]);
        assert_eq!(successor_from(&root, &key).key, expected);
    }

    #[rstest]
    #[case(4, 3)]
    #[case(8, 5)]
    fn test_predecessor_from_root(#[case] key: i32, #[case] expected: i32) {
        let root = build(&[5, 3, 8, 1, 4]);
        assert_eq!(predecessor_from(&root, &key).key, expected);
    }

    #[rstest]
    fn test_leftmost_and_rightmost() {
        let root = build(&[5, 3, 8, 1, 4]);
        assert_eq!(leftmost(&root).key, 1);
        assert_eq!(rightmost(&root).key, i32::MAX);
    }

    /// Sentinel root over a right-leaning chain `0 -> 1 -> ... -> size - 1`,
    /// the shape ascending inserts produce, built without descending.
    fn ascending_spine(size: u32) -> Link<u32> {
        let mut chain: Option<Link<u32>> = None;
        for key in (0..size).rev() {
            chain = Some(ReferenceCounter::new(Node {
                key,
                left: None,
                right: chain,
            }));
        }
        ReferenceCounter::new(Node {
            key: u32::MAX,
            left: chain,
            right: None,
        })
    }

    const DEEP: u32 = 100_000;

    #[rstest]
    fn test_successor_and_predecessor_on_deep_spine() {
        let root = ascending_spine(DEEP);
        assert_eq!(successor_from(&root, &(DEEP - 1)).key, u32::MAX);
        assert_eq!(predecessor_from(&root, &(DEEP - 1)).key, DEEP - 2);
        assert_eq!(successor_from(&root, &u32::MAX).key, u32::MAX);
    }

    #[rstest]
    fn test_insert_and_erase_at_bottom_of_deep_spine() {
        let mut root = ascending_spine(DEEP);
        let snapshot = ReferenceCounter::new((*root).clone());

        let (node, inserted) = insert(&mut root, DEEP);
        assert!(inserted);
        assert_eq!(node.key, DEEP);
        assert!(find(&snapshot, &DEEP).is_none());

        assert!(erase_below(ReferenceCounter::make_mut(&mut root), &(DEEP - 1)));
        assert!(find(&root, &(DEEP - 1)).is_none());
        assert!(find(&snapshot, &(DEEP - 1)).is_some());
        assert_eq!(predecessor_from(&root, &DEEP).key, DEEP - 2);

        drop(snapshot);
        drop(root);
    }

    #[rstest]
    fn test_erase_with_left_subtree_on_deep_spine() {
        // Erasing the top of the chain splices in its right subtree.
        let mut root = ascending_spine(DEEP);
        assert!(erase_below(ReferenceCounter::make_mut(&mut root), &0));
        assert_eq!(leftmost(&root).key, 1);

        // The sentinel has the whole chain on its left, so splicing it out of
        // a scratch parent walks the full right spine.
        let mut parent = Node {
            key: 0,
            left: None,
            right: Some(root),
        };
        assert!(erase_below(&mut parent, &u32::MAX));
        let Some(replacement) = parent.right.as_ref() else {
            panic!("the chain must replace the erased node");
        };
        assert_eq!(rightmost(replacement).key, DEEP - 1);
    }

    #[rstest]
    fn test_drop_deep_tree() {
        let root = ascending_spine(DEEP);
        assert_eq!(leftmost(&root).key, 0);
        assert_eq!(rightmost(&root).key, u32::MAX);
        drop(root);
    }
}
