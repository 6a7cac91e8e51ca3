use std::cmp::Ordering;

use log::trace;

use super::node::{colorflip, rotate_left, rotate_right, size, Link, Node};

// Every function in here keeps the same invariant on the way down: the node
// we are about to recurse into is never a 2-node (a black node whose left
// child is also black). Red links get pushed down ahead of the recursion by
// `move_red_left`/`move_red_right`, and `fixup` cleans up on the way back.
//
// The descent is steered by in-order rank and the cached subtree sizes, never
// by the comparator: rotations keep a subtree's in-order sequence, so a rank
// relative to the local root stays valid while the tree is reshaped above it.

/// Removes the entry at in-order position `rank` of the subtree rooted at
/// `node`, returning the new local root and the removed value.
pub(super) fn delete<K, V>(mut node: Box<Node<K, V>>, rank: usize) -> (Link<K, V>, Option<V>) {
    if rank < size(&node.left) {
        if !node.left_is_red() && !node.left_left_is_red() {
            node = move_red_left(node);
        }
        let removed = match node.left.take() {
            Some(left) => {
                let (left, removed) = delete(left, rank);
                node.left = left;
                removed
            }
            None => None,
        };
        return (Some(fixup(node)), removed);
    }

    if node.left_is_red() {
        node = rotate_right(node);
    }

    // a match at the bottom of the tree, just drop the node
    if rank == size(&node.left) && node.right.is_none() {
        debug_assert!(node.left.is_none(), "black-unbalanced node with only a left child");
        let Node { left, value, .. } = *node;
        return (left, Some(value));
    }

    if node.right.as_ref().is_some_and(|right| !right.is_red()) && !node.right_left_is_red() {
        node = move_red_right(node);
    }

    let here = size(&node.left);
    let removed = match (rank.cmp(&here), node.right.take()) {
        (Ordering::Equal, Some(right)) => {
            // take the successor's entry and unlink the successor itself
            let (right, successor) = delete_min(right);
            node.right = right;
            let Node { key: successor_key, value: successor_value, .. } = *successor;
            node.key = successor_key;
            Some(std::mem::replace(&mut node.value, successor_value))
        }
        (Ordering::Greater, Some(right)) => {
            let (right, removed) = delete(right, rank - here - 1);
            node.right = right;
            removed
        }
        (_, right) => {
            trace!("delete: rank {rank} is past the end of the subtree");
            node.right = right;
            None
        }
    };

    (Some(fixup(node)), removed)
}

/// Unlinks the minimum of the subtree rooted at `node`, returning the new
/// local root and the detached minimum node.
pub(super) fn delete_min<K, V>(mut node: Box<Node<K, V>>) -> (Link<K, V>, Box<Node<K, V>>) {
    if node.left.is_none() {
        debug_assert!(node.right.is_none());
        let right = node.right.take();
        return (right, node);
    }
    if !node.left_is_red() && !node.left_left_is_red() {
        node = move_red_left(node);
    }
    match node.left.take() {
        Some(left) => {
            let (left, min) = delete_min(left);
            node.left = left;
            (Some(fixup(node)), min)
        }
        None => {
            let right = node.right.take();
            (right, node)
        }
    }
}

/// Unlinks the maximum of the subtree rooted at `node`.
pub(super) fn delete_max<K, V>(mut node: Box<Node<K, V>>) -> (Link<K, V>, Box<Node<K, V>>) {
    if node.left_is_red() {
        node = rotate_right(node);
    }
    if node.right.is_none() {
        debug_assert!(node.left.is_none());
        let left = node.left.take();
        return (left, node);
    }
    if !node.right_is_red() && !node.right_left_is_red() {
        node = move_red_right(node);
    }
    match node.right.take() {
        Some(right) => {
            let (right, max) = delete_max(right);
            node.right = right;
            (Some(fixup(node)), max)
        }
        None => {
            let left = node.left.take();
            (left, node)
        }
    }
}

/// Makes `node.left` or one of its children red, borrowing from the right
/// sibling when it has a red link to spare.
fn move_red_left<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    colorflip(&mut node);
    if node.right_left_is_red() {
        if let Some(right) = node.right.take() {
            node.right = Some(rotate_right(right));
        }
        node = rotate_left(node);
        colorflip(&mut node);
    }
    node
}

/// Makes `node.right` or one of its children red.
fn move_red_right<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    colorflip(&mut node);
    if node.left_left_is_red() {
        node = rotate_right(node);
        colorflip(&mut node);
    }
    node
}

/// Restores the left-leaning invariants on the way back up.
fn fixup<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    if node.right_is_red() {
        node = rotate_left(node);
    }
    if node.left_is_red() && node.left_left_is_red() {
        node = rotate_right(node);
    }
    if node.left_is_red() && node.right_is_red() {
        colorflip(&mut node);
    }
    node.update();
    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::non_concurrent::rbtree::compare::NaturalOrder;
    use crate::non_concurrent::rbtree::insert::insert;
    use crate::non_concurrent::rbtree::node::Color;

    fn build(keys: impl IntoIterator<Item = i32>) -> Link<i32, i32> {
        let mut root: Link<i32, i32> = None;
        for k in keys {
            insert(&mut root, k, -k, &NaturalOrder);
            if let Some(r) = root.as_mut() {
                r.color = Color::Black;
            }
        }
        root
    }

    fn remove(root: Link<i32, i32>, key: i32) -> (Link<i32, i32>, Option<i32>) {
        let mut present = vec![];
        keys(&root, &mut present);
        let Some(rank) = present.iter().position(|&k| k == key) else { return (root, None) };
        let Some(root) = root else { return (None, None) };
        let (mut root, removed) = delete(root, rank);
        if let Some(r) = root.as_mut() {
            r.color = Color::Black;
        }
        (root, removed)
    }

    fn keys(link: &Link<i32, i32>, out: &mut Vec<i32>) {
        if let Some(n) = link {
            keys(&n.left, out);
            out.push(n.key);
            keys(&n.right, out);
        }
    }

    /// Returns the black height, panicking on any broken invariant.
    fn check(link: &Link<i32, i32>) -> usize {
        let Some(n) = link else { return 0 };
        assert!(!n.right_is_red(), "red right link under {}", n.key);
        assert!(!(n.is_red() && n.left_is_red()), "two reds in a row at {}", n.key);
        let l = check(&n.left);
        let r = check(&n.right);
        assert_eq!(l, r, "black imbalance under {}", n.key);
        assert_eq!(n.size(), 1 + n.left.as_ref().map_or(0, |c| c.size()) + n.right.as_ref().map_or(0, |c| c.size()));
        l + if n.is_red() { 0 } else { 1 }
    }

    #[test]
    fn delete_only_node() {
        let (root, removed) = remove(build([7]), 7);
        assert!(root.is_none());
        assert_eq!(removed, Some(-7));
    }

    #[test]
    fn rank_past_the_end_removes_nothing() {
        let (mut root, removed) = delete(build(1..=10).unwrap(), 10);
        if let Some(r) = root.as_mut() {
            r.color = Color::Black;
        }
        assert_eq!(removed, None);
        check(&root);
        let mut out = vec![];
        keys(&root, &mut out);
        assert_eq!(out, (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn ranks_follow_the_reshaped_tree() {
        // every rank of a fresh tree removes the matching key
        for rank in 0..20 {
            let (mut root, removed) = delete(build(0..20).unwrap(), rank);
            if let Some(r) = root.as_mut() {
                r.color = Color::Black;
            }
            assert_eq!(removed, Some(-(rank as i32)));
            check(&root);
            assert_eq!(root.as_ref().unwrap().size(), 19);
        }
    }

    #[test]
    fn delete_internal_node_uses_successor() {
        let root = build(1..=15);
        let root_key = root.as_ref().unwrap().key;
        let (root, removed) = remove(root, root_key);
        assert_eq!(removed, Some(-root_key));
        check(&root);

        let mut out = vec![];
        keys(&root, &mut out);
        let expected: Vec<i32> = (1..=15).filter(|&k| k != root_key).collect();
        assert_eq!(out, expected);
    }

    #[test]
    fn delete_everything_in_every_order() {
        let orders: [Vec<i32>; 3] = [
            (0..64).collect(),
            (0..64).rev().collect(),
            (0..64).map(|i| (i * 37) % 64).collect(),
        ];
        for order in orders {
            let mut root = build(0..64);
            let mut remaining: Vec<i32> = (0..64).collect();
            for k in order {
                let (r, removed) = remove(root, k);
                root = r;
                assert_eq!(removed, Some(-k));
                remaining.retain(|&x| x != k);

                check(&root);
                let mut out = vec![];
                keys(&root, &mut out);
                assert_eq!(out, remaining);
            }
            assert!(root.is_none());
        }
    }

    #[test]
    fn delete_min_and_max_peel_the_ends() {
        let mut root = build([4, 2, 6, 1, 3, 5, 7]);
        let mut mins = vec![];
        for _ in 0..3 {
            let (r, min) = delete_min(root.unwrap());
            root = r;
            if let Some(r) = root.as_mut() {
                r.color = Color::Black;
            }
            check(&root);
            mins.push(min.key);
        }
        assert_eq!(mins, [1, 2, 3]);

        let mut maxes = vec![];
        for _ in 0..4 {
            let (r, max) = delete_max(root.unwrap());
            root = r;
            if let Some(r) = root.as_mut() {
                r.color = Color::Black;
            }
            check(&root);
            maxes.push(max.key);
        }
        assert_eq!(maxes, [7, 6, 5, 4]);
        assert!(root.is_none());
    }
}
