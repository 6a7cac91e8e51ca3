use std::cmp::Ordering;

use super::compare::Comparator;
use super::node::{colorflip, rotate_left, rotate_right, Link, Node};

/// Inserts `key` below `link`, returning the value that used to live at
/// `key`, if any.
///
/// Each level compares before it changes anything and only restructures once
/// the recursive call has returned, so a panicking comparator leaves every
/// node where it was. The root left in `link` may be red; the caller is
/// responsible for blackening the root of the whole tree.
pub(super) fn insert<K, V, C>(link: &mut Link<K, V>, key: K, value: V, cmp: &C) -> Option<V>
where
    C: Comparator<K> + ?Sized,
{
    // the only place a node is ever created
    let Some(node) = link.as_mut() else {
        *link = Some(Node::new(key, value));
        return None;
    };

    let ordering = cmp.compare(&key, &node.key);

    // split a temporary 4-node on the way down
    if node.left_is_red() && node.right_is_red() {
        colorflip(node);
    }

    let replaced = match ordering {
        Ordering::Equal => Some(std::mem::replace(&mut node.value, value)),
        Ordering::Less => insert(&mut node.left, key, value, cmp),
        Ordering::Greater => insert(&mut node.right, key, value, cmp),
    };

    if let Some(node) = link.take() {
        *link = Some(walk_up(node));
    }
    replaced
}

/// Local repairs on the way back up from an insertion.
fn walk_up<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    if node.right_is_red() && !node.left_is_red() {
        node = rotate_left(node);
    }
    if node.left_is_red() && node.left_left_is_red() {
        node = rotate_right(node);
    }
    // a 4-node left behind here would be a red right link once we return
    if node.left_is_red() && node.right_is_red() {
        colorflip(&mut node);
    }
    node.update();
    node
}
