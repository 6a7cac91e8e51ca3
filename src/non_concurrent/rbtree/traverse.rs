use std::iter::FusedIterator;

use super::node::{Link, Node};

/// In-order walk: left subtree, node, right subtree.
pub(super) fn each<K, V>(link: &Link<K, V>, visitor: &mut dyn FnMut(&K, &V)) {
    if let Some(node) = link {
        each(&node.left, visitor);
        visitor(&node.key, &node.value);
        each(&node.right, visitor);
    }
}

pub(super) fn min<K, V>(link: &Link<K, V>) -> Option<&Node<K, V>> {
    let mut node = link.as_deref()?;
    while let Some(left) = node.left.as_deref() {
        node = left;
    }
    Some(node)
}

pub(super) fn max<K, V>(link: &Link<K, V>) -> Option<&Node<K, V>> {
    let mut node = link.as_deref()?;
    while let Some(right) = node.right.as_deref() {
        node = right;
    }
    Some(node)
}

/// Iterator over the entries of an [`RBTree`](super::RBTree) in ascending key order.
pub struct Iter<'a, K, V> {
    // the path of nodes whose left subtrees have been visited but which
    // haven't been yielded yet
    stack: Vec<&'a Node<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(super) fn new(root: &'a Link<K, V>) -> Self {
        let mut stack = Vec::with_capacity(root.as_ref().map_or(0, |n| n.height()));
        push_left(root, &mut stack);
        Self {
            stack,
            remaining: root.as_ref().map_or(0, |n| n.size()),
        }
    }
}

fn push_left<'a, K, V>(mut link: &'a Link<K, V>, stack: &mut Vec<&'a Node<K, V>>) {
    while let Some(node) = link {
        stack.push(node);
        link = &node.left;
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        push_left(&node.right, &mut self.stack);
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}
