use log::trace;

/// The color of the link from a node's parent to the node itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

impl Color {
    #[inline]
    pub(crate) fn flipped(self) -> Self {
        match self {
            Color::Red => Color::Black,
            Color::Black => Color::Red,
        }
    }
}

pub(crate) type Link<K, V> = Option<Box<Node<K, V>>>;

pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) color: Color,
    pub(crate) left: Link<K, V>,
    pub(crate) right: Link<K, V>,
    // both of these are derived from the children, see `update`
    size: usize,
    height: usize,
}

impl<K, V> Node<K, V> {
    /// New nodes always hang off a red link.
    pub(crate) fn new(key: K, value: V) -> Box<Self> {
        Box::new(Self {
            key,
            value,
            color: Color::Red,
            left: None,
            right: None,
            size: 1,
            height: 1,
        })
    }

    #[inline]
    pub(crate) fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub(crate) fn height(&self) -> usize {
        self.height
    }

    /// Re-derives `size` and `height` from the children. Has to be called
    /// whenever a child link of this node changes.
    #[inline]
    pub(crate) fn update(&mut self) {
        self.size = 1 + size(&self.left) + size(&self.right);
        self.height = 1 + height(&self.left).max(height(&self.right));
    }

    #[cfg(test)]
    pub(crate) fn force_height(&mut self, height: usize) {
        self.height = height;
    }

    #[inline]
    pub(crate) fn is_red(&self) -> bool {
        self.color == Color::Red
    }

    pub(crate) fn left_is_red(&self) -> bool {
        is_red(&self.left)
    }

    pub(crate) fn right_is_red(&self) -> bool {
        is_red(&self.right)
    }

    /// Whether the left child's left child is red. Says nothing about the
    /// left child itself.
    pub(crate) fn left_left_is_red(&self) -> bool {
        self.left.as_ref().is_some_and(|left| left.left_is_red())
    }

    pub(crate) fn right_left_is_red(&self) -> bool {
        self.right.as_ref().is_some_and(|right| right.left_is_red())
    }
}

#[inline]
pub(crate) fn is_red<K, V>(link: &Link<K, V>) -> bool {
    link.as_ref().is_some_and(|n| n.is_red())
}

#[inline]
pub(crate) fn size<K, V>(link: &Link<K, V>) -> usize {
    link.as_ref().map_or(0, |n| n.size)
}

#[inline]
pub(crate) fn height<K, V>(link: &Link<K, V>) -> usize {
    link.as_ref().map_or(0, |n| n.height)
}

//              |                         |
//             node                       x
//             /  \                      / \
//            /   (r)                  (r)  \
//           /      \                  /     \
//         left      x              node      xr
//                  / \             /  \
//                xl   xr        left   xl
//
/// Turns a red right link into a red left link. The promoted node takes over
/// the color of the old local root, and the old local root becomes red.
pub(crate) fn rotate_left<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    debug_assert!(node.right_is_red(), "rotate_left on a black right link");
    let Some(mut x) = node.right.take() else { return node };
    trace!("rotate_left: subtree of size {}", node.size);

    node.right = x.left.take();
    x.color = node.color;
    node.color = Color::Red;

    // bottom-up: `node` is now a child of `x`
    node.update();
    x.left = Some(node);
    x.update();
    x
}

//              |                         |
//             node                       x
//             /  \                      / \
//           (r)   \                   (r)  \
//           /      \                  /     \
//          x      right             xl     node
//         / \                              /  \
//       xl   xr                          xr   right
//
/// Mirror of [`rotate_left`], for a red left link.
pub(crate) fn rotate_right<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    debug_assert!(node.left_is_red(), "rotate_right on a black left link");
    let Some(mut x) = node.left.take() else { return node };
    trace!("rotate_right: subtree of size {}", node.size);

    node.left = x.right.take();
    x.color = node.color;
    node.color = Color::Red;

    node.update();
    x.right = Some(node);
    x.update();
    x
}

/// Toggles the color of `node` and both of its children. Never touches the
/// shape of the tree.
pub(crate) fn colorflip<K, V>(node: &mut Node<K, V>) {
    trace!("colorflip: subtree of size {}", node.size);
    node.color = node.color.flipped();
    if let Some(left) = node.left.as_mut() {
        left.color = left.color.flipped();
    }
    if let Some(right) = node.right.as_mut() {
        right.color = right.color.flipped();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn black(key: i32, left: Link<i32, ()>, right: Link<i32, ()>) -> Box<Node<i32, ()>> {
        let mut n = Node::new(key, ());
        n.color = Color::Black;
        n.left = left;
        n.right = right;
        n.update();
        n
    }

    fn red(key: i32, left: Link<i32, ()>, right: Link<i32, ()>) -> Box<Node<i32, ()>> {
        let mut n = black(key, left, right);
        n.color = Color::Red;
        n
    }

    fn keys_in_order(link: &Link<i32, ()>, out: &mut Vec<i32>) {
        if let Some(n) = link {
            keys_in_order(&n.left, out);
            out.push(n.key);
            keys_in_order(&n.right, out);
        }
    }

    #[test]
    fn new_node_is_red_leaf() {
        let n = Node::new("k", 1);
        assert!(n.is_red());
        assert_eq!(n.size(), 1);
        assert_eq!(n.height(), 1);
        assert!(n.left.is_none() && n.right.is_none());
    }

    #[test]
    fn rotate_left_promotes_right_child() {
        // 2 -> (1, red 4 -> (3, 5))
        let tree = black(2,
            Some(black(1, None, None)),
            Some(red(4, Some(black(3, None, None)), Some(black(5, None, None)))),
        );
        assert_eq!(tree.size(), 5);
        assert_eq!(tree.height(), 3);

        let tree = rotate_left(tree);
        assert_eq!(tree.key, 4);
        assert_eq!(tree.color, Color::Black);
        assert_eq!(tree.size(), 5);
        assert_eq!(tree.height(), 3);

        let left = tree.left.as_ref().unwrap();
        assert_eq!(left.key, 2);
        assert_eq!(left.color, Color::Red);
        assert_eq!(left.size(), 3);
        assert_eq!(left.right.as_ref().unwrap().key, 3);
        assert_eq!(tree.right.as_ref().unwrap().key, 5);

        let mut keys = vec![];
        keys_in_order(&Some(tree), &mut keys);
        assert_eq!(keys, [1, 2, 3, 4, 5]);
    }

    #[test]
    fn rotate_right_promotes_left_child() {
        let tree = black(4,
            Some(red(2, Some(black(1, None, None)), Some(black(3, None, None)))),
            Some(black(5, None, None)),
        );

        let tree = rotate_right(tree);
        assert_eq!(tree.key, 2);
        assert_eq!(tree.color, Color::Black);
        assert_eq!(tree.size(), 5);

        let right = tree.right.as_ref().unwrap();
        assert_eq!(right.key, 4);
        assert_eq!(right.color, Color::Red);
        assert_eq!(right.size(), 3);
        assert_eq!(right.left.as_ref().unwrap().key, 3);

        let mut keys = vec![];
        keys_in_order(&Some(tree), &mut keys);
        assert_eq!(keys, [1, 2, 3, 4, 5]);
    }

    #[test]
    fn rotations_are_inverse() {
        let tree = black(2, Some(black(1, None, None)), Some(red(3, None, None)));
        let tree = rotate_right(rotate_left(tree));
        assert_eq!(tree.key, 2);
        assert_eq!(tree.color, Color::Black);
        assert!(tree.right_is_red());
        assert_eq!(tree.height(), 2);
    }

    #[test]
    fn colorflip_toggles_three_nodes() {
        let mut tree = black(2, Some(red(1, None, None)), Some(red(3, None, None)));
        colorflip(&mut tree);
        assert!(tree.is_red());
        assert!(!tree.left_is_red());
        assert!(!tree.right_is_red());
        assert_eq!(tree.size(), 3);

        colorflip(&mut tree);
        assert!(!tree.is_red());
        assert!(tree.left_is_red() && tree.right_is_red());
    }

    #[test]
    fn grandchild_colors() {
        let tree = black(3, Some(red(2, Some(red(1, None, None)), None)), None);
        assert!(tree.left_is_red() && tree.left_left_is_red());
        assert!(!tree.left.as_ref().unwrap().left_left_is_red());
        assert!(!tree.right_left_is_red());

        // a black left child can still have a red left child
        let tree = black(3, Some(black(2, Some(red(1, None, None)), None)), Some(black(4, None, None)));
        assert!(!tree.left_is_red() && tree.left_left_is_red());
    }
}
