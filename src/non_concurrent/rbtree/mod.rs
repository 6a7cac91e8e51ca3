//! An ordered map backed by a left-leaning red-black tree.
//!
//! Red links only ever lean left, so every 3-node of the equivalent 2-3 tree
//! is a black node with a red left child, and the tree stays within
//! `2*log₂(n+1)` of perfectly balanced.
//!
//! ```
//! use llrb::RBTree;
//!
//! let mut states = RBTree::new();
//! states.put("CA", "California");
//! states.put("MA", "Massachusetts");
//! states.put("GA", "Georgia");
//!
//! assert_eq!(states.size(), 3);
//! assert_eq!(states.min_key(), Some(&"CA"));
//! assert_eq!(states.delete(&"GA"), Some("Georgia"));
//! assert!(!states.has_key(&"GA"));
//! ```

use std::cmp::Ordering;
use std::fmt;

use log::{debug, trace};

mod compare;
mod delete;
mod insert;
mod node;
mod traverse;
mod validate;

pub use compare::{Comparator, NaturalOrder};
pub use traverse::Iter;
pub use validate::{InvariantViolation, TreeStats};

use node::{Color, Link, Node};

// PROVE: any node with height `h` has black height at least `h/2`
// PROVE: the subtree located at any node `x` contains at least `2^bh(x) - 1` nodes (use induction)
// LEMMA: An RBTree with `n` internal nodes has height at most `2*log₂(n+1)`

/// A map from keys to values, kept sorted by `C`.
///
/// Not thread safe in any interesting way: every mutation takes `&mut self`,
/// so sharing one between threads needs an external lock.
pub struct RBTree<K, V, C = NaturalOrder> {
    root: Link<K, V>,
    /// How many times the black height of the tree has grown.
    height_black: usize,
    cmp: C,
}

impl<K: Ord, V> RBTree<K, V> {
    /// An empty tree ordered by `K`'s [`Ord`] impl.
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<K, V, C: Comparator<K>> RBTree<K, V, C> {
    /// An empty tree ordered by `cmp`.
    ///
    /// `cmp` has to be a total order, otherwise lookups will miss and the
    /// tree will slowly stop being balanced.
    pub fn with_comparator(cmp: C) -> Self {
        Self { root: None, height_black: 0, cmp }
    }

    /// Number of entries. O(1)
    #[inline]
    pub fn size(&self) -> usize {
        node::size(&self.root)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Length of the longest root-to-leaf path, in nodes. O(1)
    #[inline]
    pub fn height(&self) -> usize {
        node::height(&self.root)
    }

    /// How many times an insertion has grown the black height of the tree.
    ///
    /// Deletions never decrement this, so it is only a diagnostic.
    pub fn height_black(&self) -> usize {
        self.height_black
    }

    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Inserts `key`, overwriting the value if it is already present.
    ///
    /// Always hands back the `value` that was passed in, never the one it
    /// replaced. Use [`insert`](Self::insert) to get the old one.
    ///
    /// Complexity: O(log(n))
    pub fn put(&mut self, key: K, value: V) -> V
    where
        V: Clone,
    {
        self.insert(key, value.clone());
        value
    }

    /// Inserts `key`, returning the value it replaced, if any.
    ///
    /// Complexity: O(log(n))
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let replaced = insert::insert(&mut self.root, key, value, &self.cmp);
        if let Some(root) = self.root.as_mut().filter(|root| root.is_red()) {
            root.color = Color::Black;
            self.height_black += 1;
            debug!("black height grew to {} ({} entries)", self.height_black, root.size());
        }
        self.check_invariants("insert");
        replaced
    }

    /// Complexity: O(log(n))
    pub fn get(&self, key: &K) -> Option<&V> {
        self.find(key).map(|node| &node.value)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let mut link = &mut self.root;
        while let Some(node) = link {
            link = match self.cmp.compare(key, &node.key) {
                Ordering::Less => &mut node.left,
                Ordering::Greater => &mut node.right,
                Ordering::Equal => return Some(&mut node.value),
            };
        }
        None
    }

    #[inline]
    pub fn has_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    fn find(&self, key: &K) -> Option<&Node<K, V>> {
        let mut link = &self.root;
        while let Some(node) = link {
            link = match self.cmp.compare(key, &node.key) {
                Ordering::Less => &node.left,
                Ordering::Greater => &node.right,
                Ordering::Equal => return Some(node),
            };
        }
        None
    }

    /// In-order position of `key`, if present.
    fn rank(&self, key: &K) -> Option<usize> {
        let mut rank = 0;
        let mut link = &self.root;
        while let Some(node) = link {
            link = match self.cmp.compare(key, &node.key) {
                Ordering::Less => &node.left,
                Ordering::Greater => {
                    rank += node::size(&node.left) + 1;
                    &node.right
                }
                Ordering::Equal => return Some(rank + node::size(&node.left)),
            };
        }
        None
    }

    /// Complexity: O(log(n))
    pub fn min_key(&self) -> Option<&K> {
        traverse::min(&self.root).map(|node| &node.key)
    }

    /// Complexity: O(log(n))
    pub fn max_key(&self) -> Option<&K> {
        traverse::max(&self.root).map(|node| &node.key)
    }

    pub fn min(&self) -> Option<(&K, &V)> {
        traverse::min(&self.root).map(|node| (&node.key, &node.value))
    }

    pub fn max(&self) -> Option<(&K, &V)> {
        traverse::max(&self.root).map(|node| (&node.key, &node.value))
    }

    /// Removes `key`, returning its value if it was present.
    ///
    /// The comparator only runs during a read-only search, so if it panics
    /// the tree is left untouched.
    ///
    /// Complexity: O(log(n))
    pub fn delete(&mut self, key: &K) -> Option<V> {
        let Some(rank) = self.rank(key) else {
            trace!("delete: key not present");
            return None;
        };
        let root = self.root.take()?;
        let (root, removed) = delete::delete(root, rank);
        self.set_root(root);
        self.check_invariants("delete");
        removed
    }

    /// Removes and returns the entry with the smallest key.
    pub fn delete_min(&mut self) -> Option<(K, V)> {
        let root = self.root.take()?;
        let (root, min) = delete::delete_min(root);
        self.set_root(root);
        self.check_invariants("delete_min");
        let Node { key, value, .. } = *min;
        Some((key, value))
    }

    /// Removes and returns the entry with the largest key.
    pub fn delete_max(&mut self) -> Option<(K, V)> {
        let root = self.root.take()?;
        let (root, max) = delete::delete_max(root);
        self.set_root(root);
        self.check_invariants("delete_max");
        let Node { key, value, .. } = *max;
        Some((key, value))
    }

    fn set_root(&mut self, mut root: Link<K, V>) {
        if let Some(root) = root.as_mut() {
            root.color = Color::Black;
        }
        self.root = root;
    }

    pub fn clear(&mut self) {
        self.root = None;
        self.height_black = 0;
    }

    /// Calls `visitor` on every entry in ascending key order.
    ///
    /// Complexity: O(n)
    pub fn each<F: FnMut(&K, &V)>(&self, mut visitor: F) {
        traverse::each(&self.root, &mut visitor);
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.root)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }

    /// Checks every structural invariant of the tree, returning some
    /// statistics about its shape if they all hold.
    ///
    /// Complexity: O(n)
    pub fn validate(&self) -> Result<TreeStats, InvariantViolation> {
        validate::validate(&self.root, &self.cmp)
    }

    #[cfg(all(debug_assertions, feature = "check-invariants"))]
    fn check_invariants(&self, op: &str) {
        if let Err(e) = self.validate() {
            debug!("invariant broken after `{op}`: {e}");
            panic!("RBTree invariant broken after `{op}`: {e}");
        }
    }

    #[cfg(not(all(debug_assertions, feature = "check-invariants")))]
    #[inline(always)]
    fn check_invariants(&self, _op: &str) {}
}

impl<K, V, C: Comparator<K> + Default> Default for RBTree<K, V, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<K, V, C: Comparator<K>> Extend<(K, V)> for RBTree<K, V, C> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, C: Comparator<K> + Default> FromIterator<(K, V)> for RBTree<K, V, C> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Self::default();
        tree.extend(iter);
        tree
    }
}

impl<'a, K, V, C: Comparator<K>> IntoIterator for &'a RBTree<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C: Comparator<K>> fmt::Debug for RBTree<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
