use std::cmp::Ordering;
use std::fmt;

use super::compare::Comparator;
use super::node::{Link, Node};
use super::traverse::Iter;

/// A broken structural invariant, as found by [`RBTree::validate`](super::RBTree::validate).
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantViolation {
    /// The `position`th entry (in-order, 0-based) doesn't compare strictly
    /// greater than the one before it.
    OutOfOrder { position: usize },
    RedRoot,
    RedRightLink,
    ConsecutiveReds,
    /// Two sibling subtrees with a different number of black links.
    UnbalancedBlacks { left: usize, right: usize },
    StaleSize { cached: usize, actual: usize },
    StaleHeight { cached: usize, actual: usize },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfOrder { position } => write!(f, "entry #{position} is out of order"),
            Self::RedRoot => write!(f, "the root is red"),
            Self::RedRightLink => write!(f, "found a red right link"),
            Self::ConsecutiveReds => write!(f, "found two red links in a row"),
            Self::UnbalancedBlacks { left, right } => {
                write!(f, "unbalanced black links (left: {left}, right: {right})")
            }
            Self::StaleSize { cached, actual } => {
                write!(f, "cached subtree size {cached} should be {actual}")
            }
            Self::StaleHeight { cached, actual } => {
                write!(f, "cached subtree height {cached} should be {actual}")
            }
        }
    }
}

impl std::error::Error for InvariantViolation {}

/// Shape of a tree that passed validation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TreeStats {
    /// Number of entries.
    pub entries: usize,
    /// Longest root-to-leaf path, counted in nodes.
    pub height: usize,
    /// Number of black links on every root-to-leaf path.
    pub black_height: usize,
    /// Number of red links in the whole tree.
    pub red_links: usize,
}

pub(super) fn validate<K, V, C>(link: &Link<K, V>, cmp: &C) -> Result<TreeStats, InvariantViolation>
where
    C: Comparator<K> + ?Sized,
{
    let mut stats = TreeStats::default();
    let Some(root) = link.as_deref() else { return Ok(stats) };

    if root.is_red() {
        return Err(InvariantViolation::RedRoot);
    }

    let shape = check_node(root, false, &mut stats)?;
    stats.entries = shape.size;
    stats.height = shape.height;
    stats.black_height = shape.blacks;

    // strictly ascending in-order <=> every left key < node key < every right key
    let mut prev: Option<&K> = None;
    for (position, (key, _)) in Iter::new(link).enumerate() {
        if let Some(prev) = prev {
            if cmp.compare(prev, key) != Ordering::Less {
                return Err(InvariantViolation::OutOfOrder { position });
            }
        }
        prev = Some(key);
    }

    Ok(stats)
}

struct Shape {
    size: usize,
    height: usize,
    blacks: usize,
}

fn check_node<K, V>(node: &Node<K, V>, parent_is_red: bool, stats: &mut TreeStats) -> Result<Shape, InvariantViolation> {
    if node.right_is_red() {
        return Err(InvariantViolation::RedRightLink);
    }
    if parent_is_red && node.is_red() {
        return Err(InvariantViolation::ConsecutiveReds);
    }
    if node.is_red() {
        stats.red_links += 1;
    }

    let left = match node.left.as_deref() {
        Some(left) => check_node(left, node.is_red(), stats)?,
        None => Shape { size: 0, height: 0, blacks: 0 },
    };
    let right = match node.right.as_deref() {
        Some(right) => check_node(right, node.is_red(), stats)?,
        None => Shape { size: 0, height: 0, blacks: 0 },
    };

    if left.blacks != right.blacks {
        return Err(InvariantViolation::UnbalancedBlacks { left: left.blacks, right: right.blacks });
    }

    let size = 1 + left.size + right.size;
    if node.size() != size {
        return Err(InvariantViolation::StaleSize { cached: node.size(), actual: size });
    }
    let height = 1 + left.height.max(right.height);
    if node.height() != height {
        return Err(InvariantViolation::StaleHeight { cached: node.height(), actual: height });
    }

    Ok(Shape {
        size,
        height,
        blacks: left.blacks + usize::from(!node.is_red()),
    })
}
