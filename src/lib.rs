#![forbid(unsafe_code)]

// not concurrent
pub mod non_concurrent;

pub use non_concurrent::rbtree::RBTree;
