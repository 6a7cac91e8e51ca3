// single-threaded data structures
pub mod rbtree;
