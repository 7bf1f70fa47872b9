//! Hierarchical container.
//!
//! A `Tree` holds id-indexed nodes with a single parent pointer and an ordered
//! set of children, plus a name lookup index.

mod outline;
mod tree;

pub use tree::{Tree, TreeNode};
