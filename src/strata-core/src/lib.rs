//! Core data model for Strata structured-data containers.
//!
//! This crate provides the three container kinds and what they share:
//! - `AttributeBag` and `HasAttributes` for descriptive metadata
//! - `Table` with typed columns and fixed-width rows
//! - `Tree` and `Graph` with id-indexed nodes and name lookup
//! - `Value` and `ColumnType` for the type system

pub mod attributes;
pub mod container;
pub mod graph;
pub mod identifiers;
pub mod index;
pub mod table;
pub mod testing;
pub mod tree;
pub mod types;

#[cfg(test)]
mod proptest_utils;

// Re-export commonly used types
pub use attributes::{AttributeBag, AttributeMap, AttributeScope, HasAttributes, keys, keywordize};
pub use container::{Container, ContainerKind};
pub use graph::{Graph, GraphEdge, GraphNode};
pub use identifiers::{EdgeId, IdCounter, NodeId};
pub use index::NameIndex;
pub use table::{Row, Table};
pub use tree::{Tree, TreeNode};
pub use types::{ColumnType, Value};
