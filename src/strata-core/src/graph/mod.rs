//! Graph container.
//!
//! A `Graph` holds id-indexed nodes and edges. Every edge references exactly
//! two nodes; direction, when it matters, is an ordinary edge attribute.

mod graph;

pub use graph::{Graph, GraphEdge, GraphNode};
