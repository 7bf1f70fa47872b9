//! Container sum type.
//!
//! Format decoders produce a list of containers of mixed kinds; `Container`
//! wraps each one so callers can dispatch on what they received.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::attributes::{AttributeBag, HasAttributes};
use crate::graph::Graph;
use crate::table::Table;
use crate::tree::Tree;

/// Kind of a structured-data container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerKind {
    /// Columns and rows.
    Table,
    /// Rooted hierarchy of nodes.
    Tree,
    /// Nodes joined by edges.
    Graph,
}

impl ContainerKind {
    /// Lower-case kind name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Tree => "tree",
            Self::Graph => "graph",
        }
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A table, tree, or graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "container", rename_all = "lowercase")]
pub enum Container {
    Table(Table),
    Tree(Tree),
    Graph(Graph),
}

impl Container {
    /// Kind of the wrapped container.
    pub fn kind(&self) -> ContainerKind {
        match self {
            Self::Table(_) => ContainerKind::Table,
            Self::Tree(_) => ContainerKind::Tree,
            Self::Graph(_) => ContainerKind::Graph,
        }
    }

    /// Borrow the table, if this is one.
    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Self::Table(table) => Some(table),
            _ => None,
        }
    }

    /// Borrow the tree, if this is one.
    pub fn as_tree(&self) -> Option<&Tree> {
        match self {
            Self::Tree(tree) => Some(tree),
            _ => None,
        }
    }

    /// Borrow the graph, if this is one.
    pub fn as_graph(&self) -> Option<&Graph> {
        match self {
            Self::Graph(graph) => Some(graph),
            _ => None,
        }
    }

    /// Unwrap the table, if this is one.
    pub fn into_table(self) -> Option<Table> {
        match self {
            Self::Table(table) => Some(table),
            _ => None,
        }
    }

    /// Unwrap the tree, if this is one.
    pub fn into_tree(self) -> Option<Tree> {
        match self {
            Self::Tree(tree) => Some(tree),
            _ => None,
        }
    }

    /// Unwrap the graph, if this is one.
    pub fn into_graph(self) -> Option<Graph> {
        match self {
            Self::Graph(graph) => Some(graph),
            _ => None,
        }
    }

    /// Check if this is a table with exactly one column.
    ///
    /// Almost any text decodes into such a table, so sniffing treats it as a
    /// weak match.
    pub fn is_single_column_table(&self) -> bool {
        self.as_table().is_some_and(Table::is_single_column)
    }
}

impl HasAttributes for Container {
    fn attributes(&self) -> &AttributeBag {
        match self {
            Self::Table(table) => table.attributes(),
            Self::Tree(tree) => tree.attributes(),
            Self::Graph(graph) => graph.attributes(),
        }
    }

    fn attributes_mut(&mut self) -> &mut AttributeBag {
        match self {
            Self::Table(table) => table.attributes_mut(),
            Self::Tree(tree) => tree.attributes_mut(),
            Self::Graph(graph) => graph.attributes_mut(),
        }
    }
}

impl From<Table> for Container {
    fn from(table: Table) -> Self {
        Self::Table(table)
    }
}

impl From<Tree> for Container {
    fn from(tree: Tree) -> Self {
        Self::Tree(tree)
    }
}

impl From<Graph> for Container {
    fn from(graph: Graph) -> Self {
        Self::Graph(graph)
    }
}
