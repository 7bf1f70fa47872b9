//! Sample containers for tests and documentation.

use common_error::StrataResult;

use crate::graph::Graph;
use crate::table::Table;
use crate::tree::Tree;
use crate::types::Value;

/// Two integer columns `a` and `b` with rows `[1, 2]` and `[3, 4]`.
pub fn sample_table() -> StrataResult<Table> {
    let mut table = Table::with_name("sample");
    for name in ["a", "b"] {
        table.append_column([("name", name), ("type", "integer")], Value::Null)?;
    }
    table.append_rows(vec![
        vec![Value::Int64(1), Value::Int64(2)],
        vec![Value::Int64(3), Value::Int64(4)],
    ])?;
    Ok(table)
}

/// A root `root` with children `a` and `b`; `a` has one child `a1`.
pub fn sample_tree() -> StrataResult<Tree> {
    let mut tree = Tree::with_name("sample");
    let root = tree.set_root_node([("name", "root")])?;
    let a = tree.add_node(root, [("name", "a"), ("longName", "First branch")])?;
    tree.add_node(a, [("name", "a1")])?;
    tree.add_node(root, [("name", "b")])?;
    Ok(tree)
}

/// Nodes `x` and `y` joined by one edge named `e1`.
pub fn sample_graph() -> StrataResult<Graph> {
    let mut graph = Graph::with_name("sample");
    let x = graph.add_node([("name", "x")])?;
    let y = graph.add_node([("name", "y")])?;
    graph.add_edge(x, y, [("name", "e1")])?;
    Ok(graph)
}
