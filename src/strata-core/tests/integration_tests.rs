//! Integration tests for strata-core
//!
//! These tests exercise the containers through the public API only, covering
//! cross-cutting behavior rather than repeating the module unit tests.

use common_error::StrataError;
use strata_core::testing::{sample_graph, sample_table, sample_tree};
use strata_core::*;

#[test]
fn test_table_lock_step_through_schema_edits() {
    let mut table = sample_table().unwrap();

    table.insert_column(1, [("name", "mid")], Value::Null).unwrap();
    assert_eq!(table.column_names(), vec!["a", "mid", "b"]);
    assert_eq!(table.row(0).unwrap(), &[Value::Int64(1), Value::Null, Value::Int64(2)]);

    table.move_column(0, 2).unwrap();
    assert_eq!(table.column_names(), vec!["mid", "b", "a"]);
    assert_eq!(table.row(1).unwrap(), &[Value::Null, Value::Int64(4), Value::Int64(3)]);

    table.delete_columns(0, 2).unwrap();
    assert_eq!(table.column_count(), 1);
    assert!(table.rows().iter().all(|row| row.len() == 1));
    assert!(Container::from(table).is_single_column_table());
}

#[test]
fn test_table_rejects_bad_input_without_changes() {
    let mut table = sample_table().unwrap();
    let before = table.clone();

    let err = table.append_row(vec![Value::Int64(5)]).unwrap_err();
    assert!(err.is_contract_violation());

    let err = table
        .append_column([("name", "bad"), ("type", "complex")], Value::Null)
        .unwrap_err();
    assert!(matches!(err, StrataError::InvalidArgument(_)));

    assert!(table.delete_rows(1, 5).is_err());
    assert!(table.value(2, 0).is_err());
    assert_eq!(table, before);
}

#[test]
fn test_column_type_defaults_to_any() {
    let mut table = Table::new();
    table.append_column([("name", "free")], Value::Null).unwrap();
    assert_eq!(table.column_type(0).unwrap(), ColumnType::Any);

    table.set_column_attribute(0, "type", "DateTime").unwrap();
    assert_eq!(table.column_type(0).unwrap(), ColumnType::DateTime);
}

#[test]
fn test_tree_root_delete_scenario() {
    let mut tree = Tree::new();
    let root = tree.set_root_node([("name", "root")]).unwrap();
    let child = tree.add_node(root, [("name", "child")]).unwrap();

    assert_eq!(tree.node_parent(child).unwrap(), Some(root));
    assert_eq!(tree.node_children(root).unwrap(), vec![child]);
    assert_eq!(tree.find_nodes_by_name("child"), vec![child]);

    tree.delete_node(root).unwrap();
    assert_eq!(tree.node_count(), 0);
    assert_eq!(tree.root_node_id(), None);
    assert!(tree.find_nodes_by_name("child").is_empty());
}

#[test]
fn test_tree_name_index_follows_bulk_merge() {
    let mut tree = sample_tree().unwrap();
    let a = tree.find_nodes_by_name("a")[0];

    let mut values = AttributeMap::new();
    values.insert("name".into(), Value::from("alpha"));
    values.insert("rank".into(), Value::Int64(1));
    tree.set_node_attributes(a, values).unwrap();

    assert!(tree.find_nodes_by_name("a").is_empty());
    assert_eq!(tree.find_nodes_by_name("alpha"), vec![a]);

    // A failing merge must not touch the index either.
    let mut bad = AttributeMap::new();
    bad.insert("name".into(), Value::from("omega"));
    bad.insert("longName".into(), Value::Int64(3));
    assert!(tree.set_node_attributes(a, bad).is_err());
    assert_eq!(tree.find_nodes_by_name("alpha"), vec![a]);
    assert!(tree.find_nodes_by_name("omega").is_empty());
}

#[test]
fn test_tree_outline() {
    let tree = sample_tree().unwrap();
    let outline = tree.render_outline();
    assert!(outline.starts_with("sample\nroot\n"));
    assert!(outline.contains("a (First branch)"));
    assert!(outline.contains("a1"));
}

#[test]
fn test_graph_delete_cascade() {
    let mut graph = sample_graph().unwrap();
    let x = graph.find_nodes_by_name("x")[0];
    let y = graph.find_nodes_by_name("y")[0];
    let back = graph.add_edge(y, x, [("name", "e2")]).unwrap();
    let z = graph.add_node([("name", "z")]).unwrap();
    let keep = graph.add_edge(y, z, Vec::<(&str, Value)>::new()).unwrap();

    let incident = graph.node_edges(x).unwrap().len();
    assert_eq!(incident, 2);
    graph.delete_node(x).unwrap();

    assert_eq!(graph.edge_count(), 1);
    assert_eq!(graph.edge_ids(), vec![keep]);
    assert!(!graph.is_valid_edge_id(back));
    assert!(graph.find_edges_by_name("e1").is_empty());
}

#[test]
fn test_container_attributes_and_keywords() {
    let mut container = Container::from(sample_graph().unwrap());
    container
        .set_attribute("description", "Social network, 2024 edition")
        .unwrap();
    container.set_attribute("topic", "Friends").unwrap();

    let words = container.keywords();
    assert!(words.contains(&"social".to_string()));
    assert!(words.contains(&"topic".to_string()));
    assert!(words.contains(&"friends".to_string()));
    assert!(!words.contains(&"2024".to_string()));
    assert!(!words.contains(&"description".to_string()));
}

#[test]
fn test_containers_serialize_with_serde() {
    let container = Container::from(sample_tree().unwrap());
    let json = serde_json::to_string(&container).unwrap();
    let back: Container = serde_json::from_str(&json).unwrap();
    assert_eq!(back, container);
    assert_eq!(back.kind(), ContainerKind::Tree);
}

#[test]
fn test_deserialized_containers_keep_invariants() {
    let ragged = r#"{"kind": "table", "container": {
        "attributes": {"scope": "Container", "values": {"name": "t"}},
        "columns": [
            {"scope": "Column", "values": {"name": "a"}},
            {"scope": "Column", "values": {"name": "b"}}
        ],
        "rows": [[1]]
    }}"#;
    assert!(serde_json::from_str::<Container>(ragged).is_err());

    let bad_name = r#"{"kind": "table", "container": {
        "attributes": {"scope": "Container", "values": {"name": 5}},
        "columns": [],
        "rows": []
    }}"#;
    assert!(serde_json::from_str::<Container>(bad_name).is_err());

    let graph = Container::from(sample_graph().unwrap());
    let back: Container = serde_json::from_str(&serde_json::to_string(&graph).unwrap()).unwrap();
    let back = back.into_graph().unwrap();
    assert_eq!(back.find_nodes_by_name("x").len(), 1);
}
