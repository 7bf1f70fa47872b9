//! Property-based tests for strata-core.
//!
//! Strategies generate attribute maps and table edits; the properties check
//! invariants that must hold after any sequence of mutations.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::attributes::{AttributeBag, AttributeMap, AttributeScope, keys, keywordize};
    use crate::graph::Graph;
    use crate::table::Table;
    use crate::tree::Tree;
    use crate::types::Value;

    // =========================================================================
    // Strategies
    // =========================================================================

    fn arb_scalar() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::Int64),
            any::<i32>().prop_map(|i| Value::Float64(f64::from(i))),
            "[a-zA-Z0-9 ,.!-]{0,24}".prop_map(Value::String),
        ]
    }

    /// Keys drawn from a small pool so well-known keys show up often.
    fn arb_key() -> impl Strategy<Value = String> {
        prop_oneof![
            Just(keys::NAME.to_string()),
            Just(keys::LONG_NAME.to_string()),
            Just(keys::DESCRIPTION.to_string()),
            "[a-z]{1,8}",
        ]
    }

    fn arb_map() -> impl Strategy<Value = AttributeMap> {
        prop::collection::vec((arb_key(), arb_scalar()), 0..8)
            .prop_map(|pairs| pairs.into_iter().collect())
    }

    #[derive(Debug, Clone)]
    enum TableEdit {
        AppendColumn,
        InsertColumn(usize),
        DeleteColumn(usize),
        MoveColumn(usize, usize),
        AppendRow,
        InsertRow(usize),
        DeleteRows(usize, usize),
        MoveRows(usize, usize, usize),
    }

    fn arb_table_edit() -> impl Strategy<Value = TableEdit> {
        prop_oneof![
            Just(TableEdit::AppendColumn),
            (0usize..6).prop_map(TableEdit::InsertColumn),
            (0usize..6).prop_map(TableEdit::DeleteColumn),
            (0usize..6, 0usize..6).prop_map(|(a, b)| TableEdit::MoveColumn(a, b)),
            Just(TableEdit::AppendRow),
            (0usize..6).prop_map(TableEdit::InsertRow),
            (0usize..6, 0usize..3).prop_map(|(a, b)| TableEdit::DeleteRows(a, b)),
            (0usize..6, 0usize..6, 0usize..3).prop_map(|(a, b, c)| TableEdit::MoveRows(a, b, c)),
        ]
    }

    fn apply(table: &mut Table, edit: TableEdit) {
        let width = table.column_count();
        // Out-of-range edits are expected to fail without side effects.
        let _ = match edit {
            TableEdit::AppendColumn => table.append_column([("name", "c")], 0i64).map(|_| ()),
            TableEdit::InsertColumn(at) => table.insert_column(at, [("name", "c")], 0i64),
            TableEdit::DeleteColumn(at) => table.delete_column(at),
            TableEdit::MoveColumn(from, to) => table.move_column(from, to),
            TableEdit::AppendRow => table.append_row(vec![Value::Int64(1); width]).map(|_| ()),
            TableEdit::InsertRow(at) => table.insert_row(at, vec![Value::Null; width]),
            TableEdit::DeleteRows(at, count) => table.delete_rows(at, count),
            TableEdit::MoveRows(from, to, count) => table.move_rows(from, to, count),
        };
    }

    // =========================================================================
    // Attribute Properties
    // =========================================================================

    proptest! {
        #[test]
        fn prop_merge_is_all_or_nothing(initial in arb_map(), update in arb_map()) {
            let Ok(mut bag) = AttributeBag::with_values(AttributeScope::Item, initial) else {
                return Ok(());
            };
            let before = bag.clone();
            let valid = AttributeBag::validate(AttributeScope::Item, &update).is_ok();

            let result = bag.merge(update.clone());
            prop_assert_eq!(result.is_ok(), valid);
            if valid {
                for (key, value) in &update {
                    prop_assert_eq!(bag.get(key).unwrap(), Some(value));
                }
            } else {
                prop_assert_eq!(bag, before);
            }
        }

        #[test]
        fn prop_keywords_sorted_unique_non_numeric(map in arb_map()) {
            let words = keywordize(AttributeScope::Container, &map);
            let mut seen = std::collections::HashSet::new();
            for word in &words {
                prop_assert!(!word.is_empty());
                prop_assert!(!word.chars().all(|c| c.is_ascii_digit()));
                prop_assert_eq!(word.to_lowercase(), word.clone());
                prop_assert!(seen.insert(word.clone()));
            }
            for pair in words.windows(2) {
                prop_assert_ne!(
                    natord::compare_ignore_case(&pair[0], &pair[1]),
                    std::cmp::Ordering::Greater
                );
            }
        }
    }

    // =========================================================================
    // Container Properties
    // =========================================================================

    proptest! {
        #[test]
        fn prop_rows_match_column_count(edits in prop::collection::vec(arb_table_edit(), 0..40)) {
            let mut table = Table::new();
            for edit in edits {
                apply(&mut table, edit);
                let width = table.column_count();
                prop_assert!(table.rows().iter().all(|row| row.len() == width));
            }
        }

        #[test]
        fn prop_tree_lookup_matches_attributes(names in prop::collection::vec("[ab]{1,2}", 1..12)) {
            let mut tree = Tree::new();
            let root = tree.set_root_node([("name", "root")]).unwrap();
            let mut ids = vec![root];
            for (i, name) in names.iter().enumerate() {
                let parent = ids[i / 2];
                ids.push(tree.add_node(parent, [("name", name.as_str())]).unwrap());
            }
            // Rename every other node, then drop one subtree.
            for id in ids.iter().skip(1).step_by(2) {
                tree.set_node_attribute(*id, "name", "renamed").unwrap();
            }
            if ids.len() > 2 {
                tree.delete_node(ids[2]).unwrap();
            }

            for name in ["a", "b", "aa", "ab", "ba", "bb", "renamed", "root"] {
                let expected: Vec<_> = tree
                    .node_ids()
                    .into_iter()
                    .filter(|id| tree.node(*id).unwrap().name() == Some(name))
                    .collect();
                prop_assert_eq!(tree.find_nodes_by_name(name), expected);
            }
        }

        #[test]
        fn prop_graph_delete_removes_incident_edges(
            pairs in prop::collection::vec((0usize..6, 0usize..6), 0..20),
            victim in 0usize..6,
        ) {
            let mut graph = Graph::new();
            let nodes: Vec<_> = (0..6).map(|_| graph.add_node([("name", "n")]).unwrap()).collect();
            for (a, b) in pairs {
                graph.add_edge(nodes[a], nodes[b], [("name", "e")]).unwrap();
            }

            let before = graph.edge_count();
            let incident = graph.node_edges(nodes[victim]).unwrap().len();
            graph.delete_node(nodes[victim]).unwrap();

            prop_assert_eq!(graph.edge_count(), before - incident);
            for (_, edge) in graph.edges() {
                let (a, b) = edge.endpoints();
                prop_assert!(graph.is_valid_node_id(a) && graph.is_valid_node_id(b));
            }
            prop_assert_eq!(graph.find_edges_by_name("e"), graph.edge_ids());
        }
    }
}
