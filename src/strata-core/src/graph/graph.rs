//! Graph container implementation.

use std::collections::{BTreeMap, BTreeSet};

use common_error::{StrataError, StrataResult, ensure};
use log::trace;
use serde::{Deserialize, Serialize};

use crate::attributes::{
    AttributeBag, AttributeMap, AttributeScope, HasAttributes, collect_attributes, keys,
};
use crate::identifiers::{EdgeId, IdCounter, NodeId};
use crate::index::NameIndex;
use crate::types::Value;

/// A node in a graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    attributes: AttributeBag,
    edges: BTreeSet<EdgeId>,
}

impl GraphNode {
    /// Node attributes.
    pub fn attributes(&self) -> &AttributeBag {
        &self.attributes
    }

    /// Ids of edges incident to this node, ascending.
    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges.iter().copied()
    }

    /// The `name` attribute.
    pub fn name(&self) -> Option<&str> {
        self.attributes.name()
    }
}

/// An edge between two graph nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    attributes: AttributeBag,
    node1: NodeId,
    node2: NodeId,
}

impl GraphEdge {
    /// Edge attributes.
    pub fn attributes(&self) -> &AttributeBag {
        &self.attributes
    }

    /// The two endpoints, in creation order.
    pub fn endpoints(&self) -> (NodeId, NodeId) {
        (self.node1, self.node2)
    }

    /// Check if this edge connects two nodes (in either order).
    pub fn connects(&self, a: NodeId, b: NodeId) -> bool {
        (self.node1 == a && self.node2 == b) || (self.node1 == b && self.node2 == a)
    }

    /// Check if both endpoints are the same node.
    pub fn is_self_loop(&self) -> bool {
        self.node1 == self.node2
    }

    /// The `name` attribute.
    pub fn name(&self) -> Option<&str> {
        self.attributes.name()
    }
}

/// A graph of attributed nodes and edges.
///
/// ## Example
///
/// ```rust
/// use strata_core::Graph;
///
/// let mut graph = Graph::new();
/// let alice = graph.add_node([("name", "Alice")]).unwrap();
/// let bob = graph.add_node([("name", "Bob")]).unwrap();
/// let knows = graph.add_edge(alice, bob, [("name", "knows")]).unwrap();
///
/// assert_eq!(graph.edge_nodes(knows).unwrap(), (alice, bob));
///
/// graph.delete_node(bob).unwrap();
/// assert_eq!(graph.edge_count(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GraphRecord")]
pub struct Graph {
    attributes: AttributeBag,
    nodes: BTreeMap<NodeId, GraphNode>,
    edges: BTreeMap<EdgeId, GraphEdge>,
    node_ids: IdCounter,
    edge_ids: IdCounter,
    #[serde(skip)]
    node_names: NameIndex<NodeId>,
    #[serde(skip)]
    edge_names: NameIndex<EdgeId>,
}

impl Graph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self {
            attributes: AttributeBag::new(AttributeScope::Container),
            nodes: BTreeMap::new(),
            edges: BTreeMap::new(),
            node_ids: IdCounter::default(),
            edge_ids: IdCounter::default(),
            node_names: NameIndex::new(),
            edge_names: NameIndex::new(),
        }
    }

    /// Create an empty graph with a `name` attribute.
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            attributes: AttributeBag::with_name(AttributeScope::Container, name),
            ..Self::new()
        }
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Ids of all nodes, ascending.
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.keys().copied().collect()
    }

    /// Ids of all edges, ascending.
    pub fn edge_ids(&self) -> Vec<EdgeId> {
        self.edges.keys().copied().collect()
    }

    /// Check if `id` names a live node.
    pub fn is_valid_node_id(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Check if `id` names a live edge.
    pub fn is_valid_edge_id(&self, id: EdgeId) -> bool {
        self.edges.contains_key(&id)
    }

    /// Get a node by id.
    pub fn node(&self, id: NodeId) -> StrataResult<&GraphNode> {
        self.nodes.get(&id).ok_or_else(|| bad_node(id))
    }

    /// Get an edge by id.
    pub fn edge(&self, id: EdgeId) -> StrataResult<&GraphEdge> {
        self.edges.get(&id).ok_or_else(|| bad_edge(id))
    }

    /// Iterate over nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &GraphNode)> {
        self.nodes.iter().map(|(id, node)| (*id, node))
    }

    /// Iterate over edges in id order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &GraphEdge)> {
        self.edges.iter().map(|(id, edge)| (*id, edge))
    }

    /// Add a node, returning its id.
    pub fn add_node<I, K, V>(&mut self, attributes: I) -> StrataResult<NodeId>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let attributes =
            AttributeBag::with_values(AttributeScope::Item, collect_attributes(attributes))?;
        let id = self.node_ids.allocate();
        self.node_names.insert(attributes.as_map().get(keys::NAME), id);
        self.nodes.insert(
            id,
            GraphNode {
                attributes,
                edges: BTreeSet::new(),
            },
        );
        Ok(id)
    }

    /// Add an edge between `node1` and `node2`, returning its id.
    ///
    /// Both nodes must exist; they may be the same node.
    pub fn add_edge<I, K, V>(&mut self, node1: NodeId, node2: NodeId, attributes: I) -> StrataResult<EdgeId>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.node(node1)?;
        self.node(node2)?;
        let attributes =
            AttributeBag::with_values(AttributeScope::Item, collect_attributes(attributes))?;

        let id = self.edge_ids.allocate();
        self.edge_names.insert(attributes.as_map().get(keys::NAME), id);
        self.edges.insert(
            id,
            GraphEdge {
                attributes,
                node1,
                node2,
            },
        );
        for endpoint in [node1, node2] {
            if let Some(node) = self.nodes.get_mut(&endpoint) {
                node.edges.insert(id);
            }
        }
        Ok(id)
    }

    /// Delete a node together with every edge that references it.
    pub fn delete_node(&mut self, id: NodeId) -> StrataResult<()> {
        let incident: Vec<EdgeId> = self.node(id)?.edges().collect();
        trace!("deleting graph node {id} with {} incident edges", incident.len());

        for edge in incident {
            self.delete_edge(edge)?;
        }
        if let Some(node) = self.nodes.remove(&id) {
            self.node_names.remove(node.attributes.as_map().get(keys::NAME), id);
        }
        Ok(())
    }

    /// Delete an edge, detaching it from both endpoints.
    pub fn delete_edge(&mut self, id: EdgeId) -> StrataResult<()> {
        let edge = self.edges.remove(&id).ok_or_else(|| bad_edge(id))?;
        self.edge_names.remove(edge.attributes.as_map().get(keys::NAME), id);
        for endpoint in [edge.node1, edge.node2] {
            if let Some(node) = self.nodes.get_mut(&endpoint) {
                node.edges.remove(&id);
            }
        }
        Ok(())
    }

    /// Remove every node and edge. Ids are not reused afterwards.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.node_names.clear();
        self.edge_names.clear();
    }

    /// Endpoints of edge `id`.
    pub fn edge_nodes(&self, id: EdgeId) -> StrataResult<(NodeId, NodeId)> {
        Ok(self.edge(id)?.endpoints())
    }

    /// Edges incident to node `id`, ascending.
    pub fn node_edges(&self, id: NodeId) -> StrataResult<Vec<EdgeId>> {
        Ok(self.node(id)?.edges().collect())
    }

    /// Nodes adjacent to node `id` through any edge, ascending and unique.
    pub fn node_neighbors(&self, id: NodeId) -> StrataResult<Vec<NodeId>> {
        let mut neighbors = BTreeSet::new();
        for edge_id in self.node(id)?.edges() {
            let (a, b) = self.edge(edge_id)?.endpoints();
            neighbors.insert(if a == id { b } else { a });
        }
        Ok(neighbors.into_iter().collect())
    }

    /// Ids of nodes whose `name` attribute equals `name`.
    pub fn find_nodes_by_name(&self, name: &str) -> Vec<NodeId> {
        self.node_names.lookup(name)
    }

    /// Ids of edges whose `name` attribute equals `name`.
    pub fn find_edges_by_name(&self, name: &str) -> Vec<EdgeId> {
        self.edge_names.lookup(name)
    }

    /// Attribute bag of node `id`.
    pub fn node_attributes(&self, id: NodeId) -> StrataResult<&AttributeBag> {
        Ok(&self.node(id)?.attributes)
    }

    /// One attribute of node `id`.
    pub fn node_attribute(&self, id: NodeId, key: &str) -> StrataResult<Option<&Value>> {
        self.node(id)?.attributes.get(key)
    }

    /// Set one attribute of node `id`.
    pub fn set_node_attribute(
        &mut self,
        id: NodeId,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> StrataResult<()> {
        self.update_node(id, |bag| bag.set(key, value).map(|_| ()))
    }

    /// Merge attributes into node `id`, all-or-nothing.
    pub fn set_node_attributes(&mut self, id: NodeId, values: AttributeMap) -> StrataResult<()> {
        self.update_node(id, |bag| bag.merge(values))
    }

    /// Remove one attribute of node `id`, returning its previous value.
    pub fn remove_node_attribute(&mut self, id: NodeId, key: &str) -> StrataResult<Option<Value>> {
        self.update_node(id, |bag| Ok(bag.remove(key)))
    }

    /// Remove all attributes of node `id`.
    pub fn clear_node_attributes(&mut self, id: NodeId) -> StrataResult<()> {
        self.update_node(id, |bag| {
            bag.clear();
            Ok(())
        })
    }

    /// Attribute bag of edge `id`.
    pub fn edge_attributes(&self, id: EdgeId) -> StrataResult<&AttributeBag> {
        Ok(&self.edge(id)?.attributes)
    }

    /// One attribute of edge `id`.
    pub fn edge_attribute(&self, id: EdgeId, key: &str) -> StrataResult<Option<&Value>> {
        self.edge(id)?.attributes.get(key)
    }

    /// Set one attribute of edge `id`.
    pub fn set_edge_attribute(
        &mut self,
        id: EdgeId,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> StrataResult<()> {
        self.update_edge(id, |bag| bag.set(key, value).map(|_| ()))
    }

    /// Merge attributes into edge `id`, all-or-nothing.
    pub fn set_edge_attributes(&mut self, id: EdgeId, values: AttributeMap) -> StrataResult<()> {
        self.update_edge(id, |bag| bag.merge(values))
    }

    /// Remove one attribute of edge `id`, returning its previous value.
    pub fn remove_edge_attribute(&mut self, id: EdgeId, key: &str) -> StrataResult<Option<Value>> {
        self.update_edge(id, |bag| Ok(bag.remove(key)))
    }

    /// Remove all attributes of edge `id`.
    pub fn clear_edge_attributes(&mut self, id: EdgeId) -> StrataResult<()> {
        self.update_edge(id, |bag| {
            bag.clear();
            Ok(())
        })
    }

    fn update_node<R>(
        &mut self,
        id: NodeId,
        update: impl FnOnce(&mut AttributeBag) -> StrataResult<R>,
    ) -> StrataResult<R> {
        let node = self.nodes.get_mut(&id).ok_or_else(|| bad_node(id))?;
        self.node_names.update(id, &mut node.attributes, update)
    }

    fn update_edge<R>(
        &mut self,
        id: EdgeId,
        update: impl FnOnce(&mut AttributeBag) -> StrataResult<R>,
    ) -> StrataResult<R> {
        let edge = self.edges.get_mut(&id).ok_or_else(|| bad_edge(id))?;
        self.edge_names.update(id, &mut edge.attributes, update)
    }
}

fn bad_node(id: NodeId) -> StrataError {
    StrataError::out_of_bounds(format!("graph node id {id} is not valid"))
}

fn bad_edge(id: EdgeId) -> StrataError {
    StrataError::out_of_bounds(format!("graph edge id {id} is not valid"))
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl HasAttributes for Graph {
    fn attributes(&self) -> &AttributeBag {
        &self.attributes
    }

    fn attributes_mut(&mut self) -> &mut AttributeBag {
        &mut self.attributes
    }
}

/// Serialized shape of a [`Graph`]. Incidence sets are checked against the
/// edges and the name indices are rebuilt.
#[derive(Deserialize)]
struct GraphRecord {
    attributes: AttributeBag,
    nodes: BTreeMap<NodeId, GraphNode>,
    edges: BTreeMap<EdgeId, GraphEdge>,
    node_ids: IdCounter,
    edge_ids: IdCounter,
}

impl TryFrom<GraphRecord> for Graph {
    type Error = StrataError;

    fn try_from(record: GraphRecord) -> StrataResult<Self> {
        let GraphRecord {
            attributes,
            nodes,
            edges,
            node_ids,
            edge_ids,
        } = record;
        attributes.expect_scope(AttributeScope::Container, "graph")?;
        node_ids.check_allocated(nodes.keys().next_back(), "graph node")?;
        edge_ids.check_allocated(edges.keys().next_back(), "graph edge")?;

        for (&id, edge) in &edges {
            edge.attributes.expect_scope(AttributeScope::Item, "graph edge")?;
            for end in [edge.node1, edge.node2] {
                let listed = nodes.get(&end).is_some_and(|node| node.edges.contains(&id));
                ensure!(listed, InvalidContent: "graph edge {id} ends at node {end}, which does not list it");
            }
        }
        for (&id, node) in &nodes {
            node.attributes.expect_scope(AttributeScope::Item, "graph node")?;
            for edge in &node.edges {
                let incident = edges
                    .get(edge)
                    .is_some_and(|edge| edge.node1 == id || edge.node2 == id);
                ensure!(incident, InvalidContent: "graph node {id} lists edge {edge}, which does not touch it");
            }
        }

        let node_names = NameIndex::from_bags(nodes.iter().map(|(&id, node)| (id, &node.attributes)));
        let edge_names = NameIndex::from_bags(edges.iter().map(|(&id, edge)| (id, &edge.attributes)));
        Ok(Self {
            attributes,
            nodes,
            edges,
            node_ids,
            edge_ids,
            node_names,
            edge_names,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> (Graph, [NodeId; 3], [EdgeId; 3]) {
        let mut graph = Graph::with_name("triangle");
        let a = graph.add_node([("name", "a")]).unwrap();
        let b = graph.add_node([("name", "b")]).unwrap();
        let c = graph.add_node([("name", "c")]).unwrap();
        let ab = graph.add_edge(a, b, [("name", "next")]).unwrap();
        let bc = graph.add_edge(b, c, [("name", "next")]).unwrap();
        let ca = graph.add_edge(c, a, [("name", "back")]).unwrap();
        (graph, [a, b, c], [ab, bc, ca])
    }

    #[test]
    fn test_structure() {
        let (graph, [a, b, c], [ab, bc, ca]) = triangle();

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.node_edges(a).unwrap(), vec![ab, ca]);
        assert_eq!(graph.edge_nodes(bc).unwrap(), (b, c));
        assert_eq!(graph.node_neighbors(a).unwrap(), vec![b, c]);
        assert_eq!(graph.find_edges_by_name("next"), vec![ab, bc]);
        assert_eq!(graph.find_nodes_by_name("c"), vec![c]);
        assert!(graph.edge(ca).unwrap().connects(a, c));
    }

    #[test]
    fn test_edge_requires_nodes() {
        let (mut graph, [a, ..], _) = triangle();
        let err = graph.add_edge(a, 42, Vec::<(&str, Value)>::new()).unwrap_err();
        assert!(matches!(err, StrataError::OutOfBounds(_)));
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn test_self_loop() {
        let (mut graph, [a, ..], _) = triangle();
        let looped = graph.add_edge(a, a, [("directed", true)]).unwrap();

        assert!(graph.edge(looped).unwrap().is_self_loop());
        assert_eq!(graph.node_edges(a).unwrap().len(), 3);

        graph.delete_node(a).unwrap();
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_delete_node_cascades() {
        let (mut graph, [a, b, c], [ab, bc, ca]) = triangle();
        let before = graph.edge_count();
        let incident = graph.node_edges(b).unwrap().len();

        graph.delete_node(b).unwrap();

        assert_eq!(graph.edge_count(), before - incident);
        assert!(!graph.is_valid_edge_id(ab));
        assert!(!graph.is_valid_edge_id(bc));
        assert!(graph.is_valid_edge_id(ca));
        assert_eq!(graph.node_edges(a).unwrap(), vec![ca]);
        assert_eq!(graph.node_edges(c).unwrap(), vec![ca]);
        assert_eq!(graph.find_edges_by_name("next"), Vec::<EdgeId>::new());
        assert!(graph.find_nodes_by_name("b").is_empty());
    }

    #[test]
    fn test_delete_edge() {
        let (mut graph, [a, b, _], [ab, ..]) = triangle();
        graph.delete_edge(ab).unwrap();

        assert_eq!(graph.edge_count(), 2);
        assert!(!graph.node_edges(a).unwrap().contains(&ab));
        assert!(!graph.node_edges(b).unwrap().contains(&ab));
        assert!(graph.delete_edge(ab).is_err());
    }

    #[test]
    fn test_ids_independent_and_not_reused() {
        let (mut graph, [a, b, c], [_, _, ca]) = triangle();
        graph.delete_node(c).unwrap();

        let d = graph.add_node([("name", "d")]).unwrap();
        let ad = graph.add_edge(a, d, Vec::<(&str, Value)>::new()).unwrap();
        assert!(d > c);
        assert!(ad > ca);
        assert!(graph.is_valid_node_id(b));
    }

    #[test]
    fn test_rename_node_and_edge() {
        let (mut graph, [a, ..], [ab, ..]) = triangle();

        graph.set_node_attribute(a, "name", "alpha").unwrap();
        graph.set_edge_attribute(ab, "name", "link").unwrap();
        assert_eq!(graph.find_nodes_by_name("alpha"), vec![a]);
        assert_eq!(graph.find_edges_by_name("link"), vec![ab]);
        assert!(graph.find_nodes_by_name("a").is_empty());

        let mut values = AttributeMap::new();
        values.insert("name".into(), Value::from("edge"));
        values.insert("weight".into(), Value::Float64(0.5));
        graph.set_edge_attributes(ab, values).unwrap();
        assert_eq!(graph.find_edges_by_name("edge"), vec![ab]);
        assert_eq!(
            graph.edge_attribute(ab, "weight").unwrap(),
            Some(&Value::Float64(0.5))
        );

        assert_eq!(
            graph.remove_edge_attribute(ab, "name").unwrap(),
            Some(Value::from("edge"))
        );
        assert!(graph.find_edges_by_name("edge").is_empty());

        graph.clear_node_attributes(a).unwrap();
        assert!(graph.find_nodes_by_name("alpha").is_empty());
    }

    #[test]
    fn test_clone_is_independent() {
        let (graph, [a, ..], _) = triangle();
        let mut copy = graph.clone();
        copy.delete_node(a).unwrap();
        copy.set_attribute("name", "copy").unwrap();

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.name(), Some("triangle"));
        assert_eq!(copy.node_count(), 2);
    }

    #[test]
    fn test_deserialize_checks_incidence() {
        let mut graph = Graph::with_name("g");
        let x = graph.add_node([("name", "x")]).unwrap();
        let y = graph.add_node([("name", "y")]).unwrap();
        let e = graph.add_edge(x, y, [("name", "e")]).unwrap();

        let text = serde_json::to_string(&graph).unwrap();
        let decoded: Graph = serde_json::from_str(&text).unwrap();
        assert_eq!(decoded, graph);
        assert_eq!(decoded.find_edges_by_name("e"), vec![e]);

        let item = r#"{"scope": "Item", "values": {}}"#;
        let dangling = format!(
            r#"{{"attributes": {{"scope": "Container", "values": {{}}}},
                "node_ids": {{"next": 1}}, "edge_ids": {{"next": 1}},
                "nodes": {{"0": {{"attributes": {item}, "edges": [0]}}}},
                "edges": {{"0": {{"attributes": {item}, "node1": 0, "node2": 7}}}}}}"#
        );
        let err = serde_json::from_str::<Graph>(&dangling).unwrap_err();
        assert!(err.to_string().contains("does not list it"), "{err}");
    }
}
