//! Tree container implementation.

use std::collections::{BTreeMap, BTreeSet};

use common_error::{StrataError, StrataResult, ensure};
use log::trace;
use serde::{Deserialize, Serialize};

use crate::attributes::{
    AttributeBag, AttributeMap, AttributeScope, HasAttributes, collect_attributes, keys,
};
use crate::identifiers::{IdCounter, NodeId};
use crate::index::NameIndex;
use crate::types::Value;

/// A node in a tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    attributes: AttributeBag,
    parent: Option<NodeId>,
    children: BTreeSet<NodeId>,
}

impl TreeNode {
    /// Node attributes.
    pub fn attributes(&self) -> &AttributeBag {
        &self.attributes
    }

    /// Parent node id, `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child node ids, in creation order.
    pub fn children(&self) -> impl DoubleEndedIterator<Item = NodeId> + '_ {
        self.children.iter().copied()
    }

    /// The `name` attribute.
    pub fn name(&self) -> Option<&str> {
        self.attributes.name()
    }
}

/// A rooted tree of attributed nodes.
///
/// ## Example
///
/// ```rust
/// use strata_core::Tree;
///
/// let mut tree = Tree::new();
/// let root = tree.set_root_node([("name", "root")]).unwrap();
/// let child = tree.add_node(root, [("name", "child")]).unwrap();
///
/// assert_eq!(tree.node_parent(child).unwrap(), Some(root));
/// assert_eq!(tree.find_nodes_by_name("child"), vec![child]);
///
/// tree.delete_node(root).unwrap();
/// assert_eq!(tree.node_count(), 0);
/// assert_eq!(tree.root_node_id(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TreeRecord")]
pub struct Tree {
    attributes: AttributeBag,
    nodes: BTreeMap<NodeId, TreeNode>,
    root: Option<NodeId>,
    ids: IdCounter,
    #[serde(skip)]
    names: NameIndex<NodeId>,
}

impl Tree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            attributes: AttributeBag::new(AttributeScope::Container),
            nodes: BTreeMap::new(),
            root: None,
            ids: IdCounter::default(),
            names: NameIndex::new(),
        }
    }

    /// Create an empty tree with a `name` attribute.
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

    /// Check if the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Ids of all nodes, ascending.
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.keys().copied().collect()
    }

    /// Id of the root node, `None` when the tree is empty.
    pub fn root_node_id(&self) -> Option<NodeId> {
        self.root
    }

    /// Check if `id` names a live node.
    pub fn is_valid_node_id(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Get a node by id.
    pub fn node(&self, id: NodeId) -> StrataResult<&TreeNode> {
        self.nodes
            .get(&id)
            .ok_or_else(|| StrataError::out_of_bounds(format!("tree node id {id} is not valid")))
    }

    fn node_mut(&mut self, id: NodeId) -> StrataResult<&mut TreeNode> {
        self.nodes
            .get_mut(&id)
            .ok_or_else(|| StrataError::out_of_bounds(format!("tree node id {id} is not valid")))
    }

    /// Replace the tree's content with a single root node.
    ///
    /// Invalid attributes leave the existing tree untouched.
    pub fn set_root_node<I, K, V>(&mut self, attributes: I) -> StrataResult<NodeId>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let bag = AttributeBag::with_values(AttributeScope::Item, collect_attributes(attributes))?;
        self.clear();
        let id = self.insert_node(bag, None);
        self.root = Some(id);
        Ok(id)
    }

    /// Add a node under `parent`, returning the new node's id.
    pub fn add_node<I, K, V>(&mut self, parent: NodeId, attributes: I) -> StrataResult<NodeId>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.node(parent)?;
        let bag = AttributeBag::with_values(AttributeScope::Item, collect_attributes(attributes))?;
        let id = self.insert_node(bag, Some(parent));
        self.node_mut(parent)?.children.insert(id);
        Ok(id)
    }

    fn insert_node(&mut self, attributes: AttributeBag, parent: Option<NodeId>) -> NodeId {
        let id = self.ids.allocate();
        self.names.insert(attributes.as_map().get(keys::NAME), id);
        self.nodes.insert(
            id,
            TreeNode {
                attributes,
                parent,
                children: BTreeSet::new(),
            },
        );
        id
    }

    /// Delete a node and its whole subtree. Deleting the root empties the tree.
    pub fn delete_node(&mut self, id: NodeId) -> StrataResult<()> {
        let parent = self.node(id)?.parent;
        let Some(parent) = parent else {
            self.clear();
            return Ok(());
        };

        let doomed = self.node_descendants(id)?;
        trace!("deleting tree node {id} with {} descendants", doomed.len());

        self.node_mut(parent)?.children.remove(&id);
        for node_id in std::iter::once(id).chain(doomed) {
            if let Some(node) = self.nodes.remove(&node_id) {
                self.names
                    .remove(node.attributes.as_map().get(keys::NAME), node_id);
            }
        }
        Ok(())
    }

    /// Remove every node. Ids are not reused afterwards.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.names.clear();
        self.root = None;
    }

    /// Parent of node `id`, `None` for the root.
    pub fn node_parent(&self, id: NodeId) -> StrataResult<Option<NodeId>> {
        Ok(self.node(id)?.parent)
    }

    /// Children of node `id`, in creation order.
    pub fn node_children(&self, id: NodeId) -> StrataResult<Vec<NodeId>> {
        Ok(self.node(id)?.children().collect())
    }

    /// Ancestors of node `id`, nearest first, ending at the root.
    pub fn node_ancestors(&self, id: NodeId) -> StrataResult<Vec<NodeId>> {
        let mut ancestors = Vec::new();
        let mut current = self.node(id)?.parent;
        while let Some(parent) = current {
            ancestors.push(parent);
            current = self.node(parent)?.parent;
        }
        Ok(ancestors)
    }

    /// Distance from node `id` to the root (the root has depth 0).
    pub fn node_depth(&self, id: NodeId) -> StrataResult<usize> {
        Ok(self.node_ancestors(id)?.len())
    }

    /// All nodes below node `id`, depth-first, excluding `id` itself.
    pub fn node_descendants(&self, id: NodeId) -> StrataResult<Vec<NodeId>> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = self.node(id)?.children().rev().collect();
        while let Some(next) = stack.pop() {
            found.push(next);
            stack.extend(self.node(next)?.children().rev());
        }
        Ok(found)
    }

    /// Ids of nodes whose `name` attribute equals `name`.
    pub fn find_nodes_by_name(&self, name: &str) -> Vec<NodeId> {
        self.names.lookup(name)
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

    /// Remove one attribute of node `id`.
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

    fn update_node<R>(
        &mut self,
        id: NodeId,
        update: impl FnOnce(&mut AttributeBag) -> StrataResult<R>,
    ) -> StrataResult<R> {
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or_else(|| StrataError::out_of_bounds(format!("tree node id {id} is not valid")))?;
        self.names.update(id, &mut node.attributes, update)
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl HasAttributes for Tree {
    fn attributes(&self) -> &AttributeBag {
        &self.attributes
    }

    fn attributes_mut(&mut self) -> &mut AttributeBag {
        &mut self.attributes
    }
}

/// Serialized shape of a [`Tree`]. Parent and child links are checked and
/// the name index is rebuilt.
#[derive(Deserialize)]
struct TreeRecord {
    attributes: AttributeBag,
    nodes: BTreeMap<NodeId, TreeNode>,
    root: Option<NodeId>,
    ids: IdCounter,
}

impl TryFrom<TreeRecord> for Tree {
    type Error = StrataError;

    fn try_from(record: TreeRecord) -> StrataResult<Self> {
        let TreeRecord {
            attributes,
            nodes,
            root,
            ids,
        } = record;
        attributes.expect_scope(AttributeScope::Container, "tree")?;
        ids.check_allocated(nodes.keys().next_back(), "tree node")?;

        // Each node is reached once, from the one parent it names.
        let mut reached = 0;
        let mut pending: Vec<NodeId> = root.into_iter().collect();
        while let Some(id) = pending.pop() {
            let node = nodes.get(&id).ok_or_else(|| {
                StrataError::invalid_content(format!("tree node {id} is referenced but missing"))
            })?;
            node.attributes.expect_scope(AttributeScope::Item, "tree node")?;
            if Some(id) == root {
                ensure!(node.parent.is_none(), InvalidContent: "tree root {id} has a parent");
            }
            reached += 1;

            for &child in &node.children {
                let parent = nodes.get(&child).and_then(|child| child.parent);
                ensure!(
                    parent == Some(id),
                    InvalidContent: "tree node {child} is listed under {id} but its parent is {parent:?}"
                );
                pending.push(child);
            }
        }
        ensure!(
            reached == nodes.len(),
            InvalidContent: "{} tree nodes are not reachable from the root",
            nodes.len() - reached
        );

        let names = NameIndex::from_bags(nodes.iter().map(|(&id, node)| (id, &node.attributes)));
        Ok(Self {
            attributes,
            nodes,
            root,
            ids,
            names,
        })
    }
}
