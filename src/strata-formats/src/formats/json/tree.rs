//! JSON tree microformat.
//!
//! Either a wrapper `{"type": "json-tree", "tree": {...}}` or a bare root
//! node object. Each node carries its attributes and a `children` array.

use std::collections::HashMap;

use common_config::{EncodeConfig, JsonTreeStyle};
use common_error::{StrataError, StrataResult, invalid_argument_err, invalid_content_err};
use serde_json::{Map, Value as Json};
use strata_core::{Container, ContainerKind, HasAttributes, NodeId, Tree, keys};

use super::{
    LABEL, TYPE, check_type, content_error, parse, read_attributes, to_text, write_attributes,
};
use crate::format::{Format, FormatInfo, expect_tree, record_source, require_one};

const SCHEMA: &str = "json-tree";
const TREE: &str = "tree";
const CHILDREN: &str = "children";

static INFO: FormatInfo = FormatInfo {
    name: "json-tree",
    long_name: "JSON tree",
    description: "A tree of labelled nodes nested through 'children' arrays.",
    syntax: "json",
    mime_type: "application/json",
    file_extensions: &["json"],
    standards: &["RFC 8259"],
    complexity: 10,
    decodes: &[ContainerKind::Tree],
    encodes: &[ContainerKind::Tree],
};

/// JSON tree format.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonTreeFormat;

impl Format for JsonTreeFormat {
    fn info(&self) -> &'static FormatInfo {
        &INFO
    }

    fn decode(&self, text: &str) -> StrataResult<Vec<Container>> {
        let Some(json) = parse(text)? else {
            return Ok(Vec::new());
        };
        let Json::Object(object) = &json else {
            return Err(StrataError::syntax("not a tree"));
        };

        let mut tree = Tree::new();
        let root = if let Some(root) = object.get(TREE) {
            check_type(object, SCHEMA)?;
            tree.set_attributes(read_attributes(object, &[TYPE, TREE])?)
                .map_err(content_error)?;
            root
        } else if object.contains_key(CHILDREN) {
            &json
        } else {
            return Err(StrataError::syntax("not a tree"));
        };

        match root {
            Json::Null => {}
            Json::Object(node) => {
                let id = tree
                    .set_root_node(read_attributes(node, &[CHILDREN])?)
                    .map_err(content_error)?;
                decode_children(&mut tree, id, node)?;
            }
            _ => invalid_content_err!("the tree root must be an object"),
        }

        record_source(&mut tree, &INFO, SCHEMA)?;
        Ok(vec![tree.into()])
    }

    fn encode(&self, containers: &[Container], config: &EncodeConfig) -> StrataResult<String> {
        let tree = expect_tree(require_one(containers, &INFO)?, &INFO)?;
        let root = match tree.root_node_id() {
            Some(id) => encode_subtree(tree, id)?,
            None => Json::Null,
        };

        let json = match config.json_tree_style {
            JsonTreeStyle::Bare => {
                if root.is_null() {
                    invalid_argument_err!("an empty tree has no bare JSON form");
                }
                root
            }
            JsonTreeStyle::WithSchema => {
                let mut object = Map::new();
                object.insert(TYPE.to_string(), Json::from(SCHEMA));
                write_attributes(&mut object, tree.attributes(), keys::NAME);
                object.insert(TREE.to_string(), root);
                Json::Object(object)
            }
        };
        to_text(&json, config)
    }
}

/// Add the nodes below `root`. Nesting depth is bounded only by memory.
fn decode_children(tree: &mut Tree, root: NodeId, node: &Map<String, Json>) -> StrataResult<()> {
    let mut pending = vec![(root, node)];
    while let Some((parent, node)) = pending.pop() {
        let children = match node.get(CHILDREN) {
            None | Some(Json::Null) => continue,
            Some(Json::Array(children)) => children,
            Some(_) => invalid_content_err!("'children' must be an array"),
        };

        for child in children {
            let Json::Object(child) = child else {
                invalid_content_err!("tree nodes must be objects");
            };
            let id = tree
                .add_node(parent, read_attributes(child, &[CHILDREN])?)
                .map_err(content_error)?;
            pending.push((id, child));
        }
    }
    Ok(())
}

/// Build the JSON for the subtree at `root`, children before parents.
fn encode_subtree(tree: &Tree, root: NodeId) -> StrataResult<Json> {
    let mut order = Vec::with_capacity(tree.node_count());
    let mut pending = vec![root];
    while let Some(id) = pending.pop() {
        order.push(id);
        pending.extend(tree.node_children(id)?);
    }

    let mut built: HashMap<NodeId, Json> = HashMap::with_capacity(order.len());
    for &id in order.iter().rev() {
        let node = tree.node(id)?;
        let mut object = Map::new();
        write_attributes(&mut object, node.attributes(), LABEL);

        let children = node
            .children()
            .map(|child| {
                built
                    .remove(&child)
                    .ok_or_else(|| StrataError::internal(format!("tree node {child} visited out of order")))
            })
            .collect::<StrataResult<Vec<_>>>()?;
        object.insert(CHILDREN.to_string(), Json::Array(children));
        built.insert(id, Json::Object(object));
    }

    built
        .remove(&root)
        .ok_or_else(|| StrataError::internal(format!("tree node {root} was not encoded")))
}
