//! JSON graph microformat.
//!
//! Either a wrapper `{"type": "json-graph", "graphs": [...]}` holding any
//! number of graphs, or one bare graph object. A graph object lists `nodes`
//! with file-local `id`s and `edges` whose `source` and `target` refer to
//! those ids.

use std::collections::HashMap;

use common_config::{EncodeConfig, JsonGraphStyle};
use common_error::{StrataError, StrataResult, invalid_content_err};
use serde_json::{Map, Value as Json};
use strata_core::{Container, ContainerKind, Graph, HasAttributes, NodeId, keys};

use super::{LABEL, TYPE, content_error, parse, read_attributes, to_text, write_attributes};
use crate::format::{Format, FormatInfo, expect_graph, record_source, require_some};

const SCHEMA: &str = "json-graph";
const GRAPHS: &str = "graphs";
const NODES: &str = "nodes";
const EDGES: &str = "edges";
const ID: &str = "id";
const SOURCE: &str = "source";
const TARGET: &str = "target";

static INFO: FormatInfo = FormatInfo {
    name: "json-graph",
    long_name: "JSON graph",
    description: "Graphs of labelled nodes joined by source/target edges.",
    syntax: "json",
    mime_type: "application/json",
    file_extensions: &["json"],
    standards: &["RFC 8259"],
    complexity: 10,
    decodes: &[ContainerKind::Graph],
    encodes: &[ContainerKind::Graph],
};

/// JSON graph format.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonGraphFormat;

impl Format for JsonGraphFormat {
    fn info(&self) -> &'static FormatInfo {
        &INFO
    }

    fn decode(&self, text: &str) -> StrataResult<Vec<Container>> {
        let Some(json) = parse(text)? else {
            return Ok(Vec::new());
        };
        let Json::Object(object) = &json else {
            return Err(StrataError::syntax("not a graph"));
        };

        let graphs = if let Some(graphs) = object.get(GRAPHS) {
            match object.get(TYPE) {
                Some(Json::String(name)) if name == SCHEMA => {}
                _ => invalid_content_err!("a 'graphs' list needs \"type\": \"{SCHEMA}\""),
            }
            let Json::Array(graphs) = graphs else {
                invalid_content_err!("'graphs' must be an array");
            };
            graphs
                .iter()
                .map(|graph| match graph {
                    Json::Object(graph) => decode_graph(graph),
                    _ => Err(StrataError::invalid_content("graphs must be objects")),
                })
                .collect::<StrataResult<Vec<_>>>()?
        } else if object.contains_key(NODES) {
            vec![decode_graph(object)?]
        } else {
            return Err(StrataError::syntax("not a graph"));
        };

        Ok(graphs.into_iter().map(Container::from).collect())
    }

    /// A single graph in the bare style is written without the wrapper;
    /// several graphs always use it.
    fn encode(&self, containers: &[Container], config: &EncodeConfig) -> StrataResult<String> {
        let graphs = require_some(containers, &INFO)?
            .iter()
            .map(|container| expect_graph(container, &INFO))
            .collect::<StrataResult<Vec<_>>>()?;

        let json = match (config.json_graph_style, graphs.as_slice()) {
            (JsonGraphStyle::Bare, [graph]) => encode_graph(graph),
            _ => {
                let mut object = Map::new();
                object.insert(TYPE.to_string(), Json::from(SCHEMA));
                object.insert(
                    GRAPHS.to_string(),
                    Json::Array(graphs.iter().map(|graph| encode_graph(graph)).collect()),
                );
                Json::Object(object)
            }
        };
        to_text(&json, config)
    }
}

// ============================================================================
// Decoding
// ============================================================================

fn decode_graph(object: &Map<String, Json>) -> StrataResult<Graph> {
    let mut graph = Graph::new();
    graph
        .set_attributes(read_attributes(object, &[TYPE, NODES, EDGES])?)
        .map_err(content_error)?;

    // File ids are arbitrary scalars; map them onto the graph's own ids.
    let mut ids: HashMap<String, NodeId> = HashMap::new();
    for node in members(object, NODES)? {
        let Json::Object(node) = node else {
            invalid_content_err!("graph nodes must be objects");
        };
        let id = graph
            .add_node(read_attributes(node, &[ID])?)
            .map_err(content_error)?;
        if let Some(file_id) = node.get(ID) {
            let file_id = id_key(file_id)?;
            if ids.insert(file_id.clone(), id).is_some() {
                invalid_content_err!("duplicate node id {file_id}");
            }
        }
    }

    for edge in members(object, EDGES)? {
        let Json::Object(edge) = edge else {
            invalid_content_err!("graph edges must be objects");
        };
        let source = resolve(&ids, edge, SOURCE)?;
        let target = resolve(&ids, edge, TARGET)?;
        graph
            .add_edge(source, target, read_attributes(edge, &[SOURCE, TARGET])?)
            .map_err(content_error)?;
    }

    record_source(&mut graph, &INFO, SCHEMA)?;
    Ok(graph)
}

/// The array under `key`, empty when absent or null.
fn members<'a>(object: &'a Map<String, Json>, key: &str) -> StrataResult<&'a [Json]> {
    match object.get(key) {
        None | Some(Json::Null) => Ok(&[]),
        Some(Json::Array(items)) => Ok(items),
        Some(_) => Err(StrataError::invalid_content(format!("'{key}' must be an array"))),
    }
}

fn id_key(id: &Json) -> StrataResult<String> {
    match id {
        Json::String(s) => Ok(s.clone()),
        Json::Number(n) => Ok(n.to_string()),
        Json::Bool(b) => Ok(b.to_string()),
        other => Err(StrataError::invalid_content(format!(
            "node ids must be scalars, found {other}"
        ))),
    }
}

fn resolve(ids: &HashMap<String, NodeId>, edge: &Map<String, Json>, key: &str) -> StrataResult<NodeId> {
    let Some(file_id) = edge.get(key) else {
        invalid_content_err!("edge is missing '{key}'");
    };
    let file_id = id_key(file_id)?;
    ids.get(&file_id)
        .copied()
        .ok_or_else(|| StrataError::invalid_content(format!("edge {key} {file_id} does not name a node")))
}

// ============================================================================
// Encoding
// ============================================================================

fn encode_graph(graph: &Graph) -> Json {
    let mut object = Map::new();
    write_attributes(&mut object, graph.attributes(), keys::NAME);

    let nodes = graph
        .nodes()
        .map(|(id, node)| {
            let mut item = Map::new();
            item.insert(ID.to_string(), Json::from(id.to_string()));
            write_attributes(&mut item, node.attributes(), LABEL);
            Json::Object(item)
        })
        .collect();
    let edges = graph
        .edges()
        .map(|(_, edge)| {
            let (source, target) = edge.endpoints();
            let mut item = Map::new();
            item.insert(SOURCE.to_string(), Json::from(source.to_string()));
            item.insert(TARGET.to_string(), Json::from(target.to_string()));
            write_attributes(&mut item, edge.attributes(), LABEL);
            Json::Object(item)
        })
        .collect();

    object.insert(NODES.to_string(), Json::Array(nodes));
    object.insert(EDGES.to_string(), Json::Array(edges));
    Json::Object(object)
}
