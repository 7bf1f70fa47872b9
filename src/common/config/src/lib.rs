//! Configuration management for Strata.
//!
//! Provides the settings the format registry uses when sniffing input and the
//! output shapes format encoders produce.

use serde::{Deserialize, Serialize};

/// Global Strata configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrataConfig {
    /// Decode configuration.
    pub decode: DecodeConfig,
    /// Encode configuration.
    pub encode: EncodeConfig,
}

/// Settings applied by the format registry while decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeConfig {
    /// Restrict `decode_file` to formats claiming the file's extension.
    pub use_file_extension: bool,
}

/// Settings applied by format encoders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeConfig {
    /// Indent JSON output.
    pub pretty_print: bool,
    /// Output shape for JSON tables.
    pub json_table_style: JsonTableStyle,
    /// Output shape for JSON trees.
    pub json_tree_style: JsonTreeStyle,
    /// Output shape for JSON graphs.
    pub json_graph_style: JsonGraphStyle,
    /// Emit a `<caption>` for named HTML tables.
    pub include_caption: bool,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            pretty_print: true,
            json_table_style: JsonTableStyle::default(),
            json_tree_style: JsonTreeStyle::default(),
            json_graph_style: JsonGraphStyle::default(),
            include_caption: true,
        }
    }
}

/// JSON table output shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum JsonTableStyle {
    /// `[[header...], [row...], ...]`
    ArrayOfArrays,
    /// `[{column: value, ...}, ...]`
    ArrayOfObjects,
    /// `{"name": .., "table": [[header...], [row...]]}`
    ObjectWithTable,
    /// `{"type": "json-table", "fields": [...], "table": [[row...]]}`
    #[default]
    ObjectWithSchemaAndTable,
}

/// JSON tree output shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum JsonTreeStyle {
    /// Root node object with `children`, no wrapper.
    Bare,
    /// `{"type": "json-tree", "tree": {...}}`
    #[default]
    WithSchema,
}

/// JSON graph output shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum JsonGraphStyle {
    /// Single graph object with `nodes` and `edges`, no wrapper.
    Bare,
    /// `{"type": "json-graph", "graphs": [...]}`
    #[default]
    WithSchema,
}
