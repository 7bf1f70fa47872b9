//! Attribute storage shared by containers, columns, nodes, and edges.
//!
//! This module provides the `AttributeBag` type and `HasAttributes` trait.
//! A bag enforces that its well-known keys hold strings; which keys are
//! well-known depends on the bag's [`AttributeScope`].

mod bag;
mod keywords;

pub use bag::{AttributeBag, AttributeMap, HasAttributes};
pub(crate) use bag::collect_attributes;
pub use keywords::keywordize;

use serde::{Deserialize, Serialize};

/// Well-known attribute keys.
pub mod keys {
    /// Short name.
    pub const NAME: &str = "name";
    /// Human-readable long name.
    pub const LONG_NAME: &str = "longName";
    /// Free-form description.
    pub const DESCRIPTION: &str = "description";
    /// File the container was decoded from.
    pub const SOURCE_FILE_NAME: &str = "sourceFileName";
    /// MIME type of the decoded syntax.
    pub const SOURCE_MIME_TYPE: &str = "sourceMIMEType";
    /// Syntax the container was decoded from.
    pub const SOURCE_SYNTAX: &str = "sourceSyntax";
    /// Schema the decoded content followed.
    pub const SOURCE_SCHEMA_NAME: &str = "sourceSchemaName";
    /// Column data type (column scope only).
    pub const TYPE: &str = "type";
}

const CONTAINER_KEYS: [&str; 7] = [
    keys::NAME,
    keys::LONG_NAME,
    keys::DESCRIPTION,
    keys::SOURCE_FILE_NAME,
    keys::SOURCE_MIME_TYPE,
    keys::SOURCE_SYNTAX,
    keys::SOURCE_SCHEMA_NAME,
];

const ITEM_KEYS: [&str; 3] = [keys::NAME, keys::LONG_NAME, keys::DESCRIPTION];

/// Which entity a bag belongs to, selecting its well-known key set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeScope {
    /// Table, tree, or graph.
    Container,
    /// Tree node, graph node, or graph edge.
    Item,
    /// Table column; `type` must also name a column type.
    Column,
}

impl AttributeScope {
    /// Keys whose values must be strings in this scope.
    pub const fn well_known_keys(self) -> &'static [&'static str] {
        match self {
            Self::Container => &CONTAINER_KEYS,
            Self::Item | Self::Column => &ITEM_KEYS,
        }
    }

    /// Check if `key` is well-known in this scope.
    pub fn is_well_known(self, key: &str) -> bool {
        self.well_known_keys().contains(&key)
    }
}
