//! JSON table, tree, and graph microformats.
//!
//! All three share the same attribute mapping for items: `label` holds the
//! name, `title` the long name, `metadata` an object of extra attributes, and
//! any other non-structural key is kept verbatim.

mod graph;
mod table;
mod tree;

pub use graph::JsonGraphFormat;
pub use table::JsonTableFormat;
pub use tree::JsonTreeFormat;

use common_config::EncodeConfig;
use common_error::{StrataError, StrataResult};
use serde::Deserialize;
use serde_json::{Map, Value as Json};
use strata_core::{AttributeBag, AttributeMap, AttributeScope, Value, keys};

const LABEL: &str = "label";
const TITLE: &str = "title";
const METADATA: &str = "metadata";
const TYPE: &str = "type";

/// Parse JSON text. Blank text is no content.
///
/// Nesting depth is not limited: deep trees nest two levels per node.
fn parse(text: &str) -> StrataResult<Option<Json>> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    let mut deserializer = serde_json::Deserializer::from_str(text);
    deserializer.disable_recursion_limit();
    let json = Json::deserialize(serde_stacker::Deserializer::new(&mut deserializer))
        .map_err(malformed)?;
    deserializer.end().map_err(malformed)?;
    Ok(Some(json))
}

fn malformed(err: serde_json::Error) -> StrataError {
    StrataError::syntax(format!("malformed JSON: {err}"))
}

fn to_text(json: &Json, config: &EncodeConfig) -> StrataResult<String> {
    let text = if config.pretty_print {
        serde_json::to_string_pretty(json)?
    } else {
        serde_json::to_string(json)?
    };
    Ok(text)
}

/// Read the attributes of a JSON object, skipping `structural` keys.
fn read_attributes(object: &Map<String, Json>, structural: &[&str]) -> StrataResult<AttributeMap> {
    let mut attributes = AttributeMap::new();
    for (key, value) in object {
        if structural.contains(&key.as_str()) {
            continue;
        }
        match key.as_str() {
            LABEL => {
                attributes.insert(keys::NAME.to_string(), Value::from(value.clone()));
            }
            TITLE => {
                attributes.insert(keys::LONG_NAME.to_string(), Value::from(value.clone()));
            }
            METADATA => {
                let Json::Object(metadata) = value else {
                    return Err(StrataError::invalid_content("'metadata' must be an object"));
                };
                for (key, value) in metadata {
                    attributes.insert(key.clone(), Value::from(value.clone()));
                }
            }
            _ => {
                attributes.insert(key.clone(), Value::from(value.clone()));
            }
        }
    }
    Ok(attributes)
}

/// Write attributes as JSON object members. The name goes under `name_key`,
/// the long name under `title`, the description as is, and everything else
/// into a `metadata` object. A column's `type` stays a top-level member and
/// source attributes of containers are dropped.
fn write_attributes(object: &mut Map<String, Json>, bag: &AttributeBag, name_key: &str) {
    let mut metadata = Map::new();
    for (key, value) in bag {
        match key.as_str() {
            keys::NAME => {
                object.insert(name_key.to_string(), value.to_json());
            }
            keys::LONG_NAME => {
                object.insert(TITLE.to_string(), value.to_json());
            }
            keys::DESCRIPTION => {
                object.insert(keys::DESCRIPTION.to_string(), value.to_json());
            }
            keys::TYPE if bag.scope() == AttributeScope::Column => {
                object.insert(TYPE.to_string(), value.to_json());
            }
            keys::SOURCE_FILE_NAME
            | keys::SOURCE_MIME_TYPE
            | keys::SOURCE_SYNTAX
            | keys::SOURCE_SCHEMA_NAME
                if bag.scope() == AttributeScope::Container => {}
            _ => {
                metadata.insert(key.clone(), value.to_json());
            }
        }
    }
    if !metadata.is_empty() {
        object.insert(METADATA.to_string(), Json::Object(metadata));
    }
}

/// Report attribute and id problems found while decoding as content errors.
fn content_error(err: StrataError) -> StrataError {
    if err.is_contract_violation() {
        StrataError::invalid_content(err.to_string())
    } else {
        err
    }
}

/// Check the optional `type` member against the expected schema name.
fn check_type(object: &Map<String, Json>, expected: &str) -> StrataResult<()> {
    match object.get(TYPE) {
        None => Ok(()),
        Some(Json::String(name)) if name == expected => Ok(()),
        Some(other) => Err(StrataError::invalid_content(format!(
            "expected 'type' to be \"{expected}\", found {other}"
        ))),
    }
}
