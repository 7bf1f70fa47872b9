//! JSON table microformat.
//!
//! The root is either an array of rows or an object with a `table` array.
//! Rows are arrays or objects. Without a schema the first array row names the
//! columns; a `fields` list or a well-known `type` supplies the columns
//! instead, and then every row is data.

use std::iter;

use common_config::{EncodeConfig, JsonTableStyle};
use common_error::{StrataError, StrataResult, invalid_content_err};
use indexmap::IndexSet;
use log::debug;
use serde_json::{Map, Value as Json};
use strata_core::{
    AttributeMap, ColumnType, Container, ContainerKind, HasAttributes, Table, Value, keys,
};

use super::{TYPE, content_error, parse, read_attributes, to_text, write_attributes};
use crate::format::{Format, FormatInfo, expect_table, record_source, require_one};

const SCHEMA: &str = "json-table";
const TABLE: &str = "table";
const FIELDS: &str = "fields";

/// `type` values that name no particular schema.
const GENERIC_SCHEMAS: [&str; 2] = ["table", SCHEMA];

/// Named schemas recognized through `type` when no `fields` are given.
const WELL_KNOWN_SCHEMAS: &[(&str, &[(&str, ColumnType)])] = &[(
    "messages",
    &[
        ("time", ColumnType::DateTime),
        ("type", ColumnType::String),
        ("message", ColumnType::String),
    ],
)];

static INFO: FormatInfo = FormatInfo {
    name: "json-table",
    long_name: "JSON table",
    description: "Rows of values as JSON arrays or objects, optionally with a field schema.",
    syntax: "json",
    mime_type: "application/json",
    file_extensions: &["json"],
    standards: &["RFC 8259"],
    complexity: 9,
    decodes: &[ContainerKind::Table],
    encodes: &[ContainerKind::Table],
};

/// JSON table format.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonTableFormat;

impl Format for JsonTableFormat {
    fn info(&self) -> &'static FormatInfo {
        &INFO
    }

    fn decode(&self, text: &str) -> StrataResult<Vec<Container>> {
        let Some(json) = parse(text)? else {
            return Ok(Vec::new());
        };

        let (mut table, schema_name) = match &json {
            Json::Array(rows) if rows.is_empty() => return Ok(Vec::new()),
            Json::Array(rows) => (decode_rows(rows, None)?, SCHEMA.to_string()),
            Json::Object(object) => decode_object(object)?,
            _ => return Err(StrataError::syntax("not a table")),
        };

        record_source(&mut table, &INFO, &schema_name)?;
        Ok(vec![table.into()])
    }

    fn encode(&self, containers: &[Container], config: &EncodeConfig) -> StrataResult<String> {
        let table = expect_table(require_one(containers, &INFO)?, &INFO)?;
        let names = table.column_names();
        let header = || Json::Array(names.iter().map(|name| Json::from(name.as_str())).collect());
        let rows = || {
            table
                .rows()
                .iter()
                .map(|row| Json::Array(row.iter().map(Value::to_json).collect()))
        };

        let json = match config.json_table_style {
            JsonTableStyle::ArrayOfArrays => Json::Array(iter::once(header()).chain(rows()).collect()),
            JsonTableStyle::ArrayOfObjects => Json::Array(
                table
                    .rows()
                    .iter()
                    .map(|row| {
                        Json::Object(names.iter().cloned().zip(row.iter().map(Value::to_json)).collect())
                    })
                    .collect(),
            ),
            JsonTableStyle::ObjectWithTable => {
                let mut object = Map::new();
                write_attributes(&mut object, table.attributes(), keys::NAME);
                object.insert(
                    TABLE.to_string(),
                    Json::Array(iter::once(header()).chain(rows()).collect()),
                );
                Json::Object(object)
            }
            JsonTableStyle::ObjectWithSchemaAndTable => {
                let mut object = Map::new();
                object.insert(TYPE.to_string(), Json::from(SCHEMA));
                write_attributes(&mut object, table.attributes(), keys::NAME);
                object.insert(FIELDS.to_string(), Json::Array(encode_fields(table)));
                object.insert(TABLE.to_string(), Json::Array(rows().collect()));
                Json::Object(object)
            }
        };
        to_text(&json, config)
    }
}

// ============================================================================
// Decoding
// ============================================================================

fn decode_object(object: &Map<String, Json>) -> StrataResult<(Table, String)> {
    let Some(rows) = object.get(TABLE) else {
        return Err(StrataError::syntax("not a table"));
    };
    let Json::Array(rows) = rows else {
        invalid_content_err!("'table' must be an array");
    };
    let type_name = match object.get(TYPE) {
        None => None,
        Some(Json::String(name)) => Some(name.as_str()),
        Some(other) => invalid_content_err!("'type' must be a string, found {other}"),
    };

    // An unrecognized `type` is accepted as long as `fields` describe the columns.
    let columns = match (object.get(FIELDS), type_name) {
        (Some(fields), _) => Some(decode_fields(fields)?),
        (None, None) => None,
        (None, Some(name)) if GENERIC_SCHEMAS.contains(&name) => None,
        (None, Some(name)) => Some(well_known_columns(name)?),
    };

    let mut table = decode_rows(rows, columns)?;
    table
        .set_attributes(read_attributes(object, &[TYPE, TABLE, FIELDS])?)
        .map_err(content_error)?;
    Ok((table, type_name.unwrap_or(SCHEMA).to_string()))
}

fn decode_fields(fields: &Json) -> StrataResult<Vec<AttributeMap>> {
    let Json::Array(fields) = fields else {
        invalid_content_err!("'fields' must be an array");
    };

    fields
        .iter()
        .map(|field| {
            let Json::Object(field) = field else {
                invalid_content_err!("schema fields must be objects");
            };
            if !matches!(field.get(keys::NAME), Some(Json::String(_))) {
                invalid_content_err!("every schema field needs a string 'name'");
            }

            let mut attributes = read_attributes(field, &[])?;
            if let Some(declared) = attributes.get(keys::TYPE) {
                let Some(column_type) = declared.as_str().and_then(ColumnType::parse) else {
                    invalid_content_err!("unknown column type {declared}");
                };
                attributes.insert(keys::TYPE.to_string(), Value::from(column_type.as_str()));
            }
            Ok(attributes)
        })
        .collect()
}

fn well_known_columns(name: &str) -> StrataResult<Vec<AttributeMap>> {
    let Some((_, columns)) = WELL_KNOWN_SCHEMAS.iter().find(|(known, _)| *known == name) else {
        invalid_content_err!("unknown table schema \"{name}\"");
    };
    debug!("using well-known table schema {name}");

    Ok(columns
        .iter()
        .map(|(column, column_type)| {
            AttributeMap::from_iter([
                (keys::NAME.to_string(), Value::from(*column)),
                (keys::TYPE.to_string(), Value::from(column_type.as_str())),
            ])
        })
        .collect())
}

/// Build a table from JSON rows. Without `columns`, a leading array row names
/// the columns, or else the keys of all object rows do.
fn decode_rows(rows: &[Json], columns: Option<Vec<AttributeMap>>) -> StrataResult<Table> {
    let mut table = Table::new();
    let mut rows = rows.iter();

    match columns {
        Some(columns) => {
            for column in columns {
                table.append_column(column, Value::Null).map_err(content_error)?;
            }
        }
        None => match rows.as_slice().first() {
            None => {}
            Some(Json::Array(header)) => {
                rows.next();
                for cell in header {
                    table.append_column([(keys::NAME, header_name(cell))], Value::Null)?;
                }
            }
            Some(Json::Object(_)) => {
                let mut names = IndexSet::new();
                for row in rows.as_slice() {
                    if let Json::Object(row) = row {
                        names.extend(row.keys().cloned());
                    }
                }
                for name in names {
                    table.append_column([(keys::NAME, name)], Value::Null)?;
                }
            }
            Some(other) => invalid_content_err!("table rows must be arrays or objects, found {other}"),
        },
    }

    let names = table.column_names();
    for (i, row) in rows.enumerate() {
        let values: Vec<Value> = match row {
            Json::Array(cells) if cells.len() == names.len() => {
                cells.iter().cloned().map(Value::from).collect()
            }
            Json::Array(cells) => invalid_content_err!(
                "table row {i} has {} values, expected {}",
                cells.len(),
                names.len()
            ),
            Json::Object(cells) => names
                .iter()
                .map(|name| cells.get(name).cloned().map(Value::from).unwrap_or_default())
                .collect(),
            other => invalid_content_err!("table rows must be arrays or objects, found {other}"),
        };
        table.append_row(values)?;
    }
    Ok(table)
}

fn header_name(cell: &Json) -> String {
    match cell {
        Json::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ============================================================================
// Encoding
// ============================================================================

fn encode_fields(table: &Table) -> Vec<Json> {
    table
        .columns()
        .iter()
        .map(|column| {
            let mut field = Map::new();
            field.insert(keys::NAME.to_string(), Json::from(""));
            write_attributes(&mut field, column, keys::NAME);
            Json::Object(field)
        })
        .collect()
}
