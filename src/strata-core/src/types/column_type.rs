//! Descriptive column types.

use std::fmt;
use std::str::FromStr;

use common_error::StrataError;
use serde::{Deserialize, Serialize};

/// Declared type of a table column.
///
/// Purely descriptive: tables never coerce or check cell values against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    #[default]
    Any,
    Boolean,
    Date,
    DateTime,
    Integer,
    Null,
    Number,
    String,
    Time,
}

impl ColumnType {
    /// All column types, in name order.
    pub const ALL: [Self; 9] = [
        Self::Any,
        Self::Boolean,
        Self::Date,
        Self::DateTime,
        Self::Integer,
        Self::Null,
        Self::Number,
        Self::String,
        Self::Time,
    ];

    /// The lower-case name used in attributes and JSON schemas.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::Integer => "integer",
            Self::Null => "null",
            Self::Number => "number",
            Self::String => "string",
            Self::Time => "time",
        }
    }

    /// Look up a type by name, case-insensitively.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(name))
    }
}

impl FromStr for ColumnType {
    type Err = StrataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            StrataError::invalid_argument(format!("unknown column type '{s}'"))
        })
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
