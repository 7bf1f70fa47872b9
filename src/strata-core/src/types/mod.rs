//! Type system for Strata containers.
//!
//! - `Value` for cell and attribute values
//! - `ColumnType` for descriptive column typing

mod column_type;
mod value;

pub use column_type::ColumnType;
pub use value::Value;
