//! Text formats for Strata containers.
//!
//! This crate provides:
//! - the `Format` trait and per-format `FormatInfo` metadata
//! - CSV, TSV, HTML table, and JSON table/tree/graph formats
//! - `FormatRegistry`, which sniffs the format of unknown text

pub mod format;
pub mod formats;
pub mod infer;
pub mod registry;

// Re-export commonly used types
pub use format::{Format, FormatInfo, MAX_COMPLEXITY};
pub use formats::{
    CsvFormat, HtmlTableFormat, JsonGraphFormat, JsonTableFormat, JsonTreeFormat, TsvFormat,
};
pub use infer::infer_value;
pub use registry::FormatRegistry;
