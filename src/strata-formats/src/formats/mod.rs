//! Format implementations.
//!
//! Delimited text (CSV, TSV), HTML tables, and the JSON table, tree, and
//! graph microformats.

mod csv;
mod html;
mod json;
mod tsv;

pub use csv::CsvFormat;
pub use html::HtmlTableFormat;
pub use json::{JsonGraphFormat, JsonTableFormat, JsonTreeFormat};
pub use tsv::TsvFormat;

use common_error::{StrataError, StrataResult};
use strata_core::{Table, Value, keys};

use crate::infer::infer_value;

/// Build a table from delimited records. The first record names the columns
/// and every later record must have the same number of fields.
pub(crate) fn table_from_records<I, R, S>(records: I) -> StrataResult<Option<Table>>
where
    I: IntoIterator<Item = StrataResult<R>>,
    R: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut records = records.into_iter();
    let Some(header) = records.next() else {
        return Ok(None);
    };

    let mut table = Table::new();
    for name in header? {
        table.append_column([(keys::NAME, name.as_ref())], Value::Null)?;
    }

    let width = table.column_count();
    for record in records {
        let row: Vec<Value> = record?.into_iter().map(|field| infer_value(field.as_ref())).collect();
        if row.len() != width {
            return Err(StrataError::syntax(
                "rows must all have the same number of values as the first row",
            ));
        }
        table.append_row(row)?;
    }
    Ok(Some(table))
}

/// Text of a cell as written by the delimited encoders.
pub(crate) fn cell_text(value: &Value) -> String {
    value.to_string()
}
