//! Comma-separated values.

use common_config::EncodeConfig;
use common_error::{StrataError, StrataResult};
use strata_core::{Container, ContainerKind};

use super::{cell_text, table_from_records};
use crate::format::{Format, FormatInfo, expect_table, record_source, require_one};

static INFO: FormatInfo = FormatInfo {
    name: "csv",
    long_name: "Comma-separated values",
    description: "Rows of comma-separated fields; the first row names the columns.",
    syntax: "csv",
    mime_type: "text/csv",
    file_extensions: &["csv"],
    standards: &["RFC 4180"],
    complexity: 0,
    decodes: &[ContainerKind::Table],
    encodes: &[ContainerKind::Table],
};

/// CSV table format.
///
/// Accepts CR, LF, and CRLF line endings, mixed within one file. Quoted
/// fields may hold commas, doubled quotes, and line breaks.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvFormat;

impl Format for CsvFormat {
    fn info(&self) -> &'static FormatInfo {
        &INFO
    }

    fn decode(&self, text: &str) -> StrataResult<Vec<Container>> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        // The default terminator treats CR, LF, and CRLF alike.
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());
        let records = reader.records().map(|record| {
            record
                .map(|r| r.iter().map(str::to_string).collect::<Vec<_>>())
                .map_err(|e| StrataError::syntax(format!("malformed CSV: {e}")))
        });

        let Some(mut table) = table_from_records(records)? else {
            return Ok(Vec::new());
        };
        record_source(&mut table, &INFO, INFO.name)?;
        Ok(vec![table.into()])
    }

    fn encode(&self, containers: &[Container], _config: &EncodeConfig) -> StrataResult<String> {
        let table = expect_table(require_one(containers, &INFO)?, &INFO)?;

        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::CRLF)
            .from_writer(Vec::new());
        writer.write_record(table.column_names()).map_err(write_error)?;
        for row in table.rows() {
            writer
                .write_record(row.iter().map(cell_text))
                .map_err(write_error)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| StrataError::internal(format!("CSV writer flush failed: {e}")))?;
        String::from_utf8(bytes)
            .map_err(|e| StrataError::internal(format!("CSV writer produced invalid UTF-8: {e}")))
    }
}

fn write_error(err: csv::Error) -> StrataError {
    StrataError::internal(format!("CSV write failed: {err}"))
}

#[cfg(test)]
mod tests {
    use strata_core::testing::sample_table;
    use strata_core::{HasAttributes, Table, Value};

    use super::*;

    fn decode_table(text: &str) -> Table {
        let mut containers = CsvFormat.decode(text).unwrap();
        assert_eq!(containers.len(), 1);
        containers.remove(0).into_table().unwrap()
    }

    #[test]
    fn test_decode_with_type_inference() {
        let table = decode_table("a,b\r\n1,2\r\n3,4\r\n");
        assert_eq!(table.column_names(), vec!["a", "b"]);
        assert_eq!(
            table.rows(),
            &[
                vec![Value::Int64(1), Value::Int64(2)],
                vec![Value::Int64(3), Value::Int64(4)],
            ]
        );
        assert_eq!(table.source_mime_type(), Some("text/csv"));
        assert_eq!(table.source_syntax(), Some("csv"));
    }

    #[test]
    fn test_mixed_line_endings() {
        let table = decode_table("name,score\rann,1.5\rbob,true\n");
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.value(0, 1).unwrap(), &Value::Float64(1.5));
        assert_eq!(table.value(1, 1).unwrap(), &Value::Bool(true));

        let table = decode_table("x\ny\r\nz");
        assert_eq!(table.column_values(0).unwrap(), vec![Value::from("y"), Value::from("z")]);
    }

    #[test]
    fn test_quoted_fields() {
        let table = decode_table("text,n\r\n\"a, b\",1\r\n\"say \"\"hi\"\"\",2\r\n\"two\nlines\",3\r\n");
        assert_eq!(table.value(0, 0).unwrap(), &Value::from("a, b"));
        assert_eq!(table.value(1, 0).unwrap(), &Value::from("say \"hi\""));
        assert_eq!(table.value(2, 0).unwrap(), &Value::from("two\nlines"));
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = CsvFormat.decode("a,b\n1,2\n3\n").unwrap_err();
        assert!(err.is_syntax());
        assert!(err.to_string().contains("same number of values"));
    }

    #[test]
    fn test_no_content() {
        assert!(CsvFormat.decode("").unwrap().is_empty());
        assert!(CsvFormat.decode(" \r\n").unwrap().is_empty());
    }

    #[test]
    fn test_single_value_is_single_column_table() {
        let containers = CsvFormat.decode("hello").unwrap();
        assert!(containers[0].is_single_column_table());
    }

    #[test]
    fn test_encode_quotes_when_needed() {
        let mut table = Table::new();
        table.append_column([("name", "text")], Value::Null).unwrap();
        table.append_column([("name", "n")], Value::Null).unwrap();
        table.append_row(vec![Value::from("a, b"), Value::Int64(1)]).unwrap();
        table.append_row(vec![Value::from("plain"), Value::Null]).unwrap();

        let text = CsvFormat
            .encode(&[table.into()], &EncodeConfig::default())
            .unwrap();
        assert_eq!(text, "text,n\r\n\"a, b\",1\r\nplain,\r\n");
    }

    #[test]
    fn test_round_trip() {
        let table = sample_table().unwrap();
        let text = CsvFormat
            .encode(&[table.clone().into()], &EncodeConfig::default())
            .unwrap();
        let decoded = decode_table(&text);
        assert_eq!(decoded.column_names(), table.column_names());
        assert_eq!(decoded.rows(), table.rows());
    }

    #[test]
    fn test_encode_rejects_trees() {
        let err = CsvFormat
            .encode(&[strata_core::Tree::new().into()], &EncodeConfig::default())
            .unwrap_err();
        assert!(err.is_contract_violation());
    }
}
