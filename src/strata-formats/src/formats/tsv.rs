//! Tab-separated values.

use common_config::EncodeConfig;
use common_error::StrataResult;
use strata_core::{Container, ContainerKind};

use super::{cell_text, table_from_records};
use crate::format::{Format, FormatInfo, expect_table, record_source, require_one};

static INFO: FormatInfo = FormatInfo {
    name: "tsv",
    long_name: "Tab-separated values",
    description: "Rows of tab-separated fields; the first row names the columns.",
    syntax: "tsv",
    mime_type: "text/tab-separated-values",
    file_extensions: &["tsv", "tab"],
    standards: &["IANA text/tab-separated-values"],
    complexity: 1,
    decodes: &[ContainerKind::Table],
    encodes: &[ContainerKind::Table],
};

/// TSV table format.
///
/// Fields are split on single tabs with no quoting or escaping. Blank lines
/// are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct TsvFormat;

impl Format for TsvFormat {
    fn info(&self) -> &'static FormatInfo {
        &INFO
    }

    fn decode(&self, text: &str) -> StrataResult<Vec<Container>> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let lines = text
            .split(['\r', '\n'])
            .filter(|line| !line.trim().is_empty())
            .map(|line| Ok(line.split('\t')));

        let Some(mut table) = table_from_records(lines)? else {
            return Ok(Vec::new());
        };
        record_source(&mut table, &INFO, INFO.name)?;
        Ok(vec![table.into()])
    }

    /// Tabs and line breaks inside values are replaced with spaces, since
    /// TSV has no way to escape them.
    fn encode(&self, containers: &[Container], _config: &EncodeConfig) -> StrataResult<String> {
        let table = expect_table(require_one(containers, &INFO)?, &INFO)?;

        let mut out = String::new();
        push_line(&mut out, table.column_names());
        for row in table.rows() {
            push_line(&mut out, row.iter().map(cell_text));
        }
        Ok(out)
    }
}

fn push_line(out: &mut String, fields: impl IntoIterator<Item = String>) {
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            out.push('\t');
        }
        out.extend(field.chars().map(|c| match c {
            '\t' | '\r' | '\n' => ' ',
            c => c,
        }));
    }
    out.push_str("\r\n");
}
