//! HTML tables.

use common_config::EncodeConfig;
use common_error::{StrataError, StrataResult};
use log::debug;
use scraper::{ElementRef, Html, Selector};
use strata_core::{Container, ContainerKind, HasAttributes, Table, Value, keys};

use crate::format::{Format, FormatInfo, expect_table, record_source, require_some};
use crate::infer::infer_value;

static INFO: FormatInfo = FormatInfo {
    name: "html",
    long_name: "HTML table",
    description: "Tables marked up with <table> elements in an HTML document.",
    syntax: "html",
    mime_type: "text/html",
    file_extensions: &["html", "htm", "xhtml"],
    standards: &["HTML Living Standard"],
    complexity: 5,
    decodes: &[ContainerKind::Table],
    encodes: &[ContainerKind::Table],
};

/// HTML table format.
///
/// Every `<table>` in the document becomes one table. The `<caption>` names
/// the table; the first `<thead>` row, or else the first row, names the
/// columns. Rows inside `<tfoot>` or nested tables are ignored, and tables
/// without any cells are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlTableFormat;

impl Format for HtmlTableFormat {
    fn info(&self) -> &'static FormatInfo {
        &INFO
    }

    fn decode(&self, text: &str) -> StrataResult<Vec<Container>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let document = Html::parse_document(text);
        let selector = Selector::parse("table")
            .map_err(|e| StrataError::internal(format!("bad table selector: {e:?}")))?;

        let mut found = 0;
        let mut containers = Vec::new();
        for element in document.select(&selector) {
            found += 1;
            match decode_table(element)? {
                Some(mut table) => {
                    record_source(&mut table, &INFO, INFO.name)?;
                    containers.push(table.into());
                }
                None => debug!("skipping HTML table {found} with no cells"),
            }
        }

        if found == 0 {
            return Err(StrataError::syntax("no <table> element found"));
        }
        Ok(containers)
    }

    fn encode(&self, containers: &[Container], config: &EncodeConfig) -> StrataResult<String> {
        let tables = require_some(containers, &INFO)?
            .iter()
            .map(|container| expect_table(container, &INFO))
            .collect::<StrataResult<Vec<_>>>()?;

        let mut out = String::new();
        for table in tables {
            encode_table(&mut out, table, config);
        }
        Ok(out)
    }
}

// ============================================================================
// Decoding
// ============================================================================

struct HtmlRow<'a> {
    in_head: bool,
    element: ElementRef<'a>,
}

fn decode_table(element: ElementRef<'_>) -> StrataResult<Option<Table>> {
    let mut rows = Vec::new();
    collect_rows(element, false, &mut rows);

    let header_at = rows.iter().position(|row| row.in_head).unwrap_or(0);
    let Some(header) = rows.get(header_at) else {
        return Ok(None);
    };
    let names = cell_texts(header.element);
    if names.is_empty() {
        return Ok(None);
    }

    let mut table = Table::new();
    if let Some(caption) = caption_text(element) {
        table.set_attribute(keys::NAME, caption)?;
    }
    for name in &names {
        table.append_column([(keys::NAME, name.as_str())], Value::Null)?;
    }

    let width = names.len();
    for (i, row) in rows.iter().enumerate() {
        if i == header_at || row.in_head {
            continue;
        }
        let cells = cell_texts(row.element);
        if cells.is_empty() {
            continue;
        }
        let mut values: Vec<Value> = cells.iter().map(|cell| infer_value(cell)).collect();
        values.resize(width, Value::Null);
        table.append_row(values)?;
    }
    Ok(Some(table))
}

/// Collect the `<tr>` rows belonging to `parent`, skipping `<tfoot>` and
/// nested tables.
fn collect_rows<'a>(parent: ElementRef<'a>, in_head: bool, rows: &mut Vec<HtmlRow<'a>>) {
    for child in parent.children().filter_map(ElementRef::wrap) {
        match child.value().name() {
            "table" | "tfoot" => {}
            "thead" => collect_rows(child, true, rows),
            "tr" => rows.push(HtmlRow {
                in_head,
                element: child,
            }),
            _ => collect_rows(child, in_head, rows),
        }
    }
}

fn cell_texts(row: ElementRef<'_>) -> Vec<String> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|cell| matches!(cell.value().name(), "th" | "td"))
        .map(element_text)
        .collect()
}

fn caption_text(table: ElementRef<'_>) -> Option<String> {
    table
        .children()
        .filter_map(ElementRef::wrap)
        .find(|child| child.value().name() == "caption")
        .map(element_text)
        .filter(|text| !text.is_empty())
}

/// Element text with runs of whitespace collapsed to single spaces.
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

// ============================================================================
// Encoding
// ============================================================================

fn encode_table(out: &mut String, table: &Table, config: &EncodeConfig) {
    out.push_str("<table>\n");
    if config.include_caption {
        if let Some(name) = table.name() {
            out.push_str(&format!("<caption>{}</caption>\n", escape(name)));
        }
    }

    out.push_str("<thead><tr>");
    for name in table.column_names() {
        out.push_str(&format!("<th>{}</th>", escape(&name)));
    }
    out.push_str("</tr></thead>\n<tbody>\n");

    for row in table.rows() {
        out.push_str("<tr>");
        for value in row {
            out.push_str(&format!("<td>{}</td>", escape(&value.to_string())));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>\n");
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            c => escaped.push(c),
        }
    }
    escaped
}
