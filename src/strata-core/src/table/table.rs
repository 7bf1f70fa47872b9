//! Table container implementation.

use common_error::{StrataError, StrataResult, ensure, invalid_argument_err, out_of_bounds_err};
use serde::{Deserialize, Serialize};

use crate::attributes::{
    AttributeBag, AttributeMap, AttributeScope, HasAttributes, collect_attributes, keys,
};
use crate::types::{ColumnType, Value};

/// A single table row: one value per column.
pub type Row = Vec<Value>;

/// A table of columns and rows.
///
/// ## Example
///
/// ```rust
/// use strata_core::{Table, Value};
///
/// let mut table = Table::new();
/// table.append_column([("name", "city")], Value::Null).unwrap();
/// table.append_column([("name", "population"), ("type", "integer")], 0i64).unwrap();
///
/// table.append_row(vec![Value::from("Oslo"), Value::from(709_000i64)]).unwrap();
/// assert_eq!(table.value(0, 1).unwrap(), &Value::Int64(709_000));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TableRecord")]
pub struct Table {
    attributes: AttributeBag,
    columns: Vec<AttributeBag>,
    rows: Vec<Row>,
}

impl Table {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            attributes: AttributeBag::new(AttributeScope::Container),
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Create an empty table with a `name` attribute.
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            attributes: AttributeBag::with_name(AttributeScope::Container, name),
            ..Self::new()
        }
    }

    // ------------------------------------------------------------------
    // Columns
    // ------------------------------------------------------------------

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Check if the table has exactly one column.
    pub fn is_single_column(&self) -> bool {
        self.columns.len() == 1
    }

    /// All column attribute bags, in order.
    pub fn columns(&self) -> &[AttributeBag] {
        &self.columns
    }

    /// Attribute bag of column `column`.
    pub fn column_attributes(&self, column: usize) -> StrataResult<&AttributeBag> {
        self.check_column(column)?;
        Ok(&self.columns[column])
    }

    /// One attribute of column `column`.
    pub fn column_attribute(&self, column: usize, key: &str) -> StrataResult<Option<&Value>> {
        self.column_attributes(column)?.get(key)
    }

    /// Set one attribute of column `column`.
    pub fn set_column_attribute(
        &mut self,
        column: usize,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> StrataResult<()> {
        self.check_column(column)?;
        self.columns[column].set(key, value).map(|_| ())
    }

    /// Merge attributes into column `column`, all-or-nothing.
    pub fn set_column_attributes(&mut self, column: usize, values: AttributeMap) -> StrataResult<()> {
        self.check_column(column)?;
        self.columns[column].merge(values)
    }

    /// Remove all attributes from column `column`.
    pub fn clear_column_attributes(&mut self, column: usize) -> StrataResult<()> {
        self.check_column(column)?;
        self.columns[column].clear();
        Ok(())
    }

    /// The `name` attribute of column `column`.
    pub fn column_name(&self, column: usize) -> StrataResult<Option<&str>> {
        Ok(self.column_attributes(column)?.name())
    }

    /// Names of all columns, with unnamed columns as empty strings.
    pub fn column_names(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|c| c.name().unwrap_or_default().to_string())
            .collect()
    }

    /// Declared type of column `column`, `Any` when unset.
    pub fn column_type(&self, column: usize) -> StrataResult<ColumnType> {
        Ok(self
            .column_attributes(column)?
            .get_str(keys::TYPE)
            .and_then(ColumnType::parse)
            .unwrap_or_default())
    }

    /// Indices of columns whose `name` equals `name`.
    pub fn find_columns_by_name(&self, name: &str) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.name() == Some(name))
            .map(|(i, _)| i)
            .collect()
    }

    /// Copy of every value in column `column`, top to bottom.
    pub fn column_values(&self, column: usize) -> StrataResult<Vec<Value>> {
        self.check_column(column)?;
        Ok(self.rows.iter().map(|row| row[column].clone()).collect())
    }

    /// Append a column, filling existing rows with `default`.
    ///
    /// Returns the new column's index.
    pub fn append_column<I, K, V>(&mut self, attributes: I, default: impl Into<Value>) -> StrataResult<usize>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let index = self.columns.len();
        self.insert_column(index, attributes, default)?;
        Ok(index)
    }

    /// Insert a column before `column`, filling existing rows with `default`.
    ///
    /// Invalid attributes leave the table unchanged.
    pub fn insert_column<I, K, V>(
        &mut self,
        column: usize,
        attributes: I,
        default: impl Into<Value>,
    ) -> StrataResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        if column > self.columns.len() {
            out_of_bounds_err!(
                "column index {column} out of range for insert ({} columns)",
                self.columns.len()
            );
        }
        let bag = AttributeBag::with_values(AttributeScope::Column, collect_attributes(attributes))?;
        let default = default.into();

        self.columns.insert(column, bag);
        for row in &mut self.rows {
            row.insert(column, default.clone());
        }
        Ok(())
    }

    /// Delete column `column` from the schema and every row.
    pub fn delete_column(&mut self, column: usize) -> StrataResult<()> {
        self.delete_columns(column, 1)
    }

    /// Delete `count` columns starting at `column`. A zero count is a no-op.
    pub fn delete_columns(&mut self, column: usize, count: usize) -> StrataResult<()> {
        if count == 0 {
            return Ok(());
        }
        self.check_column_range(column, count)?;

        self.columns.drain(column..column + count);
        for row in &mut self.rows {
            row.drain(column..column + count);
        }
        Ok(())
    }

    /// Move column `from` so that it ends up at index `to`.
    pub fn move_column(&mut self, from: usize, to: usize) -> StrataResult<()> {
        self.check_column(from)?;
        self.check_column(to)?;
        if from == to {
            return Ok(());
        }

        let bag = self.columns.remove(from);
        self.columns.insert(to, bag);
        for row in &mut self.rows {
            let value = row.remove(from);
            row.insert(to, value);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Rows
    // ------------------------------------------------------------------

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// All rows, in order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Values of row `row`.
    pub fn row(&self, row: usize) -> StrataResult<&[Value]> {
        self.check_row(row)?;
        Ok(&self.rows[row])
    }

    /// Replace the values of row `row`.
    pub fn set_row(&mut self, row: usize, values: Row) -> StrataResult<()> {
        self.check_row(row)?;
        self.check_row_len(&values)?;
        self.rows[row] = values;
        Ok(())
    }

    /// Append a row, returning its index.
    pub fn append_row(&mut self, values: Row) -> StrataResult<usize> {
        self.append_rows(vec![values])
    }

    /// Append rows, returning the index of the first.
    pub fn append_rows(&mut self, rows: Vec<Row>) -> StrataResult<usize> {
        let index = self.rows.len();
        self.insert_rows(index, rows)?;
        Ok(index)
    }

    /// Insert a row before `row`.
    pub fn insert_row(&mut self, row: usize, values: Row) -> StrataResult<()> {
        self.insert_rows(row, vec![values])
    }

    /// Insert rows before `row`. All rows are checked before any is added.
    pub fn insert_rows(&mut self, row: usize, rows: Vec<Row>) -> StrataResult<()> {
        if rows.is_empty() {
            invalid_argument_err!("rows to insert must not be empty");
        }
        if row > self.rows.len() {
            out_of_bounds_err!(
                "row index {row} out of range for insert ({} rows)",
                self.rows.len()
            );
        }
        for values in &rows {
            self.check_row_len(values)?;
        }

        let tail = self.rows.split_off(row);
        self.rows.extend(rows);
        self.rows.extend(tail);
        Ok(())
    }

    /// Delete row `row`.
    pub fn delete_row(&mut self, row: usize) -> StrataResult<()> {
        self.delete_rows(row, 1)
    }

    /// Delete `count` rows starting at `row`. A zero count is a no-op.
    pub fn delete_rows(&mut self, row: usize, count: usize) -> StrataResult<()> {
        if count == 0 {
            return Ok(());
        }
        self.check_row_range(row, count)?;
        self.rows.drain(row..row + count);
        Ok(())
    }

    /// Move row `from` so that it ends up at index `to`.
    pub fn move_row(&mut self, from: usize, to: usize) -> StrataResult<()> {
        self.move_rows(from, to, 1)
    }

    /// Move the block of `count` rows starting at `from` so that it starts at
    /// index `to` afterwards. A zero count is a no-op.
    pub fn move_rows(&mut self, from: usize, to: usize, count: usize) -> StrataResult<()> {
        if count == 0 {
            return Ok(());
        }
        self.check_row_range(from, count)?;
        self.check_row_range(to, count)?;
        if from == to {
            return Ok(());
        }

        let block: Vec<Row> = self.rows.drain(from..from + count).collect();
        let tail = self.rows.split_off(to);
        self.rows.extend(block);
        self.rows.extend(tail);
        Ok(())
    }

    /// Remove all rows, keeping columns.
    pub fn clear_rows(&mut self) {
        self.rows.clear();
    }

    /// Remove all rows and columns, keeping table attributes.
    pub fn clear(&mut self) {
        self.rows.clear();
        self.columns.clear();
    }

    // ------------------------------------------------------------------
    // Cells
    // ------------------------------------------------------------------

    /// Value at `row`, `column`.
    pub fn value(&self, row: usize, column: usize) -> StrataResult<&Value> {
        self.check_row(row)?;
        self.check_column(column)?;
        Ok(&self.rows[row][column])
    }

    /// Replace the value at `row`, `column`, returning the old one.
    pub fn set_value(&mut self, row: usize, column: usize, value: impl Into<Value>) -> StrataResult<Value> {
        self.check_row(row)?;
        self.check_column(column)?;
        Ok(std::mem::replace(&mut self.rows[row][column], value.into()))
    }

    // ------------------------------------------------------------------
    // Bounds
    // ------------------------------------------------------------------

    fn check_column(&self, column: usize) -> StrataResult<()> {
        ensure!(
            column < self.columns.len(),
            OutOfBounds: "column index {column} out of range ({} columns)", self.columns.len()
        );
        Ok(())
    }

    fn check_column_range(&self, column: usize, count: usize) -> StrataResult<()> {
        ensure!(
            column.checked_add(count).is_some_and(|end| end <= self.columns.len()),
            OutOfBounds: "columns {column}..{} out of range ({} columns)",
            column.saturating_add(count), self.columns.len()
        );
        Ok(())
    }

    fn check_row(&self, row: usize) -> StrataResult<()> {
        ensure!(
            row < self.rows.len(),
            OutOfBounds: "row index {row} out of range ({} rows)", self.rows.len()
        );
        Ok(())
    }

    fn check_row_range(&self, row: usize, count: usize) -> StrataResult<()> {
        ensure!(
            row.checked_add(count).is_some_and(|end| end <= self.rows.len()),
            OutOfBounds: "rows {row}..{} out of range ({} rows)",
            row.saturating_add(count), self.rows.len()
        );
        Ok(())
    }

    fn check_row_len(&self, values: &[Value]) -> StrataResult<()> {
        ensure!(
            values.len() == self.columns.len(),
            InvalidArgument: "row has {} values but the table has {} columns",
            values.len(), self.columns.len()
        );
        Ok(())
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

impl HasAttributes for Table {
    fn attributes(&self) -> &AttributeBag {
        &self.attributes
    }

    fn attributes_mut(&mut self) -> &mut AttributeBag {
        &mut self.attributes
    }
}

/// Serialized shape of a [`Table`]; rows are checked against the columns.
#[derive(Deserialize)]
struct TableRecord {
    attributes: AttributeBag,
    columns: Vec<AttributeBag>,
    rows: Vec<Row>,
}

impl TryFrom<TableRecord> for Table {
    type Error = StrataError;

    fn try_from(record: TableRecord) -> StrataResult<Self> {
        record.attributes.expect_scope(AttributeScope::Container, "table")?;
        for column in &record.columns {
            column.expect_scope(AttributeScope::Column, "column")?;
        }
        let width = record.columns.len();
        for (index, row) in record.rows.iter().enumerate() {
            ensure!(
                row.len() == width,
                InvalidContent: "row {index} has {} values, expected {width}",
                row.len()
            );
        }
        Ok(Self {
            attributes: record.attributes,
            columns: record.columns,
            rows: record.rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use common_error::StrataError;

    use super::*;

    fn abc_table() -> Table {
        let mut table = Table::new();
        for name in ["a", "b", "c"] {
            table.append_column([("name", name)], 0i64).unwrap();
        }
        table
            .append_rows(vec![
                vec![Value::Int64(1), Value::Int64(2), Value::Int64(3)],
                vec![Value::Int64(4), Value::Int64(5), Value::Int64(6)],
                vec![Value::Int64(7), Value::Int64(8), Value::Int64(9)],
            ])
            .unwrap();
        table
    }

    fn first_column(table: &Table) -> Vec<i64> {
        table
            .column_values(0)
            .unwrap()
            .iter()
            .filter_map(Value::as_int64)
            .collect()
    }

    #[test]
    fn test_table_creation() {
        let table = Table::with_name("empty");
        assert_eq!(table.name(), Some("empty"));
        assert_eq!(table.column_count(), 0);
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_append_column_fills_rows() {
        let mut table = abc_table();
        let index = table.append_column([("name", "d")], "x").unwrap();

        assert_eq!(index, 3);
        assert_eq!(table.column_names(), vec!["a", "b", "c", "d"]);
        for row in table.rows() {
            assert_eq!(row.len(), 4);
            assert_eq!(row[3], Value::from("x"));
        }
    }

    #[test]
    fn test_insert_column_rolls_back_on_bad_attributes() {
        let mut table = abc_table();
        let before = table.clone();

        let err = table.insert_column(1, [("type", "decimal")], 0i64).unwrap_err();
        assert!(matches!(err, StrataError::InvalidArgument(_)));
        assert_eq!(table, before);

        let err = table.insert_column(9, [("name", "z")], 0i64).unwrap_err();
        assert!(matches!(err, StrataError::OutOfBounds(_)));
    }

    #[test]
    fn test_delete_columns() {
        let mut table = abc_table();
        table.delete_columns(0, 0).unwrap();
        assert_eq!(table.column_count(), 3);

        table.delete_columns(1, 2).unwrap();
        assert_eq!(table.column_names(), vec!["a"]);
        assert_eq!(table.rows()[2], vec![Value::Int64(7)]);

        assert!(table.delete_columns(0, 2).is_err());
    }

    #[test]
    fn test_move_column() {
        let mut table = abc_table();
        table.move_column(0, 2).unwrap();

        assert_eq!(table.column_names(), vec!["b", "c", "a"]);
        assert_eq!(
            table.row(0).unwrap(),
            &[Value::Int64(2), Value::Int64(3), Value::Int64(1)]
        );
        assert!(table.move_column(0, 3).is_err());
    }

    #[test]
    fn test_row_length_checked() {
        let mut table = abc_table();
        let err = table.append_row(vec![Value::Int64(1)]).unwrap_err();
        assert!(matches!(err, StrataError::InvalidArgument(_)));

        let err = table
            .append_rows(vec![
                vec![Value::Null, Value::Null, Value::Null],
                vec![Value::Null],
            ])
            .unwrap_err();
        assert!(matches!(err, StrataError::InvalidArgument(_)));
        assert_eq!(table.row_count(), 3);

        assert!(table.append_rows(vec![]).is_err());
    }

    #[test]
    fn test_insert_and_delete_rows() {
        let mut table = abc_table();
        table
            .insert_row(1, vec![Value::Int64(0), Value::Int64(0), Value::Int64(0)])
            .unwrap();
        assert_eq!(first_column(&table), vec![1, 0, 4, 7]);

        table.delete_rows(0, 2).unwrap();
        assert_eq!(first_column(&table), vec![4, 7]);

        table.delete_rows(5, 0).unwrap();
        assert!(table.delete_row(2).is_err());
    }

    #[test]
    fn test_move_rows() {
        let mut table = abc_table();
        table.move_row(1, 1).unwrap();
        assert_eq!(first_column(&table), vec![1, 4, 7]);

        table.move_rows(0, 1, 2).unwrap();
        assert_eq!(first_column(&table), vec![7, 1, 4]);

        table.move_row(2, 0).unwrap();
        assert_eq!(first_column(&table), vec![4, 7, 1]);

        assert!(table.move_rows(0, 2, 2).is_err());
    }

    #[test]
    fn test_cells() {
        let mut table = abc_table();
        let old = table.set_value(2, 2, "nine").unwrap();

        assert_eq!(old, Value::Int64(9));
        assert_eq!(table.value(2, 2).unwrap(), &Value::from("nine"));
        assert!(table.value(3, 0).is_err());
        assert!(table.set_value(0, 3, 1i64).is_err());
    }

    #[test]
    fn test_column_metadata() {
        let mut table = abc_table();
        table.set_column_attribute(1, "type", "integer").unwrap();
        table.set_column_attribute(2, "name", "a").unwrap();

        assert_eq!(table.column_type(1).unwrap(), ColumnType::Integer);
        assert_eq!(table.column_type(0).unwrap(), ColumnType::Any);
        assert_eq!(table.find_columns_by_name("a"), vec![0, 2]);
        assert!(table.set_column_attribute(0, "type", "decimal").is_err());
        assert!(table.column_attributes(3).is_err());
    }

    #[test]
    fn test_clone_is_independent() {
        let table = abc_table();
        let mut copy = table.clone();
        copy.set_value(0, 0, 100i64).unwrap();
        copy.set_column_attribute(0, "name", "renamed").unwrap();

        assert_eq!(table.value(0, 0).unwrap(), &Value::Int64(1));
        assert_eq!(table.column_name(0).unwrap(), Some("a"));
    }

    #[test]
    fn test_deserialize_checks_row_width() {
        let table = abc_table();
        let text = serde_json::to_string(&table).unwrap();
        assert_eq!(serde_json::from_str::<Table>(&text).unwrap(), table);

        let ragged = r#"{
            "attributes": {"scope": "Container", "values": {}},
            "columns": [
                {"scope": "Column", "values": {"name": "a"}},
                {"scope": "Column", "values": {"name": "b"}}
            ],
            "rows": [[1]]
        }"#;
        let err = serde_json::from_str::<Table>(ragged).unwrap_err();
        assert!(err.to_string().contains("row 0 has 1 values"), "{err}");

        let misscoped = r#"{
            "attributes": {"scope": "Item", "values": {}},
            "columns": [],
            "rows": []
        }"#;
        assert!(serde_json::from_str::<Table>(misscoped).is_err());
    }
}
