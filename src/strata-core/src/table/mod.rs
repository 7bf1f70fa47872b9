//! Tabular container.
//!
//! A `Table` holds ordered columns, each described by an attribute bag, and
//! ordered rows that always carry exactly one value per column.

mod table;

pub use table::{Row, Table};
