// Row Access Helpers
//
// Typed, name-based access to the rows handed to custom predicates and
// computed columns.

use chrono::{NaiveDate, NaiveDateTime};

use crate::catalog::{Catalog, Table};
use crate::common::types::{DATETIME_FORMAT, DATE_FORMAT, RowMap};
use crate::query::executor::result::{QueryError, QueryResult};

/// One table's row inside a row map, addressable by column name
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    table: &'a Table,
    cells: &'a [String],
}

/// Look up the row of `table` in a row map
pub fn row_view<'a>(row: &RowMap<'a>, catalog: &'a Catalog, table: &str) -> QueryResult<RowView<'a>> {
    let t = catalog.table(table)?;
    let cells = row
        .get(table)
        .copied()
        .ok_or_else(|| QueryError::TableNotInRow(table.to_string()))?;
    Ok(RowView { table: t, cells })
}

impl<'a> RowView<'a> {
    /// Get a cell by column name (case-insensitive)
    pub fn get(&self, column: &str) -> QueryResult<Cell<'a>> {
        let index = self.table.get_column_index(column)?;
        self.cells
            .get(index)
            .map(|value| Cell(value.as_str()))
            .ok_or_else(|| QueryError::IndexOutOfRange {
                index,
                table: self.table.name().to_string(),
            })
    }

    /// Raw cells in header order
    pub fn cells(&self) -> &'a [String] {
        self.cells
    }

    pub fn table(&self) -> &'a Table {
        self.table
    }
}

/// A single cell value with typed accessors. Parsing ignores surrounding whitespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell<'a>(&'a str);

impl<'a> Cell<'a> {
    pub fn as_str(&self) -> &'a str {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn as_int(&self) -> QueryResult<i64> {
        self.0.trim().parse().map_err(|_| self.invalid("integer"))
    }

    pub fn as_float(&self) -> QueryResult<f64> {
        self.0.trim().parse().map_err(|_| self.invalid("float"))
    }

    /// Accepts `true`/`false` in any case as well as `1`/`0`, `t`/`f`
    pub fn as_bool(&self) -> QueryResult<bool> {
        match self.0.trim().to_ascii_lowercase().as_str() {
            "true" | "t" | "1" => Ok(true),
            "false" | "f" | "0" => Ok(false),
            _ => Err(self.invalid("boolean")),
        }
    }

    /// Parse as a `YYYY-MM-DD` date
    pub fn as_date(&self) -> QueryResult<NaiveDate> {
        NaiveDate::parse_from_str(self.0.trim(), DATE_FORMAT).map_err(|_| self.invalid("date"))
    }

    /// Parse as a `YYYY-MM-DD HH:MM:SS` timestamp
    pub fn as_datetime(&self) -> QueryResult<NaiveDateTime> {
        NaiveDateTime::parse_from_str(self.0.trim(), DATETIME_FORMAT).map_err(|_| self.invalid("datetime"))
    }

    /// Parse as a timestamp with a custom chrono format
    pub fn as_time(&self, format: &str) -> QueryResult<NaiveDateTime> {
        NaiveDateTime::parse_from_str(self.0.trim(), format).map_err(|_| self.invalid("timestamp"))
    }

    fn invalid(&self, expected: &'static str) -> QueryError {
        QueryError::InvalidValue {
            value: self.0.to_string(),
            expected,
        }
    }
}

impl std::fmt::Display for Cell<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}
