//! Table Module
//!
//! This module defines the in-memory Table: ordered headers, a case-insensitive
//! header index and rows that are always exactly as wide as the header.

use std::collections::HashMap;

use log::warn;

use crate::query::executor::result::{QueryError, QueryResult};

/// An immutable in-memory relation
#[derive(Debug, Clone)]
pub struct Table {
    /// Table name
    name: String,
    /// Header names in display order
    headers: Vec<String>,
    /// Lowercased header name to column position
    header_index: HashMap<String, usize>,
    /// Row data, one cell per header
    rows: Vec<Vec<String>>,
    /// All-empty row used when an outer join has no matching row
    null_row: Vec<String>,
}

impl Table {
    /// Create a table from headers and rows.
    ///
    /// Short rows are padded with empty cells and long rows are truncated so that every
    /// row is exactly as wide as the header.
    pub fn new(name: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let name = name.into();
        let width = headers.len();

        let mut header_index = HashMap::with_capacity(width);
        for (i, header) in headers.iter().enumerate() {
            let key = header.to_lowercase();
            if header_index.contains_key(&key) {
                warn!("Table {}: duplicate header '{}' at position {}, keeping the first one", name, header, i);
                continue;
            }
            header_index.insert(key, i);
        }

        let mut padded = 0usize;
        let mut truncated = 0usize;
        let rows = rows
            .into_iter()
            .map(|mut row| {
                if row.len() < width {
                    padded += 1;
                    row.resize(width, String::new());
                } else if row.len() > width {
                    truncated += 1;
                    row.truncate(width);
                }
                row
            })
            .collect();

        if padded > 0 {
            warn!("Table {}: padded {} short row(s) to {} columns", name, padded, width);
        }
        if truncated > 0 {
            warn!("Table {}: truncated {} long row(s) to {} columns", name, truncated, width);
        }

        Table {
            name,
            null_row: vec![String::new(); width],
            headers,
            header_index,
            rows,
        }
    }

    /// Get the table name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the headers in display order
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Get all rows
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Get a row by position
    pub fn row(&self, index: usize) -> Option<&[String]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Row of empty cells as wide as the header
    pub fn null_row(&self) -> &[String] {
        &self.null_row
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.headers.len()
    }

    /// Check if the table has a column, ignoring case
    pub fn has_column(&self, column: &str) -> bool {
        self.column_index(column).is_some()
    }

    /// Get the position of a column, ignoring case
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.header_index.get(&column.to_lowercase()).copied()
    }

    /// Get the position of a column or a `ColumnNotFound` error naming this table
    pub fn get_column_index(&self, column: &str) -> QueryResult<usize> {
        self.column_index(column).ok_or_else(|| QueryError::ColumnNotFound {
            column: column.to_string(),
            table: Some(self.name.clone()),
        })
    }

    /// Get the value of a column in a row
    pub fn column_value(&self, row: usize, column: &str) -> QueryResult<&str> {
        let index = self.get_column_index(column)?;
        let cells = self.row(row).ok_or_else(|| QueryError::IndexOutOfRange {
            index: row,
            table: self.name.clone(),
        })?;
        Ok(cells[index].as_str())
    }
}
