// Spreadsheet Loader
//
// Reads one worksheet of an xlsx workbook into an in-memory table. The first row
// of the sheet is the header; data rows go through `Table::new` like delimited ones.

use std::path::Path;

use calamine::{Reader, open_workbook_auto};
use log::debug;

use super::table::Table;
use crate::query::executor::result::{QueryError, QueryResult};

/// Longest worksheet name a workbook can hold
pub const MAX_SHEET_NAME_LEN: usize = 31;

impl Table {
    /// Load a table from a worksheet. Without a sheet name the first sheet is read;
    /// longer names are cut to the 31 characters a workbook can store.
    pub fn from_xlsx_path(name: impl Into<String>, path: impl AsRef<Path>, sheet: Option<&str>) -> QueryResult<Table> {
        let path = path.as_ref();
        let source = path.display().to_string();
        let spreadsheet_error = |e: calamine::Error| QueryError::Spreadsheet {
            path: source.clone(),
            source: e,
        };

        let mut workbook = open_workbook_auto(path).map_err(spreadsheet_error)?;
        let sheet = match sheet {
            Some(sheet) => sheet.chars().take(MAX_SHEET_NAME_LEN).collect::<String>(),
            None => workbook
                .sheet_names()
                .into_iter()
                .next()
                .ok_or_else(|| QueryError::EmptySource(source.clone()))?,
        };

        let range = workbook.worksheet_range(&sheet).map_err(spreadsheet_error)?;
        let mut records = range.rows();
        let headers: Vec<String> = match records.next() {
            Some(record) => record.iter().map(|cell| cell.to_string()).collect(),
            None => return Err(QueryError::EmptySource(format!("{} [{}]", source, sheet))),
        };
        let rows: Vec<Vec<String>> = records
            .map(|record| record.iter().map(|cell| cell.to_string()).collect())
            .collect();

        debug!(
            "Loaded {} row(s) with {} column(s) from sheet {} of {}",
            rows.len(),
            headers.len(),
            sheet,
            source
        );
        Ok(Table::new(name, headers, rows))
    }
}
