// Table Loader
//
// Reads delimited files into in-memory tables. The first record is the header;
// rows of a different width are normalized by `Table::new`.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::debug;

use super::table::Table;
use crate::query::executor::result::{QueryError, QueryResult};

/// Options for reading delimited sources
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Field delimiter
    pub delimiter: u8,
    /// Trim leading and trailing whitespace from every field
    pub trim: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            trim: false,
        }
    }
}

impl Table {
    /// Load a table from a delimited file
    pub fn from_csv_path(name: impl Into<String>, path: impl AsRef<Path>, options: &CsvOptions) -> QueryResult<Table> {
        let path = path.as_ref();
        let source = path.display().to_string();
        let file = File::open(path).map_err(|e| QueryError::Load {
            path: source.clone(),
            source: e.into(),
        })?;
        read_table(name.into(), file, &source, options)
    }

    /// Load a table from any reader producing delimited text
    pub fn from_csv_reader<R: Read>(name: impl Into<String>, reader: R, options: &CsvOptions) -> QueryResult<Table> {
        let name = name.into();
        let source = format!("<{}>", name);
        read_table(name, reader, &source, options)
    }
}

fn read_table<R: Read>(name: String, reader: R, source: &str, options: &CsvOptions) -> QueryResult<Table> {
    let trim = if options.trim { csv::Trim::All } else { csv::Trim::None };
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(false)
        .flexible(true)
        .trim(trim)
        .from_reader(reader);

    let load_error = |e: csv::Error| QueryError::Load {
        path: source.to_string(),
        source: e,
    };

    let mut records = reader.records();
    let headers: Vec<String> = match records.next() {
        Some(record) => record.map_err(load_error)?.iter().map(str::to_string).collect(),
        None => return Err(QueryError::EmptySource(source.to_string())),
    };

    let mut rows = Vec::new();
    for record in records {
        let record = record.map_err(load_error)?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    debug!("Loaded {} row(s) with {} column(s) from {}", rows.len(), headers.len(), source);
    Ok(Table::new(name, headers, rows))
}
