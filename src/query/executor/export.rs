// Result Export
//
// Writing result sets as delimited text and rendering them as aligned text
// tables for terminal output.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use log::debug;

use crate::query::executor::result::{QueryError, QueryResult};

/// Write rows (header included) as comma separated values
pub fn write_csv<W: Write>(rows: &[Vec<String>], writer: W) -> QueryResult<()> {
    write_rows(rows, writer).map_err(|source| QueryError::Export {
        path: "<writer>".to_string(),
        source,
    })
}

/// Write rows to a file, replacing any existing content
pub fn export_csv(rows: &[Vec<String>], path: impl AsRef<Path>) -> QueryResult<()> {
    let path = path.as_ref();
    let export_error = |source: csv::Error| QueryError::Export {
        path: path.display().to_string(),
        source,
    };

    let file = File::create(path).map_err(|e| export_error(e.into()))?;
    write_rows(rows, file).map_err(export_error)?;
    debug!("Exported {} row(s) to {}", rows.len().saturating_sub(1), path.display());
    Ok(())
}

fn write_rows<W: Write>(rows: &[Vec<String>], writer: W) -> Result<(), csv::Error> {
    let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(writer);
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Render rows as an aligned text table. Row 0 is treated as the header.
pub fn format_table(rows: &[Vec<String>]) -> String {
    let Some((header, data)) = rows.split_first() else {
        return "(0 rows)\n".to_string();
    };

    // Minimum width of 3 characters per column
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count().max(3)).collect();
    for row in data {
        for (i, value) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(value.chars().count());
            }
        }
    }

    let mut out = String::new();
    push_line(&mut out, header, &widths);

    out.push('|');
    for width in &widths {
        out.push_str(&format!("{:-<width$}+", "", width = width + 2));
    }
    out.pop();
    out.push_str("|\n");

    for row in data {
        push_line(&mut out, row, &widths);
    }

    let count = data.len();
    out.push_str(&format!("({} {})\n", count, if count == 1 { "row" } else { "rows" }));
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    out.push('|');
    for (i, width) in widths.iter().enumerate() {
        let value = cells.get(i).map(String::as_str).unwrap_or("");
        out.push_str(&format!(" {:<width$} |", value, width = width));
    }
    out.push('\n');
}
