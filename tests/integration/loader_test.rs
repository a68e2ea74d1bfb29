use std::fs;
use std::path::Path;

use anyhow::Result;
use rust_xlsxwriter::Workbook;
use tempfile::TempDir;

use csvql::{CsvOptions, Engine, EngineConfig, ErrorKind, Query, QueryError, Table, export_csv, format_table};

#[path = "../common/mod.rs"]
mod common;

use common::{create_temp_csv, rows, strings};

#[test]
fn test_load_table_from_file() -> Result<()> {
    let file = create_temp_csv("id,name,city\n1,Alice,\"New York, NY\"\n2,Bob,Boston\n")?;
    let table = Table::from_csv_path("people", file.path(), &CsvOptions::default())?;

    assert_eq!(table.name(), "people");
    assert_eq!(table.headers(), strings(&["id", "name", "city"]).as_slice());
    assert_eq!(table.len(), 2);
    assert_eq!(table.column_value(0, "city")?, "New York, NY");
    assert_eq!(table.column_value(1, "NAME")?, "Bob");
    Ok(())
}

#[test]
fn test_ragged_rows_are_normalized() -> Result<()> {
    let file = create_temp_csv("a,b,c\n1\n1,2,3,4,5\n")?;
    let table = Table::from_csv_path("ragged", file.path(), &CsvOptions::default())?;

    assert_eq!(table.rows(), rows(&[&["1", "", ""], &["1", "2", "3"]]).as_slice());
    Ok(())
}

#[test]
fn test_delimiter_and_trim_options() -> Result<()> {
    let file = create_temp_csv("id; name\n1;  Alice \n")?;

    let raw = Table::from_csv_path("t", file.path(), &CsvOptions { delimiter: b';', trim: false })?;
    assert_eq!(raw.headers(), strings(&["id", " name"]).as_slice());
    assert_eq!(raw.column_value(0, " name")?, "  Alice ");

    let trimmed = Table::from_csv_path("t", file.path(), &CsvOptions { delimiter: b';', trim: true })?;
    assert_eq!(trimmed.headers(), strings(&["id", "name"]).as_slice());
    assert_eq!(trimmed.column_value(0, "name")?, "Alice");
    Ok(())
}

#[test]
fn test_header_only_file_is_an_empty_table() -> Result<()> {
    let file = create_temp_csv("id,name\n")?;
    let table = Table::from_csv_path("t", file.path(), &CsvOptions::default())?;

    assert!(table.is_empty());
    assert_eq!(table.width(), 2);
    Ok(())
}

#[test]
fn test_load_errors() -> Result<()> {
    let file = create_temp_csv("")?;
    let err = Table::from_csv_path("t", file.path(), &CsvOptions::default()).unwrap_err();
    assert!(matches!(err, QueryError::EmptySource(_)));
    assert_eq!(err.kind(), ErrorKind::Io);

    let dir = TempDir::new()?;
    let missing = dir.path().join("missing.csv");
    let err = Table::from_csv_path("t", &missing, &CsvOptions::default()).unwrap_err();
    assert!(matches!(&err, QueryError::Load { path, .. } if path.ends_with("missing.csv")));
    assert_eq!(err.kind(), ErrorKind::Io);
    Ok(())
}

#[test]
fn test_register_csv_uses_engine_options() -> Result<()> {
    let file = create_temp_csv("id|name\n1| Alice\n2| Bob\n")?;
    let engine = Engine::with_config(EngineConfig {
        csv: CsvOptions { delimiter: b'|', trim: true },
        ..EngineConfig::default()
    });
    engine.register_csv("people", file.path())?;

    let query = Query::builder()
        .select(&["name"])
        .from("people")
        .filter("id", "=", "2")
        .build()?;
    assert_eq!(engine.execute(&query)?, rows(&[&["name"], &["Bob"]]));
    assert_eq!(engine.tables(), vec!["people".to_string()]);

    // a failed load leaves the catalog untouched
    let dir = TempDir::new()?;
    assert!(engine.register_csv("other", dir.path().join("nope.csv")).is_err());
    assert!(engine.table("other").is_none());
    Ok(())
}

#[test]
fn test_export_and_reload() -> Result<()> {
    let engine = Engine::new();
    engine.register(
        "notes",
        Table::new("notes", strings(&["id", "text"]), rows(&[&["1", "plain"], &["2", "with, comma"]])),
    );
    let query = Query::builder().from("notes").build()?;
    let result = engine.execute(&query)?;

    let dir = TempDir::new()?;
    let path = dir.path().join("out.csv");
    export_csv(&result, &path)?;

    let written = fs::read_to_string(&path)?;
    assert_eq!(written, "id,text\n1,plain\n2,\"with, comma\"\n");

    let reloaded = Table::from_csv_path("reloaded", &path, &CsvOptions::default())?;
    assert_eq!(reloaded.rows(), &result[1..]);
    Ok(())
}

#[test]
fn test_format_table() -> Result<()> {
    let result = rows(&[&["id", "name"], &["1", "alice"]]);
    assert_eq!(
        format_table(&result),
        "| id  | name  |\n|-----+-------|\n| 1   | alice |\n(1 row)\n"
    );
    assert_eq!(format_table(&rows(&[&["id"]])), "| id  |\n|-----|\n(0 rows)\n");
    Ok(())
}

// Two sheets: "People" with a short row, then an empty one with a long name
fn create_workbook(path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();

    let people = workbook.add_worksheet();
    people.set_name("People")?;
    for (col, header) in ["id", "name", "age"].iter().enumerate() {
        people.write_string(0, col as u16, *header)?;
    }
    people.write_number(1, 0, 1)?;
    people.write_string(1, 1, "Alice")?;
    people.write_number(1, 2, 30)?;
    people.write_number(2, 0, 2)?;
    people.write_string(2, 1, "Bob")?;

    let empty = workbook.add_worksheet();
    empty.set_name("Quarterly figures for the board")?;

    workbook.save(path)?;
    Ok(())
}

#[test]
fn test_load_table_from_workbook() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("people.xlsx");
    create_workbook(&path)?;

    let table = Table::from_xlsx_path("people", &path, None)?;
    assert_eq!(table.headers(), strings(&["id", "name", "age"]).as_slice());
    assert_eq!(table.rows(), rows(&[&["1", "Alice", "30"], &["2", "Bob", ""]]).as_slice());

    let named = Table::from_xlsx_path("people", &path, Some("People"))?;
    assert_eq!(named.rows(), table.rows());

    let engine = Engine::new();
    engine.register_xlsx("people", &path, None)?;
    let query = Query::builder().select(&["name"]).from("people").filter("age", "=", "30").build()?;
    assert_eq!(engine.execute(&query)?, rows(&[&["name"], &["Alice"]]));
    Ok(())
}

#[test]
fn test_workbook_errors() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("people.xlsx");
    create_workbook(&path)?;

    // names past 31 characters are cut before lookup; the sheet itself is empty
    let err = Table::from_xlsx_path("t", &path, Some("Quarterly figures for the board, 2024")).unwrap_err();
    assert!(matches!(err, QueryError::EmptySource(_)));

    let err = Table::from_xlsx_path("t", &path, Some("Missing")).unwrap_err();
    assert!(matches!(err, QueryError::Spreadsheet { .. }));
    assert_eq!(err.kind(), ErrorKind::Io);

    let err = Table::from_xlsx_path("t", dir.path().join("nope.xlsx"), None).unwrap_err();
    assert!(matches!(err, QueryError::Spreadsheet { .. }));
    Ok(())
}
