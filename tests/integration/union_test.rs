use anyhow::Result;

use csvql::{Engine, EngineConfig, ErrorKind, Query, QueryError, Stage};

#[path = "../common/mod.rs"]
mod common;

use common::{create_shop_engine, rows, table};

fn names_in(city: &str) -> csvql::QueryBuilder {
    Query::builder().select(&["name"]).from("users").filter("city", "=", city)
}

#[test]
fn test_union_removes_duplicates() -> Result<()> {
    let engine = create_shop_engine(EngineConfig::default());
    let query = names_in("Boston")
        .union(names_in("Chicago"))
        .union(names_in("Boston"))
        .build()?;

    let result = engine.execute(&query)?;
    assert_eq!(result, rows(&[&["name"], &["Jane"], &["Alice"], &["Bob"]]));
    Ok(())
}

#[test]
fn test_union_all_keeps_duplicates() -> Result<()> {
    let engine = create_shop_engine(EngineConfig::default());
    let query = names_in("Boston").union_all(names_in("Boston")).build()?;

    let result = engine.execute(&query)?;
    assert_eq!(
        result,
        rows(&[&["name"], &["Jane"], &["Alice"], &["Jane"], &["Alice"]])
    );
    Ok(())
}

#[test]
fn test_union_compares_trimmed_cells() -> Result<()> {
    let engine = Engine::new();
    engine.register("current", table("current", &["v", "w"], &[&["x", "1"], &["x", "1"]]));
    engine.register("archive", table("archive", &["v", "w"], &[&[" x", "1 "], &["y", "2"]]));

    let query = Query::builder()
        .from("current")
        .union(Query::builder().from("archive"))
        .build()?;

    // the primary's own duplicates collapse too; the first spelling wins
    let result = engine.execute(&query)?;
    assert_eq!(
        result,
        rows(&[&["v", "w"], &["x", "1"], &["y", "2"]])
    );
    Ok(())
}

#[test]
fn test_header_comes_from_primary() -> Result<()> {
    let engine = create_shop_engine(EngineConfig::default());
    let query = Query::builder()
        .select(&["users.name"])
        .from("users")
        .filter("name", "=", "Bob")
        .union_all(Query::builder().select(&["products.category"]).from("products"))
        .build()?;
    let result = engine.execute(&query)?;
    assert_eq!(
        result,
        rows(&[&["users.name"], &["Bob"], &["computers"], &["accessories"], &["computers"]])
    );
    Ok(())
}

#[test]
fn test_column_count_mismatch() -> Result<()> {
    let engine = create_shop_engine(EngineConfig::default());
    let query = Query::builder()
        .select(&["name", "city"])
        .from("users")
        .union(Query::builder().select(&["order_id", "user_id", "amount"]).from("orders"))
        .build()?;

    let err = engine.execute(&query).unwrap_err();
    assert_eq!(err.stage(), Some(Stage::Union));
    assert!(matches!(
        err.root_cause(),
        QueryError::ColumnCountMismatch { expected: 2, found: 3 }
    ));
    assert_eq!(err.kind(), ErrorKind::Execution);
    Ok(())
}

#[test]
fn test_nested_unions() -> Result<()> {
    let engine = create_shop_engine(EngineConfig::default());
    let inner = names_in("Chicago").union_all(names_in("New York"));
    let query = names_in("Boston").union(inner).build()?;

    let result = engine.execute(&query)?;
    assert_eq!(
        result,
        rows(&[&["name"], &["Jane"], &["Alice"], &["Bob"], &["John"]])
    );
    Ok(())
}

#[test]
fn test_sibling_errors() -> Result<()> {
    let engine = create_shop_engine(EngineConfig::default());

    // unknown FROM table in a sibling surfaces as a UNION failure
    let query = names_in("Boston")
        .union(Query::builder().select(&["name"]).from("archive"))
        .build()?;
    let err = engine.execute(&query).unwrap_err();
    assert_eq!(err.stage(), Some(Stage::Union));
    assert!(matches!(err.root_cause(), QueryError::TableNotFound(t) if t == "archive"));

    // a sibling failing inside its own pipeline keeps that stage
    let query = names_in("Boston")
        .union(Query::builder().select(&["name"]).from("users").filter("name", "like", "("))
        .build()?;
    let err = engine.execute(&query).unwrap_err();
    assert_eq!(err.stage(), Some(Stage::Where));
    assert!(matches!(err.root_cause(), QueryError::InvalidPattern { .. }));
    Ok(())
}
