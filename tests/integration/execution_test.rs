use std::sync::Arc;
use std::thread;

use anyhow::Result;

use csvql::{Engine, EngineConfig, ErrorKind, Query, QueryError, Stage, row_view};

#[path = "../common/mod.rs"]
mod common;

use common::{create_shop_engine, rows, table};

#[test]
fn test_simple_filter() -> Result<()> {
    let engine = create_shop_engine(EngineConfig::default());
    let query = Query::builder()
        .select(&["name", "city"])
        .from("users")
        .filter("city", "=", "Boston")
        .build()?;

    let result = engine.execute(&query)?;
    assert_eq!(result, rows(&[&["name", "city"], &["Jane", "Boston"], &["Alice", "Boston"]]));
    Ok(())
}

#[test]
fn test_like_matches_whole_value() -> Result<()> {
    let engine = create_shop_engine(EngineConfig::default());
    let query = Query::builder()
        .select(&["email"])
        .from("users")
        .filter("email", "like", "%@gmail.com")
        .build()?;

    let result = engine.execute(&query)?;
    assert_eq!(result, rows(&[&["email"], &["john@gmail.com"], &["bob@gmail.com"]]));
    Ok(())
}

#[test]
fn test_comparison_is_lexicographic() -> Result<()> {
    let engine = Engine::new();
    engine.register("t", table("t", &["n"], &[&["9"], &["10"], &["100"]]));

    let query = Query::builder().select(&["n"]).from("t").filter("n", ">", "9").build()?;
    assert_eq!(engine.execute(&query)?, rows(&[&["n"]]));

    let query = Query::builder().select(&["n"]).from("t").filter("n", "<", "9").build()?;
    assert_eq!(engine.execute(&query)?, rows(&[&["n"], &["10"], &["100"]]));
    Ok(())
}

#[test]
fn test_and_or_filters() -> Result<()> {
    let engine = create_shop_engine(EngineConfig::default());

    let query = Query::builder()
        .select(&["name"])
        .from("users")
        .filter("age", ">", "25")
        .and(Query::builder().filter("age", "<", "40"))
        .build()?;
    assert_eq!(engine.execute(&query)?, rows(&[&["name"], &["John"], &["Jane"]]));

    let query = Query::builder()
        .select(&["name"])
        .from("users")
        .filter("city", "=", "Chicago")
        .or(Query::builder().filter("name", "=", "Alice"))
        .build()?;
    assert_eq!(engine.execute(&query)?, rows(&[&["name"], &["Bob"], &["Alice"]]));
    Ok(())
}

#[test]
fn test_filter_on_joined_table() -> Result<()> {
    let engine = create_shop_engine(EngineConfig::default());
    let query = Query::builder()
        .select(&["users.name", "orders.product"])
        .from("users")
        .inner_join("orders")
        .on("users", "id", "=", "orders", "user_id")
        .filter("orders.product", "LIKE", "M%")
        .build()?;

    let result = engine.execute(&query)?;
    assert_eq!(
        result,
        rows(&[&["users.name", "orders.product"], &["John", "Mouse"], &["Bob", "Monitor"]])
    );
    Ok(())
}

#[test]
fn test_custom_filter_with_typed_cells() -> Result<()> {
    let engine = create_shop_engine(EngineConfig::default());
    let query = Query::builder()
        .select(&["name"])
        .from("users")
        .filter_fn(|row, catalog| {
            let age = row_view(row, catalog, "users")?.get("age")?.as_int()?;
            Ok(age >= 30)
        })
        .build()?;

    assert_eq!(engine.execute(&query)?, rows(&[&["name"], &["Jane"], &["Bob"]]));
    Ok(())
}

#[test]
fn test_custom_columns() -> Result<()> {
    let engine = create_shop_engine(EngineConfig::default());
    let query = Query::builder()
        .select(&["name"])
        .select_custom("domain", |row, catalog| {
            let email = row_view(row, catalog, "users")?.get("email")?;
            Ok(email.as_str().split('@').nth(1).unwrap_or_default().to_string())
        })
        .from("users")
        .filter("city", "=", "Boston")
        .build()?;

    let result = engine.execute(&query)?;
    assert_eq!(
        result,
        rows(&[&["name", "domain"], &["Jane", "yahoo.com"], &["Alice", "gmail.comX"]])
    );

    // Only computed columns
    let query = Query::builder()
        .select_custom("one", |_, _| Ok("1".to_string()))
        .from("products")
        .build()?;
    assert_eq!(engine.execute(&query)?, rows(&[&["one"], &["1"], &["1"], &["1"]]));
    Ok(())
}

#[test]
fn test_no_select_means_from_table_columns() -> Result<()> {
    let engine = create_shop_engine(EngineConfig::default());
    let query = Query::builder().from("products").filter("category", "=", "accessories").build()?;

    let result = engine.execute(&query)?;
    assert_eq!(
        result,
        rows(&[&["product", "category"], &["Mouse", "accessories"]])
    );

    // joined tables add no columns; shared names read the FROM table
    let query = Query::builder()
        .from("orders")
        .inner_join("products")
        .on("orders", "product", "=", "products", "product")
        .filter("products.category", "=", "accessories")
        .build()?;
    assert_eq!(
        engine.execute(&query)?,
        rows(&[&["order_id", "user_id", "product", "amount"], &["103", "1", "Mouse", "25"]])
    );
    Ok(())
}

#[test]
fn test_empty_result_keeps_header() -> Result<()> {
    let engine = create_shop_engine(EngineConfig::default());
    let query = Query::builder().select(&["name"]).from("users").filter("city", "=", "Paris").build()?;

    assert_eq!(engine.execute(&query)?, rows(&[&["name"]]));
    Ok(())
}

#[test]
fn test_resolution_errors() -> Result<()> {
    let engine = create_shop_engine(EngineConfig::default());

    // `product` is defined by both orders and products
    let query = Query::builder().from("users").filter("product", "=", "Mouse").build()?;
    let err = engine.execute(&query).unwrap_err();
    assert_eq!(err.stage(), Some(Stage::Where));
    match err.root_cause() {
        QueryError::AmbiguousColumn { column, tables } => {
            assert_eq!(column, "product");
            assert_eq!(tables, &vec!["orders".to_string(), "products".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }

    // `category` resolves to products, which is not part of this query
    let query = Query::builder().from("users").filter("category", "=", "x").build()?;
    let err = engine.execute(&query).unwrap_err();
    assert!(matches!(err.root_cause(), QueryError::TableNotInRow(t) if t == "products"));

    let query = Query::builder().select(&["nope"]).from("users").build()?;
    let err = engine.execute(&query).unwrap_err();
    assert_eq!(err.stage(), Some(Stage::Select));
    assert_eq!(err.kind(), ErrorKind::Resolution);
    Ok(())
}

#[test]
fn test_invalid_like_pattern() -> Result<()> {
    let engine = create_shop_engine(EngineConfig::default());
    let query = Query::builder().from("users").filter("name", "LIKE", "J(%").build()?;

    let err = engine.execute(&query).unwrap_err();
    assert!(matches!(err.root_cause(), QueryError::InvalidPattern { .. }));
    assert_eq!(err.kind(), ErrorKind::Execution);
    Ok(())
}

#[test]
fn test_failing_custom_column_aborts_query() -> Result<()> {
    let engine = create_shop_engine(EngineConfig::default());
    let query = Query::builder()
        .select_custom("age_next_year", |row, catalog| {
            let age = row_view(row, catalog, "users")?.get("email")?.as_int()?;
            Ok((age + 1).to_string())
        })
        .from("users")
        .build()?;

    let err = engine.execute(&query).unwrap_err();
    assert_eq!(err.stage(), Some(Stage::Select));
    assert!(matches!(err.root_cause(), QueryError::PredicateFailed { .. }));
    Ok(())
}

#[test]
fn test_engines_are_independent() -> Result<()> {
    let first = Engine::new();
    let second = Engine::new();
    first.register("t", table("t", &["v"], &[&["first"]]));
    second.register("t", table("t", &["v"], &[&["second"]]));

    let query = Query::builder().select(&["v"]).from("t").build()?;
    assert_eq!(first.execute(&query)?, rows(&[&["v"], &["first"]]));
    assert_eq!(second.execute(&query)?, rows(&[&["v"], &["second"]]));
    Ok(())
}

#[test]
fn test_concurrent_execution() -> Result<()> {
    let engine = Arc::new(create_shop_engine(EngineConfig::default()));
    let query = Arc::new(
        Query::builder()
            .select(&["users.name", "orders.amount"])
            .from("users")
            .inner_join("orders")
            .on("users", "id", "=", "orders", "user_id")
            .build()?,
    );
    let expected = engine.execute(&query)?;

    thread::scope(|scope| {
        for i in 0..4 {
            let engine = Arc::clone(&engine);
            let query = Arc::clone(&query);
            let expected = &expected;
            scope.spawn(move || {
                if i % 2 == 0 {
                    engine.register(format!("extra_{}", i), table("extra", &["x"], &[&["1"]]));
                }
                for _ in 0..20 {
                    assert_eq!(&engine.execute(&query).unwrap(), expected);
                }
            });
        }
    });

    assert_eq!(engine.tables().len(), 5);
    Ok(())
}
