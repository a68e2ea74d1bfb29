use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use csvql::{Engine, Query, QueryResult, format_table, row_view};

// Runs a set of example queries over the sample tables in `data/`
// (or the directory given as the first argument).

fn main() -> Result<()> {
    let data_dir = std::env::args().nth(1).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("data"));

    let engine = Engine::new();
    for alias in ["users", "orders"] {
        let path = data_dir.join(format!("{}.csv", alias));
        engine
            .register_csv(alias, &path)
            .with_context(|| format!("Failed to register table {} from {}", alias, path.display()))?;
    }

    let examples: [(&str, fn() -> QueryResult<Query>); 7] = [
        ("Basic SELECT with WHERE condition", basic_filter),
        ("Custom function filtering", custom_filter),
        ("JOIN with condition", join),
        ("Multiple conditions (AND)", and_conditions),
        ("UNION operation", union),
        ("Wildcard SELECT", wildcard),
        ("Custom SELECT fields", computed_column),
    ];

    for (name, build) in examples {
        println!("\n=== {} ===", name);
        let query = match build() {
            Ok(query) => query,
            Err(err) => {
                eprintln!("Failed to build query: {}", err);
                continue;
            }
        };
        match engine.execute(&query) {
            Ok(rows) => print!("{}", format_table(&rows)),
            Err(err) => eprintln!("Failed to execute query: {}", err),
        }
    }

    Ok(())
}

fn basic_filter() -> QueryResult<Query> {
    Query::builder()
        .select(&["name", "age", "email", "city"])
        .from("users")
        .filter("age", ">", "25")
        .build()
}

/// Gmail users who registered in the first quarter of 2023
fn custom_filter() -> QueryResult<Query> {
    Query::builder()
        .select(&["name", "email", "registration_date"])
        .from("users")
        .filter_fn(|row, catalog| {
            let user = row_view(row, catalog, "users")?;
            let is_gmail = user.get("email")?.as_str().contains("@gmail.com");
            let registered = user.get("registration_date")?.as_date()?;
            let q2_start = NaiveDate::from_ymd_opt(2023, 4, 1).context("invalid date")?;
            Ok(is_gmail && registered < q2_start)
        })
        .build()
}

fn join() -> QueryResult<Query> {
    Query::builder()
        .select(&["users.name", "users.email", "orders.product", "orders.amount"])
        .from("users")
        .inner_join("orders")
        .on("users", "id", "=", "orders", "user_id")
        .build()
}

/// Comparisons are lexicographic; two-digit ages compare correctly
fn and_conditions() -> QueryResult<Query> {
    Query::builder()
        .select(&["name", "age", "email"])
        .from("users")
        .filter("age", ">", "30")
        .and(Query::builder().filter("age", "<", "50"))
        .build()
}

/// Big orders and small orders, with a custom numeric filter for each side
fn union() -> QueryResult<Query> {
    let orders_over = |limit: i64, above: bool| {
        Query::builder()
            .select(&["users.name", "orders.product", "orders.amount"])
            .from("users")
            .inner_join("orders")
            .on("users", "id", "=", "orders", "user_id")
            .filter_fn(move |row, catalog| {
                let amount = row_view(row, catalog, "orders")?.get("amount")?.as_int()?;
                Ok(if above { amount > limit } else { amount < limit })
            })
    };

    orders_over(500, true).union(orders_over(100, false)).build()
}

fn wildcard() -> QueryResult<Query> {
    Query::builder()
        .select(&["*"])
        .from("users")
        .inner_join("orders")
        .on("users", "id", "=", "orders", "user_id")
        .build()
}

fn computed_column() -> QueryResult<Query> {
    Query::builder()
        .select(&["name", "age"])
        .select_custom("age_category", |row, catalog| {
            let age = row_view(row, catalog, "users")?.get("age")?.as_int()?;
            let category = if age < 25 {
                "Young"
            } else if age < 50 {
                "Middle-aged"
            } else {
                "Senior"
            };
            Ok(category.to_string())
        })
        .from("users")
        .build()
}
