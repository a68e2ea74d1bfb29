#![allow(dead_code)]

use std::io::Write;

use anyhow::Result;
use tempfile::NamedTempFile;

use csvql::{Engine, EngineConfig, Table};

pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

pub fn rows(values: &[&[&str]]) -> Vec<Vec<String>> {
    values.iter().map(|row| strings(row)).collect()
}

pub fn table(name: &str, headers: &[&str], data: &[&[&str]]) -> Table {
    Table::new(name, strings(headers), rows(data))
}

// Write CSV text to a temporary file
pub fn create_temp_csv(contents: &str) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    Ok(file)
}

// users{id,name} = [(1,a),(2,b)], orders{user_id,amt} = [(1,10),(3,20)]
pub fn create_small_engine(config: EngineConfig) -> Engine {
    let engine = Engine::with_config(config);
    engine.register("users", table("users", &["id", "name"], &[&["1", "a"], &["2", "b"]]));
    engine.register("orders", table("orders", &["user_id", "amt"], &[&["1", "10"], &["3", "20"]]));
    engine
}

// A richer data set used by the execution and union tests
pub fn create_shop_engine(config: EngineConfig) -> Engine {
    let engine = Engine::with_config(config);
    engine.register(
        "users",
        table(
            "users",
            &["id", "name", "age", "email", "city"],
            &[
                &["1", "John", "28", "john@gmail.com", "New York"],
                &["2", "Jane", "34", "jane@yahoo.com", "Boston"],
                &["3", "Bob", "45", "bob@gmail.com", "Chicago"],
                &["4", "Alice", "22", "alice@gmail.comX", "Boston"],
            ],
        ),
    );
    engine.register(
        "orders",
        table(
            "orders",
            &["order_id", "user_id", "product", "amount"],
            &[
                &["101", "1", "Laptop", "1200"],
                &["102", "2", "Headphones", "80"],
                &["103", "1", "Mouse", "25"],
                &["104", "3", "Monitor", "650"],
                &["105", "9", "Webcam", "70"],
            ],
        ),
    );
    engine.register(
        "products",
        table(
            "products",
            &["product", "category"],
            &[&["Laptop", "computers"], &["Mouse", "accessories"], &["Monitor", "computers"]],
        ),
    );
    engine
}
