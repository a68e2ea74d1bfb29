// csvql: SQL-like querying over in-memory CSV tables

pub mod catalog;
pub mod common;
pub mod query;

// Re-export key items for convenient access
pub use catalog::{Catalog, CsvOptions, Table};
pub use common::types::RowMap;
pub use query::ast::{JoinType, Query, UnionType};
pub use query::builder::QueryBuilder;
pub use query::executor::engine::{Engine, EngineConfig};
pub use query::executor::export::{export_csv, format_table, write_csv};
pub use query::executor::result::{ErrorKind, QueryError, QueryResult, ResultRows, Stage};
pub use query::expression::{Cell, Condition, JoinCondition, LogicalOperator, Operator, RowView, row_view};
