// Query Executor Module
//
// This module is responsible for executing queries and producing results.
// Execution is materialized: scan, join, filter, project and union stages each
// consume the complete output of the previous stage.

// Re-export public components
pub mod binding;
pub mod engine;
pub mod export;
pub mod operators;
pub mod result;

// Export key types
pub use self::binding::{Binding, BoundRow};
pub use self::engine::{Engine, EngineConfig};
pub use self::export::{export_csv, format_table, write_csv};
pub use self::result::{ErrorKind, QueryError, QueryResult, ResultRows, Stage};
