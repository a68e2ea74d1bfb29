// Query Processing Module
//
// This module contains the query descriptor and its builder, the condition and
// operator types, and the execution engine.

pub mod ast;
pub mod builder;
pub mod executor;
pub mod expression;

// Export key public interfaces
pub use ast::{JoinType, Query, UnionType};
pub use builder::QueryBuilder;
pub use executor::engine::Engine;
pub use executor::result::QueryResult;
