// Query Operators Module
//
// The execution stages of a query, in pipeline order: table scan, joins,
// filter, projection and union merging. Stages are materialized; each one
// consumes the full output of the previous one.

pub mod filter;
pub mod join;
pub mod project;
pub mod scan;
pub mod union;

pub use self::filter::FilterOperator;
pub use self::join::{HashJoin, JoinMatcher, JoinOutput, NestedLoopJoin, execute_join};
pub use self::project::ProjectionOperator;
pub use self::scan::TableScanOperator;
pub use self::union::UnionOperator;
