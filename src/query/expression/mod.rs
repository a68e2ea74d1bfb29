// Expression Module
//
// Operators, WHERE conditions, ON conditions, column references and the
// typed row helpers used by custom predicates.

pub mod column;
pub mod condition;
pub mod join_condition;
pub mod operator;
pub mod row_access;

pub use self::column::ColumnRef;
pub use self::condition::{CompositeCondition, Condition, CustomPredicate, SimpleCondition};
pub use self::join_condition::{ColumnComparison, JoinCondition};
pub use self::operator::{ComparisonOperator, LogicalOperator, Operator};
pub use self::row_access::{Cell, RowView, row_view};
