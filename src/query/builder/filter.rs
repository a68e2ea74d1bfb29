// WHERE clause construction

use super::QueryBuilder;
use crate::catalog::Catalog;
use crate::common::types::RowMap;
use crate::query::executor::result::QueryError;
use crate::query::expression::{Condition, LogicalOperator};

impl QueryBuilder {
    /// Set the WHERE clause to `column <operator> value`, replacing any previous one
    pub fn filter(self, column: &str, operator: &str, value: &str) -> Self {
        self.apply(|b| {
            b.filter = Some(Condition::simple(column, operator, value)?);
            Ok(())
        })
    }

    /// Set the WHERE clause to a user predicate, replacing any previous one
    pub fn filter_fn<F>(self, predicate: F) -> Self
    where
        F: Fn(&RowMap<'_>, &Catalog) -> anyhow::Result<bool> + Send + Sync + 'static,
    {
        self.apply(|b| {
            b.filter = Some(Condition::custom(predicate));
            Ok(())
        })
    }

    /// Set the WHERE clause to an existing condition
    pub fn filter_condition(self, condition: Condition) -> Self {
        self.apply(|b| {
            b.filter = Some(condition);
            Ok(())
        })
    }

    /// AND this builder's WHERE clause with another builder's
    pub fn and(self, other: QueryBuilder) -> Self {
        self.combine(other, LogicalOperator::And)
    }

    /// OR this builder's WHERE clause with another builder's
    pub fn or(self, other: QueryBuilder) -> Self {
        self.combine(other, LogicalOperator::Or)
    }

    fn combine(self, other: QueryBuilder, operator: LogicalOperator) -> Self {
        self.apply(|b| {
            if let Some(error) = other.error {
                return Err(error);
            }
            let (Some(left), Some(right)) = (b.filter.take(), other.filter) else {
                return Err(QueryError::NilSubcondition(format!(
                    "cannot {} with a missing condition",
                    operator.symbol()
                )));
            };
            b.filter = Some(Condition::combine(left, right, operator));
            Ok(())
        })
    }
}
