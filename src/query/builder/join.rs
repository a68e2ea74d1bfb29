// JOIN clause construction
//
// A join call opens a clause; the following `on`/`on_fn` call supplies its
// condition and `and_on`/`or_on` extend it.

use super::{PendingJoin, QueryBuilder};
use crate::catalog::Catalog;
use crate::common::types::RowMap;
use crate::query::ast::JoinType;
use crate::query::executor::result::{QueryError, QueryResult};
use crate::query::expression::{JoinCondition, LogicalOperator};

impl QueryBuilder {
    pub fn inner_join(self, table: &str) -> Self {
        self.join(table, JoinType::Inner)
    }

    pub fn left_join(self, table: &str) -> Self {
        self.join(table, JoinType::Left)
    }

    pub fn right_join(self, table: &str) -> Self {
        self.join(table, JoinType::Right)
    }

    pub fn full_join(self, table: &str) -> Self {
        self.join(table, JoinType::Full)
    }

    /// Open a join of the given kind
    pub fn join(self, table: &str, kind: JoinType) -> Self {
        self.apply(|b| {
            if table.is_empty() {
                return Err(QueryError::InvalidQuery("JOIN must specify a table".to_string()));
            }
            b.joins.push(PendingJoin {
                table: table.to_string(),
                kind,
                condition: None,
            });
            Ok(())
        })
    }

    /// Set the last join's condition to `left_table.left_column <operator> right_table.right_column`
    pub fn on(self, left_table: &str, left_column: &str, operator: &str, right_table: &str, right_column: &str) -> Self {
        self.apply(|b| {
            let condition = JoinCondition::columns(left_table, left_column, operator, right_table, right_column)?;
            b.last_join()?.condition = Some(condition);
            Ok(())
        })
    }

    /// Set the last join's condition to a user predicate
    pub fn on_fn<F>(self, predicate: F) -> Self
    where
        F: Fn(&RowMap<'_>, &Catalog) -> anyhow::Result<bool> + Send + Sync + 'static,
    {
        self.on_condition(JoinCondition::custom(predicate))
    }

    /// Set the last join's condition
    pub fn on_condition(self, condition: JoinCondition) -> Self {
        self.apply(|b| {
            b.last_join()?.condition = Some(condition);
            Ok(())
        })
    }

    /// AND a column comparison onto the last join's condition
    pub fn and_on(self, left_table: &str, left_column: &str, operator: &str, right_table: &str, right_column: &str) -> Self {
        self.extend_on(LogicalOperator::And, left_table, left_column, operator, right_table, right_column)
    }

    /// OR a column comparison onto the last join's condition
    pub fn or_on(self, left_table: &str, left_column: &str, operator: &str, right_table: &str, right_column: &str) -> Self {
        self.extend_on(LogicalOperator::Or, left_table, left_column, operator, right_table, right_column)
    }

    fn extend_on(
        self,
        logical: LogicalOperator,
        left_table: &str,
        left_column: &str,
        operator: &str,
        right_table: &str,
        right_column: &str,
    ) -> Self {
        self.apply(|b| {
            let right = JoinCondition::columns(left_table, left_column, operator, right_table, right_column)?;
            let join = b.last_join()?;
            let left = join.condition.take().ok_or_else(|| {
                QueryError::NilPredicate(format!("{} {} has no ON condition to extend", join.kind, join.table))
            })?;
            join.condition = Some(JoinCondition::combine(left, right, logical));
            Ok(())
        })
    }

    fn last_join(&mut self) -> QueryResult<&mut PendingJoin> {
        self.joins
            .last_mut()
            .ok_or_else(|| QueryError::InvalidQuery("No JOIN clause to add condition to".to_string()))
    }
}
