// Join Condition Evaluation
//
// ON clauses: a comparison between a column of one table and a column of another,
// an AND/OR composite, or a user predicate.

use crate::catalog::Catalog;
use crate::common::types::RowMap;
use crate::query::executor::result::{QueryError, QueryResult};

use super::condition::CustomPredicate;
use super::operator::{LogicalOperator, Operator};

/// An ON clause
#[derive(Debug, Clone)]
pub enum JoinCondition {
    Columns(ColumnComparison),
    Composite {
        left: Box<JoinCondition>,
        right: Box<JoinCondition>,
        operator: LogicalOperator,
    },
    Custom(CustomPredicate),
}

/// `left_table.left_column <operator> right_table.right_column`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnComparison {
    pub left_table: String,
    pub left_column: String,
    pub operator: Operator,
    pub right_table: String,
    pub right_column: String,
}

impl JoinCondition {
    /// Build a column comparison from operator text
    pub fn columns(
        left_table: &str,
        left_column: &str,
        operator: &str,
        right_table: &str,
        right_column: &str,
    ) -> QueryResult<Self> {
        let parts = [left_table, left_column, right_table, right_column];
        if parts.iter().any(|p| p.is_empty()) {
            return Err(QueryError::InvalidQuery(
                "ON clause needs a table and column on both sides".to_string(),
            ));
        }
        Ok(JoinCondition::Columns(ColumnComparison {
            left_table: left_table.to_string(),
            left_column: left_column.to_string(),
            operator: operator.parse()?,
            right_table: right_table.to_string(),
            right_column: right_column.to_string(),
        }))
    }

    /// Combine two join conditions
    pub fn combine(left: JoinCondition, right: JoinCondition, operator: LogicalOperator) -> Self {
        JoinCondition::Composite {
            left: Box::new(left),
            right: Box::new(right),
            operator,
        }
    }

    /// Wrap a user predicate
    pub fn custom<F>(predicate: F) -> Self
    where
        F: Fn(&RowMap<'_>, &Catalog) -> anyhow::Result<bool> + Send + Sync + 'static,
    {
        JoinCondition::Custom(CustomPredicate::new(predicate))
    }

    /// Evaluate the condition against a candidate joined row
    pub fn evaluate_join(&self, row: &RowMap<'_>, catalog: &Catalog) -> QueryResult<bool> {
        match self {
            JoinCondition::Columns(comparison) => comparison.evaluate(row, catalog),
            JoinCondition::Composite { left, right, operator } => {
                let left = left.evaluate_join(row, catalog)?;
                match (operator, left) {
                    (LogicalOperator::And, false) => return Ok(false),
                    (LogicalOperator::Or, true) => return Ok(true),
                    _ => {}
                }
                let right = right.evaluate_join(row, catalog)?;
                Ok(operator.apply(left, right))
            }
            JoinCondition::Custom(custom) => custom.evaluate("custom join condition", row, catalog),
        }
    }
}

impl ColumnComparison {
    fn evaluate(&self, row: &RowMap<'_>, catalog: &Catalog) -> QueryResult<bool> {
        let left = cell(row, catalog, &self.left_table, &self.left_column)?;
        let right = cell(row, catalog, &self.right_table, &self.right_column)?;
        self.operator.evaluate(left, right)
    }
}

fn cell<'r>(row: &RowMap<'r>, catalog: &Catalog, table: &str, column: &str) -> QueryResult<&'r str> {
    let index = catalog.table(table)?.get_column_index(column)?;
    let cells = row
        .get(table)
        .copied()
        .ok_or_else(|| QueryError::TableNotInRow(table.to_string()))?;
    cells
        .get(index)
        .map(String::as_str)
        .ok_or_else(|| QueryError::IndexOutOfRange {
            index,
            table: table.to_string(),
        })
}
