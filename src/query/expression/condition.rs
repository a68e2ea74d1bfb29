// Condition Evaluation
//
// WHERE conditions: a simple column/operator/value comparison, an AND/OR composite,
// or a user predicate. Conditions are evaluated against one logical row spanning
// every table bound by the query.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use regex::Regex;

use crate::catalog::Catalog;
use crate::common::types::{PredicateFn, RowMap};
use crate::query::executor::result::{QueryError, QueryResult};

use super::column::ColumnRef;
use super::operator::{LogicalOperator, Operator, compile_like, invalid_pattern};

/// A WHERE condition
#[derive(Debug, Clone)]
pub enum Condition {
    Simple(SimpleCondition),
    Composite(CompositeCondition),
    Custom(CustomPredicate),
}

/// `column <operator> value`
#[derive(Debug, Clone)]
pub struct SimpleCondition {
    column: ColumnRef,
    operator: Operator,
    value: String,
    /// LIKE pattern, compiled on first use
    pattern: OnceCell<Result<Regex, regex::Error>>,
}

/// `left AND right` / `left OR right`
#[derive(Debug, Clone)]
pub struct CompositeCondition {
    left: Box<Condition>,
    right: Box<Condition>,
    operator: LogicalOperator,
}

/// User predicate over the row map and catalog
#[derive(Clone)]
pub struct CustomPredicate {
    predicate: PredicateFn,
}

impl Condition {
    /// Build a simple condition from operator text
    pub fn simple(column: &str, operator: &str, value: impl Into<String>) -> QueryResult<Self> {
        if column.is_empty() {
            return Err(QueryError::InvalidQuery("column name cannot be empty".to_string()));
        }
        Ok(Condition::Simple(SimpleCondition {
            column: ColumnRef::parse(column)?,
            operator: operator.parse()?,
            value: value.into(),
            pattern: OnceCell::new(),
        }))
    }

    /// Combine two conditions with AND/OR given as text
    pub fn composite(left: Condition, right: Condition, operator: &str) -> QueryResult<Self> {
        let operator = operator
            .parse::<Operator>()?
            .as_logical()
            .ok_or_else(|| QueryError::InvalidQuery(format!("operator {} is not a logical operator", operator)))?;
        Ok(Self::combine(left, right, operator))
    }

    /// Combine two conditions
    pub fn combine(left: Condition, right: Condition, operator: LogicalOperator) -> Self {
        Condition::Composite(CompositeCondition {
            left: Box::new(left),
            right: Box::new(right),
            operator,
        })
    }

    /// Wrap a user predicate
    pub fn custom<F>(predicate: F) -> Self
    where
        F: Fn(&RowMap<'_>, &Catalog) -> anyhow::Result<bool> + Send + Sync + 'static,
    {
        Condition::Custom(CustomPredicate::new(predicate))
    }

    /// Evaluate the condition against one row
    pub fn evaluate(&self, row: &RowMap<'_>, catalog: &Catalog) -> QueryResult<bool> {
        match self {
            Condition::Simple(simple) => simple.evaluate(row, catalog),
            Condition::Composite(composite) => composite.evaluate(row, catalog),
            Condition::Custom(custom) => custom.evaluate("custom condition", row, catalog),
        }
    }

    /// Short name of the variant
    pub fn kind(&self) -> &'static str {
        match self {
            Condition::Simple(_) => "Simple",
            Condition::Composite(_) => "Composite",
            Condition::Custom(_) => "Custom",
        }
    }
}

impl SimpleCondition {
    pub fn column(&self) -> &ColumnRef {
        &self.column
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    fn evaluate(&self, row: &RowMap<'_>, catalog: &Catalog) -> QueryResult<bool> {
        let (alias, index) = self.column.resolve(catalog)?;
        let cells = row
            .get(alias)
            .ok_or_else(|| QueryError::TableNotInRow(alias.to_string()))?;
        let cell = cells.get(index).ok_or_else(|| QueryError::IndexOutOfRange {
            index,
            table: alias.to_string(),
        })?;
        match self.operator {
            Operator::Like => Ok(self.like_pattern()?.is_match(cell)),
            operator => operator.evaluate(cell, &self.value),
        }
    }

    fn like_pattern(&self) -> QueryResult<&Regex> {
        self.pattern
            .get_or_init(|| compile_like(&self.value))
            .as_ref()
            .map_err(|e| invalid_pattern(&self.value, e.clone()))
    }
}

impl CompositeCondition {
    pub fn operator(&self) -> LogicalOperator {
        self.operator
    }

    fn evaluate(&self, row: &RowMap<'_>, catalog: &Catalog) -> QueryResult<bool> {
        let left = self.left.evaluate(row, catalog)?;

        match (self.operator, left) {
            (LogicalOperator::And, false) => return Ok(false),
            (LogicalOperator::Or, true) => return Ok(true),
            _ => {}
        }

        let right = self.right.evaluate(row, catalog)?;
        Ok(self.operator.evaluate(&left.to_string(), &right.to_string()))
    }
}

impl CustomPredicate {
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&RowMap<'_>, &Catalog) -> anyhow::Result<bool> + Send + Sync + 'static,
    {
        CustomPredicate {
            predicate: Arc::new(predicate),
        }
    }

    pub(crate) fn evaluate(&self, context: &str, row: &RowMap<'_>, catalog: &Catalog) -> QueryResult<bool> {
        (self.predicate)(row, catalog).map_err(|e| QueryError::predicate_failed(context, e))
    }
}

impl fmt::Debug for CustomPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomPredicate(<fn>)")
    }
}
