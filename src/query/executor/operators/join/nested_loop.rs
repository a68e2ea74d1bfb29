// Nested Loop Join Implementation
//
// This file implements the nested loop join algorithm, which works for any join condition
// but has O(n*m) time complexity.

use crate::catalog::{Catalog, Table};
use crate::query::executor::binding::Binding;
use crate::query::executor::result::QueryResult;
use crate::query::expression::JoinCondition;

use super::JoinMatcher;

/// Nested loop join: evaluates the ON condition for every row of the joined table
pub struct NestedLoopJoin<'a> {
    /// Alias of the joined table
    alias: &'a str,
    /// The joined table
    table: &'a Table,
    /// ON condition
    condition: &'a JoinCondition,
    /// Tables bound at this step, including the joined one
    catalog: &'a Catalog,
}

impl<'a> NestedLoopJoin<'a> {
    /// Create a new nested loop join
    pub fn new(alias: &'a str, table: &'a Table, condition: &'a JoinCondition, catalog: &'a Catalog) -> Self {
        NestedLoopJoin {
            alias,
            table,
            condition,
            catalog,
        }
    }
}

impl JoinMatcher for NestedLoopJoin<'_> {
    fn matches(&self, binding: &Binding<'_>) -> QueryResult<Vec<usize>> {
        let mut row = binding.row_map(self.catalog)?;
        let mut matched = Vec::new();

        for (index, cells) in self.table.rows().iter().enumerate() {
            row.insert(self.alias, cells.as_slice());
            if self.condition.evaluate_join(&row, self.catalog)? {
                matched.push(index);
            }
        }

        Ok(matched)
    }

    fn name(&self) -> &'static str {
        "nested loop"
    }
}
