// Filter Operator Implementation
//
// This module implements the WHERE stage: bindings whose combined row fails the
// condition are marked excluded.

use crate::catalog::Catalog;
use crate::query::executor::binding::Binding;
use crate::query::executor::result::QueryResult;
use crate::query::expression::Condition;

/// Filter operator that excludes bindings based on a condition
pub struct FilterOperator<'a> {
    /// The condition to evaluate
    condition: &'a Condition,
    /// Every registered table
    catalog: &'a Catalog,
}

impl<'a> FilterOperator<'a> {
    /// Create a new filter operator
    pub fn new(condition: &'a Condition, catalog: &'a Catalog) -> Self {
        FilterOperator { condition, catalog }
    }

    /// Evaluate the condition for every binding still in play.
    /// Returns the number of bindings that pass.
    pub fn apply(&self, bindings: &mut [Binding<'_>]) -> QueryResult<usize> {
        let mut remaining = 0;

        for binding in bindings.iter_mut().filter(|b| !b.is_excluded()) {
            let row = binding.row_map(self.catalog)?;
            if self.condition.evaluate(&row, self.catalog)? {
                remaining += 1;
            } else {
                binding.exclude();
            }
        }

        Ok(remaining)
    }
}
