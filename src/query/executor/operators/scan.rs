// Table Scan Operator
//
// Produces the initial binding set: one binding per row of the FROM table.

use crate::catalog::Table;
use crate::query::executor::binding::{Binding, BoundRow};

/// A table scan over the FROM table
pub struct TableScanOperator<'q, 't> {
    /// Alias the table is bound under
    alias: &'q str,
    /// Table to scan
    table: &'t Table,
}

impl<'q, 't> TableScanOperator<'q, 't> {
    /// Create a new table scan operator
    pub fn new(alias: &'q str, table: &'t Table) -> Self {
        TableScanOperator { alias, table }
    }

    /// One binding per row, in table order
    pub fn bindings(&self) -> Vec<Binding<'q>> {
        (0..self.table.len())
            .map(|index| Binding::new(self.alias, BoundRow::Row(index)))
            .collect()
    }
}
