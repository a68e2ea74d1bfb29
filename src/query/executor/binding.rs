// Join Bindings
//
// A binding is one partial join result: the FROM row plus the row each joined
// table contributed. Rows are referenced by position; outer joins use
// `BoundRow::Unmatched`, which reads as the table's null row.

use std::collections::HashMap;

use crate::catalog::{Catalog, Table};
use crate::common::types::RowMap;
use crate::query::executor::result::{QueryError, QueryResult};

/// Position of a row in its table, or the outer-join padding marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundRow {
    Row(usize),
    Unmatched,
}

impl BoundRow {
    /// Cells of this row in `table`
    pub fn cells<'t>(&self, table: &'t Table) -> QueryResult<&'t [String]> {
        match *self {
            BoundRow::Row(index) => table.row(index).ok_or_else(|| QueryError::IndexOutOfRange {
                index,
                table: table.name().to_string(),
            }),
            BoundRow::Unmatched => Ok(table.null_row()),
        }
    }
}

/// Partial join-result tuple
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding<'q> {
    main_table: &'q str,
    main_row: BoundRow,
    joined: HashMap<&'q str, BoundRow>,
    excluded: bool,
}

impl<'q> Binding<'q> {
    /// Binding for one FROM row
    pub fn new(main_table: &'q str, main_row: BoundRow) -> Self {
        Binding {
            main_table,
            main_row,
            joined: HashMap::new(),
            excluded: false,
        }
    }

    pub fn main_table(&self) -> &'q str {
        self.main_table
    }

    pub fn main_row(&self) -> BoundRow {
        self.main_row
    }

    /// Row bound for `table`, if the table is part of this binding
    pub fn bound(&self, table: &str) -> Option<BoundRow> {
        if table == self.main_table {
            return Some(self.main_row);
        }
        self.joined.get(table).copied()
    }

    pub fn is_excluded(&self) -> bool {
        self.excluded
    }

    pub fn exclude(&mut self) {
        self.excluded = true;
    }

    /// Copy of this binding with `table` bound to `row`
    pub fn extend(&self, table: &'q str, row: BoundRow) -> Self {
        let mut next = self.clone();
        if table == next.main_table {
            next.main_row = row;
        } else {
            next.joined.insert(table, row);
        }
        next
    }

    /// Binding for a joined row that nothing matched: every table bound so far
    /// is padded and only `table` carries a real row
    pub fn right_only(main_table: &'q str, earlier: &[&'q str], table: &'q str, row: usize) -> Self {
        let joined = earlier
            .iter()
            .filter(|alias| **alias != main_table)
            .map(|alias| (*alias, BoundRow::Unmatched))
            .collect();
        Binding {
            main_table,
            main_row: BoundRow::Unmatched,
            joined,
            excluded: false,
        }
        .extend(table, BoundRow::Row(row))
    }

    /// Aliases bound so far: FROM first, then joined tables in no particular order
    pub fn tables(&self) -> impl Iterator<Item = &'q str> + '_ {
        std::iter::once(self.main_table).chain(self.joined.keys().copied())
    }

    /// Combined row map over every bound table
    pub fn row_map<'a>(&self, catalog: &'a Catalog) -> QueryResult<RowMap<'a>>
    where
        'q: 'a,
    {
        let mut row = RowMap::with_capacity(self.joined.len() + 1);
        row.insert(self.main_table, self.main_row.cells(catalog.table(self.main_table)?)?);
        for (alias, bound) in &self.joined {
            row.insert(*alias, bound.cells(catalog.table(alias)?)?);
        }
        Ok(row)
    }
}
