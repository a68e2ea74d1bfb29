// Hash Join Implementation
//
// This file implements the hash join algorithm, which is optimized for
// equality-based join conditions with O(n+m) time complexity.
//
// The joined table is the build side, hashed on its join column. Each binding
// probes with the value of the bound table's column. Buckets hold row positions
// in table order, so matches come out in the same order the nested loop finds them.

use std::collections::HashMap;

use crate::catalog::{Catalog, Table};
use crate::query::executor::binding::Binding;
use crate::query::executor::result::{QueryError, QueryResult};
use crate::query::expression::{JoinCondition, Operator};

use super::JoinMatcher;

/// Hash join for `bound.col = joined.col` conditions
pub struct HashJoin<'a> {
    /// Alias of the already bound table that supplies the probe value
    probe_alias: &'a str,
    /// The already bound table
    probe_table: &'a Table,
    /// Position of the probe column
    probe_column: usize,
    /// Join column value -> row positions in the joined table
    buckets: HashMap<&'a str, Vec<usize>>,
}

impl<'a> HashJoin<'a> {
    /// Build a hash join when the condition is a single equality between a column of
    /// `alias` and a column of one of the `bound` tables. Returns `None` otherwise, in
    /// which case the caller falls back to the nested loop.
    pub fn try_build(
        alias: &str,
        table: &'a Table,
        condition: &JoinCondition,
        bound: &[&str],
        catalog: &'a Catalog,
    ) -> Option<Self> {
        let JoinCondition::Columns(comparison) = condition else {
            return None;
        };
        if comparison.operator != Operator::EQUAL {
            return None;
        }

        let (build_column, probe_table, probe_column) = if comparison.right_table == alias {
            (&comparison.right_column, &comparison.left_table, &comparison.left_column)
        } else if comparison.left_table == alias {
            (&comparison.left_column, &comparison.right_table, &comparison.right_column)
        } else {
            return None;
        };
        if probe_table == alias || !bound.contains(&probe_table.as_str()) {
            return None;
        }

        let build_index = table.column_index(build_column)?;
        let (probe_alias, probe_source) = catalog.entry(probe_table).ok()?;
        let probe_index = probe_source.column_index(probe_column)?;

        let mut buckets: HashMap<&'a str, Vec<usize>> = HashMap::new();
        for (position, row) in table.rows().iter().enumerate() {
            if let Some(value) = row.get(build_index) {
                buckets.entry(value.as_str()).or_default().push(position);
            }
        }

        Some(HashJoin {
            probe_alias,
            probe_table: probe_source,
            probe_column: probe_index,
            buckets,
        })
    }

    /// Number of distinct join keys on the build side
    pub fn key_count(&self) -> usize {
        self.buckets.len()
    }
}

impl JoinMatcher for HashJoin<'_> {
    fn matches(&self, binding: &Binding<'_>) -> QueryResult<Vec<usize>> {
        let bound = binding
            .bound(self.probe_alias)
            .ok_or_else(|| QueryError::TableNotInRow(self.probe_alias.to_string()))?;
        let cells = bound.cells(self.probe_table)?;
        let key = cells.get(self.probe_column).ok_or_else(|| QueryError::IndexOutOfRange {
            index: self.probe_column,
            table: self.probe_alias.to_string(),
        })?;

        Ok(self.buckets.get(key.as_str()).cloned().unwrap_or_default())
    }

    fn name(&self) -> &'static str {
        "hash"
    }
}
