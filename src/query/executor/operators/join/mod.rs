// Join Operators Module
//
// This module runs one JOIN clause over the current binding set. A matcher finds
// the joined rows for each binding; this module turns matches into the next
// binding set according to the join kind.

// Re-export public components
pub use self::hash_join::HashJoin;
pub use self::nested_loop::NestedLoopJoin;

// Import other modules
mod hash_join;
mod nested_loop;

use log::trace;

use crate::catalog::Catalog;
use crate::query::ast::JoinClause;
use crate::query::executor::binding::{Binding, BoundRow};
use crate::query::executor::result::QueryResult;

/// Finds the rows of the joined table that match a binding
pub trait JoinMatcher {
    /// Positions of the matching rows, in ascending order
    fn matches(&self, binding: &Binding<'_>) -> QueryResult<Vec<usize>>;

    /// Name used in log output
    fn name(&self) -> &'static str;
}

/// Outcome of one join step
#[derive(Debug)]
pub struct JoinOutput<'q> {
    pub bindings: Vec<Binding<'q>>,
    pub used_hash: bool,
}

/// Apply one JOIN clause to the binding set.
///
/// `bound` lists the aliases bound before this step, FROM first. Join conditions
/// only see those tables plus the joined one.
pub fn execute_join<'q>(
    bindings: Vec<Binding<'q>>,
    clause: &'q JoinClause,
    bound: &[&'q str],
    catalog: &Catalog,
    hash_join: bool,
) -> QueryResult<JoinOutput<'q>> {
    let alias = clause.table();
    let scope = catalog.subset(bound.iter().copied().chain(std::iter::once(alias)));
    let table = scope.table(alias)?;

    let hashed = if hash_join {
        HashJoin::try_build(alias, table, clause.condition(), bound, &scope)
    } else {
        None
    };
    let used_hash = hashed.is_some();
    let matcher: Box<dyn JoinMatcher + '_> = match hashed {
        Some(hashed) => Box::new(hashed),
        None => Box::new(NestedLoopJoin::new(alias, table, clause.condition(), &scope)),
    };

    trace!(
        "{} {} using {} join over {} bindings x {} rows",
        clause.kind(),
        alias,
        matcher.name(),
        bindings.len(),
        table.len()
    );

    let kind = clause.kind();
    let mut output = Vec::with_capacity(bindings.len());
    let mut row_matched = vec![false; table.len()];

    for binding in bindings.iter().filter(|b| !b.is_excluded()) {
        let matched = matcher.matches(binding)?;
        if matched.is_empty() {
            if kind.keeps_unmatched_left() {
                output.push(binding.extend(alias, BoundRow::Unmatched));
            }
            continue;
        }
        for position in matched {
            row_matched[position] = true;
            output.push(binding.extend(alias, BoundRow::Row(position)));
        }
    }

    if kind.keeps_unmatched_right() {
        if let Some((main_table, earlier)) = bound.split_first() {
            for (position, _) in row_matched.iter().enumerate().filter(|(_, m)| !**m) {
                output.push(Binding::right_only(*main_table, earlier, alias, position));
            }
        }
    }

    Ok(JoinOutput {
        bindings: output,
        used_hash,
    })
}
