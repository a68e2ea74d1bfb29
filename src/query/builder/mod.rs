// Query Builder
//
// Fluent construction of `Query` values. Every call consumes and returns the
// builder; the first error is kept and turns all later calls into no-ops, so a
// chain can be written without checking each step. `build` reports the error or
// validates the collected clauses.

mod filter;
mod join;
mod select;
mod union;

use crate::query::ast::{CustomColumn, JoinClause, JoinType, Query, SelectClause, SelectItem, UnionClause};
use crate::query::executor::result::{QueryError, QueryResult};
use crate::query::expression::{Condition, JoinCondition};

/// A JOIN whose ON clause may not have been given yet
#[derive(Debug)]
struct PendingJoin {
    table: String,
    kind: JoinType,
    condition: Option<JoinCondition>,
}

/// Builder for [`Query`]
#[derive(Debug, Default)]
pub struct QueryBuilder {
    items: Vec<SelectItem>,
    custom: Vec<CustomColumn>,
    from: Option<String>,
    filter: Option<Condition>,
    joins: Vec<PendingJoin>,
    union: Option<UnionClause>,
    error: Option<QueryError>,
}

impl QueryBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `step` unless an error was already recorded; record its error otherwise
    fn apply(mut self, step: impl FnOnce(&mut Self) -> QueryResult<()>) -> Self {
        if self.error.is_none() {
            if let Err(e) = step(&mut self) {
                self.error = Some(e);
            }
        }
        self
    }

    /// The first error recorded so far
    pub fn error(&self) -> Option<&QueryError> {
        self.error.as_ref()
    }

    /// Set the FROM table
    pub fn from(self, table: &str) -> Self {
        self.apply(|b| {
            if table.is_empty() {
                return Err(QueryError::InvalidQuery("FROM must specify a table".to_string()));
            }
            b.from = Some(table.to_string());
            Ok(())
        })
    }

    /// Validate the collected clauses and produce the query
    pub fn build(self) -> QueryResult<Query> {
        if let Some(error) = self.error {
            return Err(error);
        }

        let from = self
            .from
            .ok_or_else(|| QueryError::InvalidQuery("FROM clause is required".to_string()))?;

        // Each alias can be bound once per query
        let mut aliases = vec![from.as_str()];
        for join in &self.joins {
            if aliases.contains(&join.table.as_str()) {
                return Err(QueryError::InvalidQuery(format!(
                    "table {} is bound more than once; {} {} would replace its rows",
                    join.table, join.kind, join.table
                )));
            }
            aliases.push(join.table.as_str());
        }

        let joins = self
            .joins
            .into_iter()
            .map(|join| match join.condition {
                Some(condition) => Ok(JoinClause {
                    table: join.table,
                    kind: join.kind,
                    condition,
                }),
                None => Err(QueryError::NilPredicate(format!("{} {} has no ON condition", join.kind, join.table))),
            })
            .collect::<QueryResult<Vec<_>>>()?;

        Ok(Query {
            select: SelectClause {
                items: self.items,
                custom: self.custom,
            },
            from,
            filter: self.filter,
            joins,
            union: self.union,
        })
    }
}
