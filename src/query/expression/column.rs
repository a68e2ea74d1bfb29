// Column References
//
// Parsing of `table.column` / `column` references and their resolution against a
// catalog. Bare names resolve only when exactly one candidate table defines them.

use std::fmt;

use crate::catalog::Catalog;
use crate::query::executor::result::{QueryError, QueryResult};

/// A reference to a column, qualified with a table alias or bare
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnRef {
    Qualified { table: String, column: String },
    Bare(String),
}

impl ColumnRef {
    /// Parse `column` or `table.column`
    pub fn parse(text: &str) -> QueryResult<Self> {
        let parts: Vec<&str> = text.split('.').collect();
        match parts.as_slice() {
            [column] if !column.is_empty() => Ok(ColumnRef::Bare(column.to_string())),
            [table, column] if !table.is_empty() && !column.is_empty() => Ok(ColumnRef::Qualified {
                table: table.to_string(),
                column: column.to_string(),
            }),
            _ => Err(QueryError::InvalidColumnReference(text.to_string())),
        }
    }

    /// Column name without any qualifier
    pub fn column(&self) -> &str {
        match self {
            ColumnRef::Qualified { column, .. } => column,
            ColumnRef::Bare(column) => column,
        }
    }

    /// Resolve against every table in the catalog.
    /// Returns the catalog's alias for the table and the column position.
    pub fn resolve<'c>(&self, catalog: &'c Catalog) -> QueryResult<(&'c str, usize)> {
        match self {
            ColumnRef::Qualified { table, column } => resolve_qualified(catalog, table, column),
            ColumnRef::Bare(column) => resolve_bare(column, catalog.iter()),
        }
    }

    /// Resolve against the tables named in `scope` only.
    /// A qualified reference to a registered table outside the scope is `TableNotInRow`.
    pub fn resolve_within<'c>(&self, catalog: &'c Catalog, scope: &[&str]) -> QueryResult<(&'c str, usize)> {
        match self {
            ColumnRef::Qualified { table, column } => {
                let resolved = resolve_qualified(catalog, table, column)?;
                if !scope.contains(&table.as_str()) {
                    return Err(QueryError::TableNotInRow(table.clone()));
                }
                Ok(resolved)
            }
            ColumnRef::Bare(column) => {
                let candidates = scope
                    .iter()
                    .map(|alias| catalog.entry(alias))
                    .collect::<QueryResult<Vec<_>>>()?;
                resolve_bare(column, candidates.into_iter())
            }
        }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRef::Qualified { table, column } => write!(f, "{}.{}", table, column),
            ColumnRef::Bare(column) => f.write_str(column),
        }
    }
}

fn resolve_qualified<'c>(catalog: &'c Catalog, table: &str, column: &str) -> QueryResult<(&'c str, usize)> {
    let (alias, t) = catalog.entry(table)?;
    Ok((alias, t.get_column_index(column)?))
}

fn resolve_bare<'c>(
    column: &str,
    candidates: impl Iterator<Item = (&'c str, &'c crate::catalog::Table)>,
) -> QueryResult<(&'c str, usize)> {
    let mut found: Option<(&'c str, usize)> = None;
    let mut owners: Vec<&'c str> = Vec::new();

    for (alias, table) in candidates {
        if owners.contains(&alias) {
            continue;
        }
        if let Some(index) = table.column_index(column) {
            owners.push(alias);
            found.get_or_insert((alias, index));
        }
    }

    match (found, owners.len()) {
        (Some(resolved), 1) => Ok(resolved),
        (Some(_), _) => {
            owners.sort_unstable();
            Err(QueryError::AmbiguousColumn {
                column: column.to_string(),
                tables: owners.into_iter().map(str::to_string).collect(),
            })
        }
        (None, _) => Err(QueryError::ColumnNotFound {
            column: column.to_string(),
            table: None,
        }),
    }
}
