// Projection Operator Implementation
//
// This module implements the SELECT stage. Column specs are expanded and resolved
// once per query; each surviving binding is then turned into one output row.

use std::collections::HashSet;

use crate::catalog::Catalog;
use crate::query::ast::{CustomColumn, Query, SelectItem};
use crate::query::executor::binding::Binding;
use crate::query::executor::result::{QueryError, QueryResult};

/// A resolved output column
#[derive(Debug, Clone, PartialEq, Eq)]
struct OutputColumn<'c> {
    label: String,
    table: &'c str,
    index: usize,
}

/// Projection operator that turns bindings into result rows
#[derive(Debug)]
pub struct ProjectionOperator<'c, 'q> {
    /// Regular columns, in output order
    columns: Vec<OutputColumn<'c>>,
    /// Computed columns, evaluated after the regular ones
    custom: &'q [CustomColumn],
    /// Every registered table
    catalog: &'c Catalog,
}

impl<'c, 'q> ProjectionOperator<'c, 'q> {
    /// Expand wildcards and resolve every column of the query's SELECT list
    pub fn new(query: &'q Query, catalog: &'c Catalog) -> QueryResult<Self> {
        let scope = query.tables();
        let select = query.select();

        let mut columns = Vec::new();
        let mut seen = HashSet::new();
        let mut push = |column: OutputColumn<'c>| {
            if seen.insert(column.label.clone()) {
                columns.push(column);
            }
        };

        // No SELECT at all: the FROM table's headers, labelled as written
        if select.items().is_empty() && select.custom_columns().is_empty() {
            let (alias, table) = catalog.entry(query.from())?;
            for (index, header) in table.headers().iter().enumerate() {
                push(OutputColumn {
                    label: header.clone(),
                    table: alias,
                    index,
                });
            }
        }

        for item in select.items() {
            match item {
                SelectItem::Wildcard => {
                    for alias in &scope {
                        expand_table(catalog, alias, &mut push)?;
                    }
                }
                SelectItem::TableWildcard(table) => {
                    let (alias, _) = catalog.entry(table)?;
                    if !scope.contains(&alias) {
                        return Err(QueryError::TableNotInRow(table.clone()));
                    }
                    expand_table(catalog, alias, &mut push)?;
                }
                SelectItem::Column { text, reference } => {
                    let (table, index) = reference.resolve_within(catalog, &scope)?;
                    push(OutputColumn {
                        label: text.clone(),
                        table,
                        index,
                    });
                }
            }
        }

        Ok(ProjectionOperator {
            columns,
            custom: select.custom_columns(),
            catalog,
        })
    }

    /// Header row: column labels followed by computed column names
    pub fn header(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|c| c.label.clone())
            .chain(self.custom.iter().map(|c| c.name().to_string()))
            .collect()
    }

    /// Build the output row for one binding
    pub fn project(&self, binding: &Binding<'_>) -> QueryResult<Vec<String>> {
        let row = binding.row_map(self.catalog)?;
        let mut output = Vec::with_capacity(self.columns.len() + self.custom.len());

        for column in &self.columns {
            let cells = row
                .get(column.table)
                .ok_or_else(|| QueryError::TableNotInRow(column.table.to_string()))?;
            let cell = cells.get(column.index).ok_or_else(|| QueryError::IndexOutOfRange {
                index: column.index,
                table: column.table.to_string(),
            })?;
            output.push(cell.clone());
        }

        for custom in self.custom {
            let value = (custom.function)(&row, self.catalog)
                .map_err(|e| QueryError::predicate_failed(format!("custom column {}", custom.name()), e))?;
            output.push(value);
        }

        Ok(output)
    }

    /// Header row followed by one row per non-excluded binding
    pub fn execute(&self, bindings: &[Binding<'_>]) -> QueryResult<Vec<Vec<String>>> {
        let mut rows = Vec::with_capacity(bindings.len() + 1);
        rows.push(self.header());
        for binding in bindings.iter().filter(|b| !b.is_excluded()) {
            rows.push(self.project(binding)?);
        }
        Ok(rows)
    }
}

fn expand_table<'c>(
    catalog: &'c Catalog,
    alias: &str,
    push: &mut impl FnMut(OutputColumn<'c>),
) -> QueryResult<()> {
    let (alias, table) = catalog.entry(alias)?;
    for (index, header) in table.headers().iter().enumerate() {
        push(OutputColumn {
            label: format!("{}.{}", alias, header),
            table: alias,
            index,
        });
    }
    Ok(())
}
