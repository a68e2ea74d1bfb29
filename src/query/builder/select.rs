// SELECT clause construction

use std::sync::Arc;

use super::QueryBuilder;
use crate::catalog::Catalog;
use crate::common::types::RowMap;
use crate::query::ast::{CustomColumn, SelectItem};
use crate::query::executor::result::QueryError;

impl QueryBuilder {
    /// Add columns to the SELECT list: `col`, `table.col`, `*` or `table.*`
    pub fn select<I, S>(self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.apply(|b| {
            for column in columns {
                b.items.push(SelectItem::parse(column.as_ref())?);
            }
            Ok(())
        })
    }

    /// Add a computed column. Computed columns follow the regular ones in the output.
    pub fn select_custom<F>(self, name: &str, function: F) -> Self
    where
        F: Fn(&RowMap<'_>, &Catalog) -> anyhow::Result<String> + Send + Sync + 'static,
    {
        self.apply(|b| {
            if name.is_empty() {
                return Err(QueryError::InvalidQuery("computed column needs a name".to_string()));
            }
            b.custom.push(CustomColumn {
                name: name.to_string(),
                function: Arc::new(function),
            });
            Ok(())
        })
    }
}
