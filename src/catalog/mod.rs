//! Catalog Management Module
//!
//! This module manages the tables available to a query, keyed by alias.
//! A catalog is an explicit value handed to every evaluation call; there is no
//! process-wide registry, so independent engines can live side by side.

pub mod loader;
pub mod table;
pub mod xlsx;

// Re-export key types
pub use self::loader::CsvOptions;
pub use self::table::Table;

use std::collections::HashMap;
use std::sync::Arc;

use crate::query::executor::result::{QueryError, QueryResult};

/// Registered tables keyed by alias
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tables: HashMap<String, Arc<Table>>,
}

impl Catalog {
    /// Create a new, empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table under an alias, returning the table it replaced
    pub fn register(&mut self, alias: impl Into<String>, table: Table) -> Option<Arc<Table>> {
        self.register_shared(alias, Arc::new(table))
    }

    /// Register an already shared table under an alias
    pub fn register_shared(&mut self, alias: impl Into<String>, table: Arc<Table>) -> Option<Arc<Table>> {
        self.tables.insert(alias.into(), table)
    }

    /// Get a table by alias
    pub fn get(&self, alias: &str) -> Option<&Table> {
        self.tables.get(alias).map(Arc::as_ref)
    }

    /// Get a shared handle to a table by alias
    pub fn get_shared(&self, alias: &str) -> Option<Arc<Table>> {
        self.tables.get(alias).cloned()
    }

    /// Get a table by alias or a `TableNotFound` error
    pub fn table(&self, alias: &str) -> QueryResult<&Table> {
        self.get(alias).ok_or_else(|| QueryError::TableNotFound(alias.to_string()))
    }

    /// Get the catalog's own alias string together with the table
    pub(crate) fn entry(&self, alias: &str) -> QueryResult<(&str, &Table)> {
        self.tables
            .get_key_value(alias)
            .map(|(name, table)| (name.as_str(), table.as_ref()))
            .ok_or_else(|| QueryError::TableNotFound(alias.to_string()))
    }

    /// Check if an alias is registered
    pub fn contains(&self, alias: &str) -> bool {
        self.tables.contains_key(alias)
    }

    /// Iterate over registered aliases and tables, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Table)> {
        self.tables.iter().map(|(alias, table)| (alias.as_str(), table.as_ref()))
    }

    /// Registered aliases, sorted
    pub fn aliases(&self) -> Vec<&str> {
        let mut aliases: Vec<&str> = self.tables.keys().map(String::as_str).collect();
        aliases.sort_unstable();
        aliases
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Catalog holding only the given aliases. Unknown aliases are skipped.
    pub fn subset<'a>(&self, aliases: impl IntoIterator<Item = &'a str>) -> Catalog {
        let tables = aliases
            .into_iter()
            .filter_map(|alias| self.tables.get(alias).map(|t| (alias.to_string(), t.clone())))
            .collect();
        Catalog { tables }
    }
}
