// Query Execution Engine Implementation
//
// This module implements the engine for executing queries built with the
// query builder. The engine owns the registered tables; each execution works on
// a snapshot of the catalog so registrations never block running queries.

use std::path::Path;
use std::sync::Arc;

use log::{debug, info};
use parking_lot::RwLock;

use crate::catalog::{Catalog, CsvOptions, Table};
use crate::query::ast::Query;
use crate::query::executor::operators::{
    FilterOperator, ProjectionOperator, TableScanOperator, UnionOperator, execute_join,
};
use crate::query::executor::result::{QueryResult, ResultRows, Stage};

/// Configuration for the execution engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Use the hash join path for single equality join conditions
    pub hash_join: bool,
    /// Options used by `register_csv`
    pub csv: CsvOptions,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hash_join: true,
            csv: CsvOptions::default(),
        }
    }
}

/// Executes queries against the tables registered with it
#[derive(Debug, Default)]
pub struct Engine {
    catalog: RwLock<Catalog>,
    config: EngineConfig,
}

impl Engine {
    /// Create an engine with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with a custom configuration
    pub fn with_config(config: EngineConfig) -> Self {
        Engine {
            catalog: RwLock::new(Catalog::new()),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Register a table under an alias. A table already registered under the same
    /// alias is replaced and returned.
    pub fn register(&self, alias: impl Into<String>, table: Table) -> Option<Arc<Table>> {
        let alias = alias.into();
        info!(
            "Registering table {} ({} rows, {} columns)",
            alias,
            table.len(),
            table.width()
        );
        self.catalog.write().register(alias, table)
    }

    /// Load a delimited file and register it under `alias`
    pub fn register_csv(&self, alias: &str, path: impl AsRef<Path>) -> QueryResult<()> {
        let table = Table::from_csv_path(alias, path, &self.config.csv)?;
        self.register(alias, table);
        Ok(())
    }

    /// Load a worksheet (the first one when `sheet` is `None`) and register it under `alias`
    pub fn register_xlsx(&self, alias: &str, path: impl AsRef<Path>, sheet: Option<&str>) -> QueryResult<()> {
        let table = Table::from_xlsx_path(alias, path, sheet)?;
        self.register(alias, table);
        Ok(())
    }

    /// Get a registered table
    pub fn table(&self, alias: &str) -> Option<Arc<Table>> {
        self.catalog.read().get_shared(alias)
    }

    /// Registered aliases, sorted
    pub fn tables(&self) -> Vec<String> {
        self.catalog.read().aliases().into_iter().map(str::to_string).collect()
    }

    /// Snapshot of the current catalog
    pub fn catalog(&self) -> Catalog {
        self.catalog.read().clone()
    }

    /// Execute a query. Row 0 of the result is the header row.
    pub fn execute(&self, query: &Query) -> QueryResult<ResultRows> {
        let catalog = self.catalog();
        self.execute_with(query, &catalog)
    }

    fn execute_with(&self, query: &Query, catalog: &Catalog) -> QueryResult<ResultRows> {
        let rows = self.execute_select(query, catalog)?;

        let Some(union) = query.union() else {
            return Ok(rows);
        };

        let siblings = union
            .queries()
            .iter()
            .map(|sibling| self.execute_with(sibling, catalog))
            .collect::<QueryResult<Vec<_>>>()
            .map_err(|e| e.in_stage(Stage::Union))?;

        debug!("{} with {} sibling queries", union.kind(), siblings.len());
        UnionOperator::new(union.kind())
            .merge(rows, siblings)
            .map_err(|e| e.in_stage(Stage::Union))
    }

    fn execute_select(&self, query: &Query, catalog: &Catalog) -> QueryResult<ResultRows> {
        let main = catalog.table(query.from())?;
        let mut bindings = TableScanOperator::new(query.from(), main).bindings();
        debug!("FROM {}: {} bindings", query.from(), bindings.len());

        let mut bound = vec![query.from()];
        for join in query.joins() {
            let output = execute_join(bindings, join, &bound, catalog, self.config.hash_join)
                .map_err(|e| e.in_stage(Stage::Join))?;
            debug!(
                "{} {}: {} bindings{}",
                join.kind(),
                join.table(),
                output.bindings.len(),
                if output.used_hash { " (hash)" } else { "" }
            );
            bindings = output.bindings;
            bound.push(join.table());
        }

        if let Some(condition) = query.filter() {
            let remaining = FilterOperator::new(condition, catalog)
                .apply(&mut bindings)
                .map_err(|e| e.in_stage(Stage::Where))?;
            debug!("WHERE {}: {} of {} bindings pass", condition.kind(), remaining, bindings.len());
        }

        let projection = ProjectionOperator::new(query, catalog).map_err(|e| e.in_stage(Stage::Select))?;
        projection.execute(&bindings).map_err(|e| e.in_stage(Stage::Select))
    }
}
