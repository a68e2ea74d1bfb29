use std::collections::HashMap;
use std::sync::Arc;

use crate::catalog::Catalog;

/// Cells of every table taking part in one logical row, keyed by table alias
pub type RowMap<'a> = HashMap<&'a str, &'a [String]>;

/// User predicate used by custom WHERE and JOIN conditions
pub type PredicateFn = Arc<dyn Fn(&RowMap<'_>, &Catalog) -> anyhow::Result<bool> + Send + Sync>;

/// User function computing the value of a named SELECT column
pub type ColumnFn = Arc<dyn Fn(&RowMap<'_>, &Catalog) -> anyhow::Result<String> + Send + Sync>;

/// Date layout used by the typed cell accessors
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Date-time layout used by the typed cell accessors
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
