// Query Descriptor
//
// The immutable result of `QueryBuilder::build`. A query references tables by
// alias only; aliases are resolved against the engine's catalog at execution time.

use std::fmt;

use crate::common::types::ColumnFn;
use crate::query::builder::QueryBuilder;
use crate::query::expression::{ColumnRef, Condition, JoinCondition};

/// A validated query
#[derive(Debug, Clone)]
pub struct Query {
    pub(crate) select: SelectClause,
    pub(crate) from: String,
    pub(crate) filter: Option<Condition>,
    pub(crate) joins: Vec<JoinClause>,
    pub(crate) union: Option<UnionClause>,
}

impl Query {
    /// Start building a query
    pub fn builder() -> QueryBuilder {
        QueryBuilder::new()
    }

    pub fn select(&self) -> &SelectClause {
        &self.select
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn filter(&self) -> Option<&Condition> {
        self.filter.as_ref()
    }

    pub fn joins(&self) -> &[JoinClause] {
        &self.joins
    }

    pub fn union(&self) -> Option<&UnionClause> {
        self.union.as_ref()
    }

    /// Aliases bound by this query: FROM first, then joined tables in declaration order.
    /// A built query never binds an alias twice.
    pub fn tables(&self) -> Vec<&str> {
        std::iter::once(self.from.as_str())
            .chain(self.joins.iter().map(|join| join.table.as_str()))
            .collect()
    }
}

/// One entry of the SELECT list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectItem {
    /// `*`
    Wildcard,
    /// `table.*`
    TableWildcard(String),
    /// `col` or `table.col`, with the text as written
    Column { text: String, reference: ColumnRef },
}

impl SelectItem {
    pub(crate) fn parse(text: &str) -> crate::query::executor::result::QueryResult<Self> {
        if text == "*" {
            return Ok(SelectItem::Wildcard);
        }
        if let Some(table) = text.strip_suffix(".*") {
            if table.is_empty() || table.contains('.') {
                return Err(crate::query::executor::result::QueryError::InvalidColumnReference(text.to_string()));
            }
            return Ok(SelectItem::TableWildcard(table.to_string()));
        }
        Ok(SelectItem::Column {
            text: text.to_string(),
            reference: ColumnRef::parse(text)?,
        })
    }
}

/// A named computed column
#[derive(Clone)]
pub struct CustomColumn {
    pub(crate) name: String,
    pub(crate) function: ColumnFn,
}

impl CustomColumn {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for CustomColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomColumn").field("name", &self.name).finish_non_exhaustive()
    }
}

/// SELECT list: regular columns followed by computed columns
#[derive(Debug, Clone, Default)]
pub struct SelectClause {
    pub(crate) items: Vec<SelectItem>,
    pub(crate) custom: Vec<CustomColumn>,
}

impl SelectClause {
    pub fn items(&self) -> &[SelectItem] {
        &self.items
    }

    pub fn custom_columns(&self) -> &[CustomColumn] {
        &self.custom
    }
}

/// Join kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
}

impl JoinType {
    /// Bindings without a match survive, padded on the joined side
    pub fn keeps_unmatched_left(&self) -> bool {
        matches!(self, JoinType::Left | JoinType::Full)
    }

    /// Joined rows without a match survive, padded on the bound side
    pub fn keeps_unmatched_right(&self) -> bool {
        matches!(self, JoinType::Right | JoinType::Full)
    }
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinType::Inner => write!(f, "INNER JOIN"),
            JoinType::Left => write!(f, "LEFT JOIN"),
            JoinType::Right => write!(f, "RIGHT JOIN"),
            JoinType::Full => write!(f, "FULL JOIN"),
        }
    }
}

/// `<kind> JOIN table ON condition`
#[derive(Debug, Clone)]
pub struct JoinClause {
    pub(crate) table: String,
    pub(crate) kind: JoinType,
    pub(crate) condition: JoinCondition,
}

impl JoinClause {
    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn kind(&self) -> JoinType {
        self.kind
    }

    pub fn condition(&self) -> &JoinCondition {
        &self.condition
    }
}

/// UNION flavours
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnionType {
    /// Drop duplicate rows
    Distinct,
    /// Keep every row
    All,
}

impl fmt::Display for UnionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnionType::Distinct => write!(f, "UNION"),
            UnionType::All => write!(f, "UNION ALL"),
        }
    }
}

/// Sibling queries merged into the primary result
#[derive(Debug, Clone)]
pub struct UnionClause {
    pub(crate) kind: UnionType,
    pub(crate) queries: Vec<Query>,
}

impl UnionClause {
    pub fn kind(&self) -> UnionType {
        self.kind
    }

    pub fn queries(&self) -> &[Query] {
        &self.queries
    }
}
