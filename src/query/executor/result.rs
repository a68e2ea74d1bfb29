// Query Result Implementation
//
// This module defines the result and error types for query execution.

use std::fmt;

use thiserror::Error;

/// Rows produced by a query. Row 0 is the header row.
pub type ResultRows = Vec<Vec<String>>;

/// Broad classification of a [`QueryError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed builder usage
    Config,
    /// A table or column reference could not be resolved
    Resolution,
    /// Failure while running a clause
    Execution,
    /// Reading or writing a delimited file failed
    Io,
}

/// Pipeline stage an execution error was raised in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Join,
    Where,
    Select,
    Union,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Join => write!(f, "JOIN"),
            Stage::Where => write!(f, "WHERE"),
            Stage::Select => write!(f, "SELECT"),
            Stage::Union => write!(f, "UNION"),
        }
    }
}

/// Represents query construction and execution errors
#[derive(Error, Debug)]
pub enum QueryError {
    /// Malformed query built through the builder
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
    /// Operator text that does not name a known operator
    #[error("Unsupported operator: {0}")]
    UnsupportedOperator(String),
    /// Column reference that is neither `col` nor `table.col`
    #[error("Invalid column name format: {0}")]
    InvalidColumnReference(String),
    /// AND/OR composition where one side has no condition
    #[error("Composite condition requires both left and right conditions: {0}")]
    NilSubcondition(String),
    /// A clause that requires a predicate has none
    #[error("Missing predicate: {0}")]
    NilPredicate(String),

    /// Table alias not registered
    #[error("Table not found: {0}")]
    TableNotFound(String),
    /// Column not found, optionally in a specific table
    #[error("Column not found: {column}{}", .table.as_ref().map(|t| format!(" in table {t}")).unwrap_or_default())]
    ColumnNotFound { column: String, table: Option<String> },
    /// Bare column name defined by more than one table
    #[error("Ambiguous column name: {column} exists in tables {}", .tables.join(", "))]
    AmbiguousColumn { column: String, tables: Vec<String> },
    /// Table resolved but not part of the row being evaluated
    #[error("Table {0} not found in row data")]
    TableNotInRow(String),
    /// Row shorter than the resolved column position
    #[error("Column index {index} out of range for table {table}")]
    IndexOutOfRange { index: usize, table: String },

    /// LIKE pattern that does not translate into a valid regular expression
    #[error("Invalid LIKE pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    /// User supplied predicate or computed column returned an error
    #[error("{context} failed: {source}")]
    PredicateFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// Cell that cannot be read as the requested type
    #[error("Cannot read '{value}' as {expected}")]
    InvalidValue { value: String, expected: &'static str },
    /// UNION sibling whose width differs from the primary query
    #[error("UNION queries must have the same number of columns: expected {expected}, found {found}")]
    ColumnCountMismatch { expected: usize, found: usize },

    /// Table source could not be read
    #[error("Failed to load table from {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: csv::Error,
    },
    /// Workbook or worksheet could not be read
    #[error("Failed to load worksheet from {path}: {source}")]
    Spreadsheet {
        path: String,
        #[source]
        source: calamine::Error,
    },
    /// Table source without a header record
    #[error("Table source {0} is empty")]
    EmptySource(String),
    /// Result set could not be written
    #[error("Failed to export results to {path}: {source}")]
    Export {
        path: String,
        #[source]
        source: csv::Error,
    },

    /// Error raised inside a pipeline stage
    #[error("{stage} stage failed: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: Box<QueryError>,
    },
}

impl QueryError {
    /// Classify the error, looking through stage wrappers
    pub fn kind(&self) -> ErrorKind {
        match self.root_cause() {
            QueryError::InvalidQuery(_)
            | QueryError::UnsupportedOperator(_)
            | QueryError::InvalidColumnReference(_)
            | QueryError::NilSubcondition(_)
            | QueryError::NilPredicate(_) => ErrorKind::Config,
            QueryError::TableNotFound(_)
            | QueryError::ColumnNotFound { .. }
            | QueryError::AmbiguousColumn { .. }
            | QueryError::TableNotInRow(_)
            | QueryError::IndexOutOfRange { .. } => ErrorKind::Resolution,
            QueryError::InvalidPattern { .. }
            | QueryError::PredicateFailed { .. }
            | QueryError::InvalidValue { .. }
            | QueryError::ColumnCountMismatch { .. } => ErrorKind::Execution,
            QueryError::Load { .. }
            | QueryError::Spreadsheet { .. }
            | QueryError::EmptySource(_)
            | QueryError::Export { .. } => {
                ErrorKind::Io
            }
            // root_cause never returns a Stage
            QueryError::Stage { .. } => ErrorKind::Execution,
        }
    }

    /// The innermost error below any stage wrappers
    pub fn root_cause(&self) -> &QueryError {
        let mut current = self;
        while let QueryError::Stage { source, .. } = current {
            current = &**source;
        }
        current
    }

    /// Stage the error was raised in, if it came from execution
    pub fn stage(&self) -> Option<Stage> {
        match self {
            QueryError::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// Wrap this error with the stage it was raised in. Already wrapped errors are kept
    /// as they are so the innermost stage is reported.
    pub fn in_stage(self, stage: Stage) -> Self {
        match self {
            QueryError::Stage { .. } => self,
            other => QueryError::Stage {
                stage,
                source: Box::new(other),
            },
        }
    }

    pub(crate) fn predicate_failed(context: impl Into<String>, err: anyhow::Error) -> Self {
        QueryError::PredicateFailed {
            context: context.into(),
            source: err.into(),
        }
    }
}

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;
