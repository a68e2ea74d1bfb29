// Operator Implementation
//
// Binary operators over string operands. Comparisons are lexicographic on the raw
// strings, so "10" > "9" is false. Numeric logic belongs in custom predicates.

use std::fmt;
use std::str::FromStr;

use regex::Regex;

use crate::query::executor::result::{QueryError, QueryResult};

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
}

impl ComparisonOperator {
    pub fn evaluate(&self, left: &str, right: &str) -> bool {
        match self {
            ComparisonOperator::Equal => left == right,
            ComparisonOperator::NotEqual => left != right,
            ComparisonOperator::GreaterThan => left > right,
            ComparisonOperator::GreaterThanOrEqual => left >= right,
            ComparisonOperator::LessThan => left < right,
            ComparisonOperator::LessThanOrEqual => left <= right,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            ComparisonOperator::Equal => "=",
            ComparisonOperator::NotEqual => "!=",
            ComparisonOperator::GreaterThan => ">",
            ComparisonOperator::GreaterThanOrEqual => ">=",
            ComparisonOperator::LessThan => "<",
            ComparisonOperator::LessThanOrEqual => "<=",
        }
    }
}

/// Logical operators combining two boolean results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    And,
    Or,
}

impl LogicalOperator {
    /// Combine two booleans
    pub fn apply(&self, left: bool, right: bool) -> bool {
        match self {
            LogicalOperator::And => left && right,
            LogicalOperator::Or => left || right,
        }
    }

    /// Combine two stringified booleans. Anything other than "true" is false.
    pub fn evaluate(&self, left: &str, right: &str) -> bool {
        self.apply(left == "true", right == "true")
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            LogicalOperator::And => "AND",
            LogicalOperator::Or => "OR",
        }
    }
}

/// Any operator usable in a condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Comparison(ComparisonOperator),
    Logical(LogicalOperator),
    /// SQL LIKE: `%` matches any sequence, `_` any single character
    Like,
}

impl Operator {
    pub const EQUAL: Operator = Operator::Comparison(ComparisonOperator::Equal);

    /// Evaluate the operator. For LIKE, `left` is the value and `right` the pattern.
    pub fn evaluate(&self, left: &str, right: &str) -> QueryResult<bool> {
        match self {
            Operator::Comparison(op) => Ok(op.evaluate(left, right)),
            Operator::Logical(op) => Ok(op.evaluate(left, right)),
            Operator::Like => like(left, right),
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Comparison(op) => op.symbol(),
            Operator::Logical(op) => op.symbol(),
            Operator::Like => "LIKE",
        }
    }

    /// The logical operator, if this is one
    pub fn as_logical(&self) -> Option<LogicalOperator> {
        match self {
            Operator::Logical(op) => Some(*op),
            _ => None,
        }
    }
}

impl FromStr for Operator {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let op = match s {
            "=" => Operator::Comparison(ComparisonOperator::Equal),
            "!=" => Operator::Comparison(ComparisonOperator::NotEqual),
            ">" => Operator::Comparison(ComparisonOperator::GreaterThan),
            ">=" => Operator::Comparison(ComparisonOperator::GreaterThanOrEqual),
            "<" => Operator::Comparison(ComparisonOperator::LessThan),
            "<=" => Operator::Comparison(ComparisonOperator::LessThanOrEqual),
            _ if s.eq_ignore_ascii_case("AND") => Operator::Logical(LogicalOperator::And),
            _ if s.eq_ignore_ascii_case("OR") => Operator::Logical(LogicalOperator::Or),
            _ if s.eq_ignore_ascii_case("LIKE") => Operator::Like,
            _ => return Err(QueryError::UnsupportedOperator(s.to_string())),
        };
        Ok(op)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl From<ComparisonOperator> for Operator {
    fn from(op: ComparisonOperator) -> Self {
        Operator::Comparison(op)
    }
}

impl From<LogicalOperator> for Operator {
    fn from(op: LogicalOperator) -> Self {
        Operator::Logical(op)
    }
}

/// Translate a LIKE pattern into an anchored regular expression.
/// Characters other than `%` and `_` are handed to the regex engine unchanged.
fn like_to_regex(pattern: &str) -> String {
    let mut regex = String::with_capacity(pattern.len() + 8);
    regex.push_str("^(?:");
    for ch in pattern.chars() {
        match ch {
            '%' => regex.push_str(".*"),
            '_' => regex.push('.'),
            _ => regex.push(ch),
        }
    }
    regex.push_str(")$");
    regex
}

/// Compile a LIKE pattern
pub(crate) fn compile_like(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&like_to_regex(pattern))
}

pub(crate) fn invalid_pattern(pattern: &str, source: regex::Error) -> QueryError {
    QueryError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    }
}

fn like(value: &str, pattern: &str) -> QueryResult<bool> {
    let re = compile_like(pattern).map_err(|e| invalid_pattern(pattern, e))?;
    Ok(re.is_match(value))
}
