// Union Operator Implementation
//
// Merges the primary result with the results of its sibling queries.

use std::collections::HashSet;

use crate::query::ast::UnionType;
use crate::query::executor::result::{QueryError, QueryResult, ResultRows};

/// Merges result sets produced by UNION / UNION ALL siblings
pub struct UnionOperator {
    kind: UnionType,
}

impl UnionOperator {
    pub fn new(kind: UnionType) -> Self {
        UnionOperator { kind }
    }

    /// Merge sibling results into the primary one. The primary header is kept;
    /// sibling headers are dropped. Every sibling must be as wide as the primary.
    pub fn merge(&self, primary: ResultRows, siblings: Vec<ResultRows>) -> QueryResult<ResultRows> {
        let mut primary = primary.into_iter();
        let Some(header) = primary.next() else {
            return Ok(Vec::new());
        };

        let expected = header.len();
        for sibling in &siblings {
            if let Some(sibling_header) = sibling.first() {
                if sibling_header.len() != expected {
                    return Err(QueryError::ColumnCountMismatch {
                        expected,
                        found: sibling_header.len(),
                    });
                }
            }
        }

        let data = primary.chain(siblings.into_iter().flat_map(|rows| rows.into_iter().skip(1)));
        let mut merged = vec![header];

        match self.kind {
            UnionType::All => merged.extend(data),
            UnionType::Distinct => {
                let mut seen = HashSet::new();
                merged.extend(data.filter(|row| seen.insert(row_key(row))));
            }
        }

        Ok(merged)
    }
}

/// Dedup key: trimmed cells joined with `|`
fn row_key(row: &[String]) -> String {
    row.iter().map(|cell| cell.trim()).collect::<Vec<_>>().join("|")
}
