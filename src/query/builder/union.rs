// UNION clause construction
//
// Sibling builders are built when they are attached; a sibling that fails to
// build hands its error to this builder.

use super::QueryBuilder;
use crate::query::ast::{UnionClause, UnionType};
use crate::query::executor::result::QueryError;

impl QueryBuilder {
    /// UNION with another query, dropping duplicate rows.
    ///
    /// The first union call fixes the kind for the whole query: adding a UNION ALL
    /// sibling afterwards is an `InvalidQuery` error reported by `build()`.
    pub fn union(self, other: QueryBuilder) -> Self {
        self.add_union(other, UnionType::Distinct)
    }

    /// UNION ALL with another query, keeping duplicate rows.
    ///
    /// Mixing with `union` on the same builder is an `InvalidQuery` error; whichever
    /// kind is added first wins.
    pub fn union_all(self, other: QueryBuilder) -> Self {
        self.add_union(other, UnionType::All)
    }

    fn add_union(self, other: QueryBuilder, kind: UnionType) -> Self {
        self.apply(|b| {
            let sibling = other.build()?;
            if let Some(union) = b.union.as_mut() {
                if union.kind != kind {
                    return Err(QueryError::InvalidQuery(format!(
                        "cannot mix {} and {} in one query",
                        union.kind, kind
                    )));
                }
                union.queries.push(sibling);
            } else {
                b.union = Some(UnionClause {
                    kind,
                    queries: vec![sibling],
                });
            }
            Ok(())
        })
    }
}
