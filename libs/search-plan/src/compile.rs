//! Search expression compiler.
//!
//! Turns a document type's searchable fields and a free-text query into the
//! ordered clauses of a disjunctive ("should") search expression.

use serde::Serialize;

use crate::descriptor::{MatchKind, SearchableField};

/// One field-scoped condition of the search expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchClause {
    pub field: String,
    pub query_text: String,
    pub kind: MatchKind,
    pub boost: f64,
}

/// Compile one clause per searchable field, in declaration order.
///
/// Returns no clauses when the query is empty after trimming; callers must
/// treat that as "nothing to search" rather than "match everything".
pub fn compile(fields: &[SearchableField], query_text: &str) -> Vec<MatchClause> {
    let query_text = query_text.trim();
    if query_text.is_empty() {
        return Vec::new();
    }

    fields
        .iter()
        .map(|field| MatchClause {
            field: field.path.clone(),
            query_text: query_text.to_string(),
            kind: field.kind,
            boost: field.boost,
        })
        .collect()
}
