//! Paginated result envelope returned to callers.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::paging::{total_pages, PageWindow};

/// Key under which the relevance score is emitted in each result.
pub const SCORE_FIELD: &str = "score";

/// A read-only projection of a stored document plus its relevance score.
///
/// The relevance score owns the `score` key: a stored field with that name is
/// never carried into `fields`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedDocument {
    #[serde(flatten)]
    pub fields: Map<String, JsonValue>,
    pub score: f64,
}

impl ProjectedDocument {
    pub fn new(mut fields: Map<String, JsonValue>, score: f64) -> Self {
        fields.retain(|key, _| key != SCORE_FIELD);
        Self { fields, score }
    }

    pub fn get(&self, field: &str) -> Option<&JsonValue> {
        self.fields.get(field)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultEnvelope {
    pub results: Vec<ProjectedDocument>,
    pub total_count: u64,
    pub current_page: u64,
    pub total_pages: u64,
    pub page_size: u32,
}

impl ResultEnvelope {
    /// Envelope for a search that matched nothing (or was never executed).
    pub fn empty(window: PageWindow) -> Self {
        Self {
            results: Vec::new(),
            total_count: 0,
            current_page: window.page,
            total_pages: 0,
            page_size: window.page_size,
        }
    }

    /// Envelope for one page of results out of `total_count` matches.
    ///
    /// `current_page` always echoes the requested page, even past the last one.
    pub fn from_page(
        window: PageWindow,
        total_count: u64,
        mut results: Vec<ProjectedDocument>,
    ) -> Self {
        if total_count == 0 {
            return Self::empty(window);
        }
        results.truncate(window.page_size as usize);
        Self {
            results,
            total_count,
            current_page: window.page,
            total_pages: total_pages(total_count, window.page_size),
            page_size: window.page_size,
        }
    }
}
