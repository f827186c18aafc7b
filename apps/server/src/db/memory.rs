//! In-memory document store
//!
//! Evaluates search plans in process over JSON documents. Used for local
//! development (`database.backend = "memory"`) and by the integration tests.
//! Scoring approximates the Postgres store: a text clause scores higher when
//! the query covers more of the field, exact and prefix clauses score their
//! boost.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use docsearch_plan::{MatchClause, MatchKind, SearchPlan};
use serde_json::Value as JsonValue;
use tokio::sync::RwLock;

use super::string_normalization::{casefold, words};
use super::traits::{DocumentStore, StoreError, StorePage};

#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentStore {
    collections: Arc<RwLock<HashMap<String, Vec<JsonValue>>>>,
    search_calls: Arc<AtomicUsize>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_collections(collections: HashMap<String, Vec<JsonValue>>) -> Self {
        Self {
            collections: Arc::new(RwLock::new(collections)),
            search_calls: Arc::default(),
        }
    }

    /// Load collections from a JSON file shaped `{ "<collection>": [doc, ...] }`.
    pub async fn from_seed_file(path: &Path) -> anyhow::Result<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read seed file {}", path.display()))?;
        let collections: HashMap<String, Vec<JsonValue>> = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid seed file {}", path.display()))?;

        let total: usize = collections.values().map(Vec::len).sum();
        tracing::info!(
            path = %path.display(),
            collections = collections.len(),
            documents = total,
            "Seeded in-memory document store"
        );
        Ok(Self::from_collections(collections))
    }

    pub async fn insert(&self, collection: &str, doc: JsonValue) {
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .push(doc);
    }

    pub async fn insert_many(&self, collection: &str, docs: impl IntoIterator<Item = JsonValue>) {
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .extend(docs);
    }

    /// Number of plans executed so far.
    pub fn search_calls(&self) -> usize {
        self.search_calls.load(AtomicOrdering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn execute_search_plan(
        &self,
        collection: &str,
        plan: &SearchPlan,
    ) -> Result<StorePage, StoreError> {
        self.search_calls.fetch_add(1, AtomicOrdering::SeqCst);

        let collections = self.collections.read().await;
        let Some(docs) = collections.get(collection) else {
            return Ok(StorePage::empty());
        };
        Ok(evaluate(docs, plan))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

fn evaluate(docs: &[JsonValue], plan: &SearchPlan) -> StorePage {
    let id_field = plan.tie_break_field();
    let mut scored: Vec<(f64, Option<String>, &JsonValue)> = docs
        .iter()
        .filter(|doc| plan.visibility.matches(doc))
        .filter_map(|doc| {
            score_document(doc, &plan.clauses).map(|score| (score, id_key(doc, id_field), doc))
        })
        .collect();

    scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| compare_ids(&a.1, &b.1)));

    let total_count = scored.len() as u64;
    let skip = usize::try_from(plan.window.skip).unwrap_or(usize::MAX);
    let documents = scored
        .into_iter()
        .skip(skip)
        .take(plan.window.page_size as usize)
        .map(|(score, _, doc)| plan.projection.project(doc, score))
        .collect();

    StorePage {
        documents,
        total_count,
    }
}

/// Missing identifiers sort last.
fn compare_ids(a: &Option<String>, b: &Option<String>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn id_key(doc: &JsonValue, id_field: &str) -> Option<String> {
    match doc.get(id_field)? {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Null => None,
        other => Some(other.to_string()),
    }
}

/// Sum of boosted clause scores, or `None` when no clause matches.
fn score_document(doc: &JsonValue, clauses: &[MatchClause]) -> Option<f64> {
    let mut total = None;
    for clause in clauses {
        if let Some(score) = score_clause(doc, clause) {
            *total.get_or_insert(0.0) += score * clause.boost;
        }
    }
    total
}

fn score_clause(doc: &JsonValue, clause: &MatchClause) -> Option<f64> {
    let values = field_values(doc, &clause.field);
    match clause.kind {
        MatchKind::Text => {
            let terms = words(&clause.query_text);
            if terms.is_empty() {
                return None;
            }
            let needle = casefold(&clause.query_text);
            values
                .iter()
                .filter_map(|value| text_score(value, &terms, &needle))
                .max_by(f64::total_cmp)
        }
        MatchKind::Exact => {
            let needle = casefold(&clause.query_text);
            values
                .iter()
                .any(|value| casefold(value) == needle)
                .then_some(1.0)
        }
        MatchKind::Prefix => {
            let needle = casefold(&clause.query_text);
            values
                .iter()
                .any(|value| {
                    let value = casefold(value);
                    value.starts_with(&needle)
                        || value.split_whitespace().any(|w| w.starts_with(&needle))
                })
                .then_some(1.0)
        }
    }
}

/// All query terms present as words, or the whole query as a substring.
fn text_score(value: &str, terms: &[String], needle: &str) -> Option<f64> {
    let value_words = words(value);
    if !value_words.is_empty() && terms.iter().all(|t| value_words.contains(t)) {
        let coverage = terms.len() as f64 / value_words.len() as f64;
        return Some(0.5 + 0.5 * coverage.min(1.0));
    }
    casefold(value).contains(needle).then_some(0.25)
}

/// Scalar values at a dotted path; arrays contribute each scalar element.
fn field_values(doc: &JsonValue, path: &str) -> Vec<String> {
    let mut current = doc;
    for segment in path.split('.') {
        match current.get(segment) {
            Some(next) => current = next,
            None => return Vec::new(),
        }
    }
    match current {
        JsonValue::Array(items) => items.iter().filter_map(scalar_text).collect(),
        other => scalar_text(other).into_iter().collect(),
    }
}

fn scalar_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        JsonValue::Null | JsonValue::Array(_) | JsonValue::Object(_) => None,
    }
}
