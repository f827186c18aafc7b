//! SQL query builder for document searches.
//!
//! Compiles a [`SearchPlan`] into a single Postgres statement over
//! `documents(collection, doc JSONB)`:
//! - `matched`: rows of the collection matching any clause and the visibility
//!   predicate, with their summed score
//! - `page`: the ordered `OFFSET/LIMIT` slice of `matched`
//! - the final select left-joins the page onto `COUNT(*)` of `matched`, so a
//!   page past the end still reports the total
//!
//! Every field name and value is a bound parameter.

use docsearch_plan::{MatchClause, MatchKind, SearchPlan, VisibilityPredicate};

/// Minimum `word_similarity` for a fuzzy text match.
pub const TEXT_SIMILARITY_THRESHOLD: f64 = 0.3;

/// Bind values for `sqlx` queries.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Text(String),
    TextArray(Vec<String>),
    Int(i64),
    Float(f64),
}

fn push_text(bind_params: &mut Vec<BindValue>, value: String) -> usize {
    bind_params.push(BindValue::Text(value));
    bind_params.len()
}

fn push_text_array(bind_params: &mut Vec<BindValue>, value: Vec<String>) -> usize {
    bind_params.push(BindValue::TextArray(value));
    bind_params.len()
}

fn push_int(bind_params: &mut Vec<BindValue>, value: i64) -> usize {
    bind_params.push(BindValue::Int(value));
    bind_params.len()
}

fn push_float(bind_params: &mut Vec<BindValue>, value: f64) -> usize {
    bind_params.push(BindValue::Float(value));
    bind_params.len()
}

/// Split a dotted field path into `#>` path segments.
pub fn json_path(field: &str) -> Vec<String> {
    field.split('.').map(str::to_string).collect()
}

/// Escape SQL LIKE meta-characters so user input is treated literally.
pub fn escape_like_pattern(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' | '%' | '_' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

/// Builds the search statement for one collection and plan.
#[derive(Debug, Clone)]
pub struct SearchQuery<'a> {
    collection: &'a str,
    plan: &'a SearchPlan,
}

impl<'a> SearchQuery<'a> {
    pub fn new(collection: &'a str, plan: &'a SearchPlan) -> Self {
        Self { collection, plan }
    }

    /// Returns the statement and its bind values in placeholder order.
    ///
    /// Result columns: `total_count BIGINT`, `doc JSONB` and
    /// `score FLOAT8`; `doc`/`score` are NULL on the single row returned when
    /// the page is empty.
    pub fn build_sql(&self) -> (String, Vec<BindValue>) {
        let mut bind_params = Vec::new();

        let collection_idx = push_text(&mut bind_params, self.collection.to_string());

        let mut matches = Vec::with_capacity(self.plan.clauses.len());
        let mut scores = Vec::with_capacity(self.plan.clauses.len());
        for clause in &self.plan.clauses {
            let (matched, score) = clause_sql(clause, &mut bind_params);
            scores.push(format!("CASE WHEN {matched} THEN {score} ELSE 0 END"));
            matches.push(matched);
        }

        let visibility = visibility_sql(&self.plan.visibility, &mut bind_params);
        let id_idx = push_text(&mut bind_params, self.plan.tie_break_field().to_string());
        let offset_idx = push_int(
            &mut bind_params,
            i64::try_from(self.plan.window.skip).unwrap_or(i64::MAX),
        );
        let limit_idx = push_int(&mut bind_params, i64::from(self.plan.window.page_size));

        let sql = format!(
            "WITH matched AS (\
             SELECT d.doc, d.doc ->> ${id_idx} AS doc_id, ({score})::float8 AS score \
             FROM documents d \
             WHERE d.collection = ${collection_idx} AND ({matches}) AND {visibility}\
             ), page AS (\
             SELECT doc, doc_id, score FROM matched \
             ORDER BY score DESC, doc_id ASC NULLS LAST \
             OFFSET ${offset_idx} LIMIT ${limit_idx}\
             ) \
             SELECT c.total_count, p.doc, p.score \
             FROM (SELECT COUNT(*) AS total_count FROM matched) c \
             LEFT JOIN page p ON TRUE \
             ORDER BY p.score DESC, p.doc_id ASC NULLS LAST",
            score = scores.join(" + "),
            matches = matches.join(" OR "),
        );

        (sql, bind_params)
    }
}

/// Returns `(match predicate, score expression)` for one clause.
fn clause_sql(clause: &MatchClause, bind_params: &mut Vec<BindValue>) -> (String, String) {
    let path_idx = push_text_array(bind_params, json_path(&clause.field));
    let boost_idx = push_float(bind_params, clause.boost);

    match clause.kind {
        MatchKind::Text => {
            let query_idx = push_text(bind_params, clause.query_text.clone());
            let threshold_idx = push_float(bind_params, TEXT_SIMILARITY_THRESHOLD);
            let value = format!("coalesce(d.doc #>> ${path_idx}, '')");
            let tsvector = format!("to_tsvector('simple', {value})");
            let tsquery = format!("plainto_tsquery('simple', ${query_idx})");
            let similarity = format!("word_similarity(${query_idx}, {value})");
            (
                format!("({tsvector} @@ {tsquery} OR {similarity} >= ${threshold_idx})"),
                format!(
                    "${boost_idx}::float8 * GREATEST(ts_rank_cd({tsvector}, {tsquery}), {similarity})"
                ),
            )
        }
        MatchKind::Exact => {
            let query_idx = push_text(bind_params, clause.query_text.clone());
            let matched = scalar_or_element(path_idx, |v| format!("lower({v}) = lower(${query_idx})"));
            (matched, format!("${boost_idx}::float8"))
        }
        MatchKind::Prefix => {
            let escaped = escape_like_pattern(&clause.query_text);
            let start_idx = push_text(bind_params, format!("{escaped}%"));
            let word_idx = push_text(bind_params, format!("% {escaped}%"));
            let matched = scalar_or_element(path_idx, |v| {
                format!(
                    "({v} ILIKE ${start_idx} ESCAPE E'\\\\' OR {v} ILIKE ${word_idx} ESCAPE E'\\\\')"
                )
            });
            (matched, format!("${boost_idx}::float8"))
        }
    }
}

/// Apply `predicate` to the value at a path, or to any element when the
/// value is an array. Missing values never match.
fn scalar_or_element(path_idx: usize, predicate: impl Fn(&str) -> String) -> String {
    format!(
        "(CASE jsonb_typeof(d.doc #> ${path_idx}) \
         WHEN 'array' THEN EXISTS (SELECT 1 FROM jsonb_array_elements_text(d.doc #> ${path_idx}) AS e(v) WHERE {element}) \
         ELSE coalesce({scalar}, false) END)",
        element = predicate("e.v"),
        scalar = predicate(&format!("(d.doc #>> ${path_idx})")),
    )
}

fn visibility_sql(predicate: &VisibilityPredicate, bind_params: &mut Vec<BindValue>) -> String {
    match predicate {
        VisibilityPredicate::PublicOnly { public_field } => {
            let public_idx = push_text(bind_params, public_field.clone());
            format!("(d.doc -> ${public_idx}) = 'true'::jsonb")
        }
        VisibilityPredicate::OwnerOrPublic {
            owner_field,
            owner,
            public_field,
        } => {
            let owner_field_idx = push_text(bind_params, owner_field.clone());
            let owner_idx = push_text(bind_params, owner.clone());
            let public_idx = push_text(bind_params, public_field.clone());
            format!(
                "((d.doc -> ${owner_field_idx}) = to_jsonb(${owner_idx}::text) \
                 OR (d.doc -> ${public_idx}) = 'true'::jsonb)"
            )
        }
    }
}
