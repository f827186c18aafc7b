//! Search handlers
//!
//! - `GET /api/documents/search?q=&configType=&page=&pageSize=&publicOnly=`
//! - `GET /api/documents/search/configs`

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension,
    http::HeaderMap,
    Json,
};
use docsearch_plan::{ResultEnvelope, SearchableField};
use serde::{Deserialize, Serialize};

use crate::{
    auth::resolve_identity,
    request_context::RequestContext,
    services::SearchRequest,
    state::AppState,
    Error, Result,
};

/// Raw query parameters. Numbers and flags stay strings so that malformed
/// values can be treated as absent instead of rejected.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub q: Option<String>,
    pub config_type: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub public_only: Option<String>,
}

impl SearchParams {
    pub fn into_request(self) -> Result<SearchRequest> {
        let query_text = self
            .q
            .ok_or_else(|| Error::InvalidRequest("Missing required parameter: q".to_string()))?;
        let document_type = self
            .config_type
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                Error::InvalidRequest("Missing required parameter: configType".to_string())
            })?;

        Ok(SearchRequest {
            document_type,
            query_text,
            page: lenient_int(self.page.as_deref()),
            page_size: lenient_int(self.page_size.as_deref()),
            public_only: parse_flag(self.public_only.as_deref()),
        })
    }
}

/// Leading integer of a numeric parameter; anything unparseable is absent.
fn lenient_int(raw: Option<&str>) -> Option<i64> {
    let raw = raw?.trim();
    if let Ok(n) = raw.parse::<i64>() {
        return Some(n);
    }
    raw.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(|f| f.trunc() as i64)
}

fn parse_flag(raw: Option<&str>) -> bool {
    raw.is_some_and(|v| v.eq_ignore_ascii_case("true") || v == "1")
}

/// `GET /api/documents/search`
pub async fn search_documents(
    State(state): State<AppState>,
    context: Option<Extension<RequestContext>>,
    headers: HeaderMap,
    params: std::result::Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<ResultEnvelope>> {
    let Query(params) = params.map_err(|e| Error::InvalidRequest(e.body_text()))?;
    let request = params.into_request()?;

    let identity = resolve_identity(state.identity.as_ref(), &headers);
    match state.search_service.search(request, identity).await {
        Ok(envelope) => Ok(Json(envelope)),
        Err(err) => {
            let request_id = context.as_ref().map(|Extension(c)| c.request_id.as_str());
            tracing::warn!(
                request_id = request_id.unwrap_or("-"),
                kind = err.kind(),
                "Search request rejected"
            );
            Err(err)
        }
    }
}

/// Public view of one configured document type.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentTypeSummary {
    pub document_type: String,
    pub collection: String,
    pub index: String,
    pub searchable_fields: Vec<SearchableField>,
    pub summary_fields: Vec<String>,
    pub default_page_size: u32,
    pub max_page_size: u32,
}

/// `GET /api/documents/search/configs`
pub async fn list_document_types(State(state): State<AppState>) -> Json<Vec<DocumentTypeSummary>> {
    let summaries = state
        .search_service
        .catalog()
        .iter()
        .map(|d| DocumentTypeSummary {
            document_type: d.document_type.clone(),
            collection: d.collection.clone(),
            index: d.index.clone(),
            searchable_fields: d.searchable_fields.clone(),
            summary_fields: d.summary_fields.clone(),
            default_page_size: d.default_page_size,
            max_page_size: d.max_page_size,
        })
        .collect();
    Json(summaries)
}
