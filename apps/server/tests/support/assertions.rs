use anyhow::Context as _;
use axum::{body::Bytes, http::StatusCode};
use serde_json::Value;

pub fn assert_status(actual: StatusCode, expected: StatusCode, context: &str) {
    assert_eq!(actual, expected, "{context}: unexpected status");
}

pub fn json_body(body: &Bytes) -> anyhow::Result<Value> {
    serde_json::from_slice(body).context("parse JSON response body")
}

/// Assert the envelope counters and return the result documents.
pub fn assert_envelope<'a>(
    envelope: &'a Value,
    total_count: u64,
    current_page: u64,
    total_pages: u64,
    page_size: u64,
) -> anyhow::Result<&'a Vec<Value>> {
    assert_eq!(envelope["totalCount"].as_u64(), Some(total_count), "totalCount");
    assert_eq!(envelope["currentPage"].as_u64(), Some(current_page), "currentPage");
    assert_eq!(envelope["totalPages"].as_u64(), Some(total_pages), "totalPages");
    assert_eq!(envelope["pageSize"].as_u64(), Some(page_size), "pageSize");
    envelope["results"].as_array().context("results is array")
}

pub fn result_ids(envelope: &Value) -> Vec<String> {
    envelope["results"]
        .as_array()
        .map(|results| {
            results
                .iter()
                .filter_map(|r| r["_id"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// Assert a `{"error":{"kind","message"}}` body and return the message.
pub fn assert_error_kind(body: &Bytes, kind: &str) -> anyhow::Result<String> {
    let value = json_body(body)?;
    assert_eq!(value["error"]["kind"].as_str(), Some(kind), "error kind in {value}");
    value["error"]["message"]
        .as_str()
        .map(str::to_string)
        .context("error.message is string")
}
