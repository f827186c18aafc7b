//! Paging behaviour of `GET /api/documents/search`
//!
//! Tests cover:
//! - First page counters for an anonymous caller
//! - Page size defaulting and clamping to the descriptor maximum
//! - Pages past the end echo the requested page with no results
//! - Lenient handling of malformed page parameters
//! - Non-positive page and page size clamp to 1
//! - Empty queries short-circuit without a store call

#![allow(unused)]
#[allow(unused)]
mod support;

use axum::http::StatusCode;
use std::collections::HashSet;
use support::*;

#[tokio::test]
async fn first_page_for_anonymous_caller() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let (status, _headers, body) = app
        .get("/api/documents/search?q=rust&configType=articles&page=1")
        .await?;
    assert_status(status, StatusCode::OK, "search");

    let envelope = json_body(&body)?;
    let results = assert_envelope(&envelope, PUBLIC_RUST_ARTICLES, 1, 3, 10)?;
    assert_eq!(results.len(), 10);
    assert_eq!(app.store_calls(), 1);
    Ok(())
}

#[tokio::test]
async fn results_carry_projection_and_score() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let (_, _, body) = app
        .get("/api/documents/search?q=rust&configType=articles&pageSize=1")
        .await?;
    let envelope = json_body(&body)?;
    let first = &envelope["results"][0];

    assert_eq!(first["_id"], "p00");
    assert_eq!(first["title"], "learning rust");
    assert_eq!(first["userId"], "carol");
    assert!(first["score"].as_f64().is_some_and(|s| s > 0.0));
    assert!(first.get("body").is_none(), "unprojected field leaked: {first}");
    Ok(())
}

#[tokio::test]
async fn pages_are_disjoint_and_cover_every_match() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let mut seen = HashSet::new();
    for page in 1..=3 {
        let (_, _, body) = app
            .get(&format!(
                "/api/documents/search?q=rust&configType=articles&page={page}"
            ))
            .await?;
        let envelope = json_body(&body)?;
        for id in result_ids(&envelope) {
            assert!(seen.insert(id.clone()), "{id} returned twice");
        }
    }
    assert_eq!(seen.len() as u64, PUBLIC_RUST_ARTICLES);
    Ok(())
}

#[tokio::test]
async fn last_page_is_partial() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let (_, _, body) = app
        .get("/api/documents/search?q=rust&configType=articles&page=3")
        .await?;
    let envelope = json_body(&body)?;
    let results = assert_envelope(&envelope, PUBLIC_RUST_ARTICLES, 3, 3, 10)?;
    assert_eq!(results.len(), 3);
    Ok(())
}

#[tokio::test]
async fn page_past_the_end_is_not_an_error() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let (status, _, body) = app
        .get("/api/documents/search?q=python&configType=articles&page=5&pageSize=10")
        .await?;
    assert_status(status, StatusCode::OK, "page past end");

    let envelope = json_body(&body)?;
    let results = assert_envelope(&envelope, 1, 5, 1, 10)?;
    assert!(results.is_empty());
    Ok(())
}

#[tokio::test]
async fn page_size_is_clamped_to_descriptor_maximum() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let (_, _, body) = app
        .get("/api/documents/search?q=rust&configType=articles&pageSize=500")
        .await?;
    let envelope = json_body(&body)?;
    let results = assert_envelope(&envelope, PUBLIC_RUST_ARTICLES, 1, 1, 50)?;
    assert_eq!(results.len() as u64, PUBLIC_RUST_ARTICLES);
    Ok(())
}

#[tokio::test]
async fn non_positive_page_and_size_clamp_to_one() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let (_, _, body) = app
        .get("/api/documents/search?q=rust&configType=articles&page=0&pageSize=-4")
        .await?;
    let envelope = json_body(&body)?;
    let results = assert_envelope(&envelope, PUBLIC_RUST_ARTICLES, 1, PUBLIC_RUST_ARTICLES, 1)?;
    assert_eq!(results.len(), 1);
    Ok(())
}

#[tokio::test]
async fn malformed_numbers_are_treated_as_absent() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let (status, _, body) = app
        .get("/api/documents/search?q=rust&configType=articles&page=two&pageSize=lots")
        .await?;
    assert_status(status, StatusCode::OK, "malformed paging");
    let envelope = json_body(&body)?;
    assert_envelope(&envelope, PUBLIC_RUST_ARTICLES, 1, 3, 10)?;
    Ok(())
}

#[tokio::test]
async fn fractional_page_is_truncated() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let (_, _, body) = app
        .get("/api/documents/search?q=rust&configType=articles&page=2.7")
        .await?;
    let envelope = json_body(&body)?;
    assert_envelope(&envelope, PUBLIC_RUST_ARTICLES, 2, 3, 10)?;
    Ok(())
}

#[tokio::test]
async fn empty_query_short_circuits() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let (status, _, body) = app
        .get("/api/documents/search?q=&configType=articles&page=2")
        .await?;
    assert_status(status, StatusCode::OK, "empty query");

    let envelope = json_body(&body)?;
    let results = assert_envelope(&envelope, 0, 2, 0, 10)?;
    assert!(results.is_empty());
    assert_eq!(app.store_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn whitespace_query_short_circuits_even_with_broken_identity() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let (status, _, body) = app
        .get_as(BROKEN_IDENTITY, "/api/documents/search?q=%20%20&configType=articles")
        .await?;
    assert_status(status, StatusCode::OK, "blank query");
    assert_envelope(&json_body(&body)?, 0, 1, 0, 10)?;
    assert_eq!(app.store_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn descriptor_defaults_apply_per_document_type() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let (_, _, body) = app
        .get("/api/documents/search?q=report&configType=templates&pageSize=99")
        .await?;
    let envelope = json_body(&body)?;
    assert_eq!(envelope["pageSize"], 5);

    let (_, _, body) = app
        .get("/api/documents/search?q=report&configType=templates")
        .await?;
    assert_eq!(json_body(&body)?["pageSize"], 2);
    Ok(())
}
