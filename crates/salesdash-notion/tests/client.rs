//! Integration tests for `NotionClient` using wiremock HTTP mocks.
//!
//! Each test stands up a local server, so no real network traffic is made.
//! Covers the happy paths (empty, single page, multi-page) and every way a
//! fetch can end early.

use salesdash_core::PipelineStage;
use salesdash_notion::{NotionClient, NotionError};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DATABASE_ID: &str = "db-1";
const QUERY_PATH: &str = "/databases/db-1/query";

fn test_client(base_url: &str) -> NotionClient {
    NotionClient::with_base_url("secret_test", 5, base_url)
        .expect("client construction should not fail")
}

fn row(id: &str, status: &str) -> serde_json::Value {
    json!({
        "object": "page",
        "id": id,
        "properties": {
            "Statut": { "id": "s", "type": "select", "select": { "name": status } }
        }
    })
}

fn list(results: Vec<serde_json::Value>, next_cursor: Option<&str>) -> serde_json::Value {
    json!({
        "object": "list",
        "results": results,
        "has_more": next_cursor.is_some(),
        "next_cursor": next_cursor
    })
}

// ---------------------------------------------------------------------------
// Happy paths
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_all_returns_empty_vec_for_empty_database() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(list(vec![], None)))
        .expect(1)
        .mount(&server)
        .await;

    let pages = test_client(&server.uri())
        .fetch_all(DATABASE_ID)
        .await
        .expect("should fetch");

    assert!(pages.is_empty());
}

#[tokio::test]
async fn fetch_all_sends_auth_version_and_page_size() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .and(header("authorization", "Bearer secret_test"))
        .and(header("notion-version", "2022-06-28"))
        .and(body_partial_json(json!({ "page_size": 100 })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(list(vec![row("p1", "Prospect")], None)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let pages = test_client(&server.uri())
        .fetch_all(DATABASE_ID)
        .await
        .expect("headers and body should match");

    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].id, "p1");
}

#[tokio::test]
async fn fetch_all_follows_cursor_across_pages_in_order() {
    let server = MockServer::start().await;

    // Second page: only matches once the cursor from page one is sent back.
    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .and(body_partial_json(json!({ "start_cursor": "cursor-2" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(list(vec![row("p3", "Visité")], None)),
        )
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(list(
            vec![row("p1", "Prospect"), row("p2", "Qualifié")],
            Some("cursor-2"),
        )))
        .with_priority(2)
        .expect(1)
        .mount(&server)
        .await;

    let pages = test_client(&server.uri())
        .fetch_all(DATABASE_ID)
        .await
        .expect("should fetch both pages");

    let ids: Vec<&str> = pages.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["p1", "p2", "p3"]);
}

#[tokio::test]
async fn fetch_all_stops_when_more_pages_reported_without_cursor() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "results": [row("p1", "Prospect")],
            "has_more": true,
            "next_cursor": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let pages = test_client(&server.uri())
        .fetch_all(DATABASE_ID)
        .await
        .expect("should stop cleanly");

    assert_eq!(pages.len(), 1);
}

#[tokio::test]
async fn fetch_prospects_normalizes_rows() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(list(
            vec![row("p1", "Contrat signé"), row("p2", "Réponse négative")],
            None,
        )))
        .mount(&server)
        .await;

    let prospects = test_client(&server.uri())
        .fetch_prospects(DATABASE_ID)
        .await
        .expect("should fetch prospects");

    assert_eq!(prospects.len(), 2);
    assert_eq!(prospects[0].status, Some(PipelineStage::Signed));
    assert_eq!(prospects[1].status, Some(PipelineStage::Declined));
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn api_error_envelope_is_surfaced() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "object": "error",
            "status": 401,
            "code": "unauthorized",
            "message": "API token is invalid."
        })))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .fetch_all(DATABASE_ID)
        .await
        .expect_err("401 should fail");

    assert!(
        matches!(err, NotionError::Api { status: 401, ref code, .. } if code == "unauthorized"),
        "expected Api(401, unauthorized), got: {err:?}"
    );
    assert!(err.to_string().contains("API token is invalid."));
}

#[tokio::test]
async fn failure_mid_pagination_discards_earlier_pages() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .and(body_partial_json(json!({ "start_cursor": "cursor-2" })))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "object": "error",
            "status": 500,
            "code": "internal_server_error",
            "message": "Unexpected error."
        })))
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(list(vec![row("p1", "Prospect")], Some("cursor-2"))),
        )
        .with_priority(2)
        .mount(&server)
        .await;

    let result = test_client(&server.uri()).fetch_all(DATABASE_ID).await;

    assert!(
        matches!(result, Err(NotionError::Api { status: 500, .. })),
        "expected Api(500), got: {result:?}"
    );
}

#[tokio::test]
async fn malformed_body_is_a_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let result = test_client(&server.uri()).fetch_all(DATABASE_ID).await;

    assert!(
        matches!(result, Err(NotionError::Deserialize { .. })),
        "expected Deserialize, got: {result:?}"
    );
}

#[tokio::test]
async fn cycling_cursor_hits_pagination_limit() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(list(vec![row("p1", "Prospect")], Some("same-cursor"))),
        )
        .expect(3)
        .mount(&server)
        .await;

    let result = test_client(&server.uri())
        .with_max_pages(3)
        .fetch_all(DATABASE_ID)
        .await;

    assert!(
        matches!(
            result,
            Err(NotionError::PaginationLimit { max_pages: 3, ref database_id }) if database_id == DATABASE_ID
        ),
        "expected PaginationLimit, got: {result:?}"
    );
}

#[tokio::test]
async fn unreachable_server_is_an_http_error() {
    let client = test_client("http://127.0.0.1:9");
    let result = client.fetch_all(DATABASE_ID).await;
    assert!(
        matches!(result, Err(NotionError::Http(_))),
        "expected Http error, got: {result:?}"
    );
}
