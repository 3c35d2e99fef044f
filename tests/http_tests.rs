//! In-process HTTP tests for the `/mcp` endpoint
//!
//! Run with: cargo test --test http_tests

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use demo_mcp::catalog::{build_server, WidgetAssets};
use demo_mcp::storage::SnippetStore;
use demo_mcp::transport::{AppState, HttpTransport};
use demo_mcp::types::{ResponseMode, DEFAULT_OWNER_ID};

fn app(mode: ResponseMode) -> (TempDir, SnippetStore, AppState, Router) {
    let dir = tempfile::tempdir().unwrap();
    let store = SnippetStore::open(dir.path().join("snippets.json"));
    let server = build_server(store.clone(), WidgetAssets::default()).unwrap();
    let state = AppState::new(Arc::new(server), mode);
    let router = HttpTransport::router(state.clone());
    (dir, store, state, router)
}

fn post(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/mcp")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::ACCEPT, "application/json, text/event-stream")
        .body(body.into())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_json_mode_round_trip() {
    let (_dir, _store, state, router) = app(ResponseMode::Json);

    let request = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "tools/call",
        "params": {"name": "multiply", "arguments": {"a": 3, "b": 4}}
    });
    let response = router.oneshot(post(request.to_string())).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("application/json"));

    let body = body_json(response).await;
    assert_eq!(body["id"], 1);
    assert_eq!(body["result"]["structuredContent"]["result"], 12);
    assert_eq!(state.sessions().active_count(), 0);
}

#[tokio::test]
async fn test_sse_mode_emits_message_event() {
    let (_dir, _store, _state, router) = app(ResponseMode::Sse);

    let request = json!({"jsonrpc": "2.0", "id": "a", "method": "ping"});
    let response = router.oneshot(post(request.to_string())).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/event-stream"));

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("event: message"));
    let data = text
        .lines()
        .find_map(|l| l.strip_prefix("data: "))
        .expect("data line");
    let payload: Value = serde_json::from_str(data).unwrap();
    assert_eq!(payload["id"], "a");
    assert_eq!(payload["result"], json!({}));
}

#[tokio::test]
async fn test_notification_is_accepted_without_body() {
    let (_dir, _store, _state, router) = app(ResponseMode::Json);

    let request = json!({"jsonrpc": "2.0", "method": "notifications/initialized"});
    let response = router.oneshot(post(request.to_string())).await.unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(bytes.is_empty());
}

#[tokio::test]
async fn test_notification_with_wrong_version_is_still_accepted() {
    let (_dir, _store, _state, router) = app(ResponseMode::Json);

    let request = json!({"jsonrpc": "1.0", "method": "notifications/initialized"});
    let response = router.oneshot(post(request.to_string())).await.unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let (_dir, _store, _state, router) = app(ResponseMode::Json);

    let response = router.oneshot(post("{not json")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], -32700);
}

#[tokio::test]
async fn test_batch_returns_array() {
    let (_dir, store, _state, router) = app(ResponseMode::Json);

    let batch = json!([
        {"jsonrpc": "2.0", "id": 1, "method": "tools/call",
         "params": {"name": "create_snippet",
                    "arguments": {"title": "fib", "language": "py", "code": "def fib()..."}}},
        {"jsonrpc": "2.0", "method": "notifications/initialized"},
        {"jsonrpc": "2.0", "id": 2, "method": "tools/call",
         "params": {"name": "get_snippets"}}
    ]);
    let response = router.oneshot(post(batch.to_string())).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let responses = body.as_array().unwrap();
    assert_eq!(responses.len(), 2);
    assert_eq!(
        responses[1]["result"]["structuredContent"]["snippets"][0]["title"],
        "fib"
    );
    assert_eq!(store.list(DEFAULT_OWNER_ID).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_health_reports_no_lingering_sessions() {
    let (_dir, _store, _state, router) = app(ResponseMode::Json);

    let ping = json!({"jsonrpc": "2.0", "id": 1, "method": "ping"});
    router
        .clone()
        .oneshot(post(ping.to_string()))
        .await
        .unwrap();

    let response = router
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["activeSessions"], 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_http_creates_lose_nothing() {
    let (_dir, store, _state, router) = app(ResponseMode::Json);

    let mut handles = Vec::new();
    for i in 0..32 {
        let router = router.clone();
        handles.push(tokio::spawn(async move {
            let request = json!({
                "jsonrpc": "2.0",
                "id": i,
                "method": "tools/call",
                "params": {"name": "create_snippet",
                           "arguments": {"title": format!("s{i}"), "language": "rs", "code": ""}}
            });
            let response = router.oneshot(post(request.to_string())).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(store.list(DEFAULT_OWNER_ID).await.unwrap().len(), 32);
}
