//! HTTP Session Tests
//!
//! The reqwest-backed session against a local mock server:
//! - bearer token on every request
//! - `data` envelope unwrapping
//! - Directus error bodies surface as readable messages
//! - retries stop at the configured attempt count

mod common;

use directus_client::session::{
    ClientConfig, FileUpload, Request, RetryPolicy, Session, SessionError, Transport,
};
use directus_client::{Directus, Error};
use httpmock::prelude::*;
use serde_json::json;

const TOKEN: &str = "secret-token";

fn config(server: &MockServer) -> ClientConfig {
    ClientConfig::new(server.base_url(), TOKEN).with_retry(RetryPolicy {
        max_attempts: 2,
        base_delay_ms: 1,
        max_delay_ms: 1,
    })
}

async fn health(server: &MockServer) {
    server
        .mock_async(|when, then| {
            when.method(GET).path("/server/health");
            then.status(200).json_body(json!({"status": "ok"}));
        })
        .await;
}

// =============================================================================
// Requests
// =============================================================================

#[tokio::test]
async fn test_bearer_token_and_envelope() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/items/books")
                .query_param("limit", "1")
                .header("authorization", format!("Bearer {}", TOKEN));
            then.status(200)
                .json_body(json!({"data": [{"id": 1, "title": "I, Robot"}]}));
        })
        .await;

    let session = Session::new(&config(&server)).unwrap();
    let resp = session
        .send(Request::get("items/books").with_params([("limit", "1")]))
        .await
        .unwrap();

    assert_eq!(resp.status, 200);
    assert!(resp.duration_ms >= 1);
    assert_eq!(resp.data, json!([{"id": 1, "title": "I, Robot"}]));
}

#[tokio::test]
async fn test_error_body_message() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/collections/secret");
            then.status(403).json_body(json!({
                "errors": [{"message": "You don't have permission to access this.", "extensions": {"code": "FORBIDDEN"}}]
            }));
        })
        .await;

    let session = Session::new(&config(&server)).unwrap();
    let err = session.get("collections/secret").await.unwrap_err();

    assert_eq!(err.status_code(), Some(403));
    assert!(!err.is_retryable());
    assert_eq!(
        err.to_string(),
        "HTTP 403: You don't have permission to access this."
    );
}

#[tokio::test]
async fn test_unavailable_is_retried_then_reported() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/items/books");
            then.status(503).body("Service Unavailable");
        })
        .await;

    let session = Session::new(&config(&server)).unwrap();
    let err = session.get("items/books").await.unwrap_err();

    assert!(matches!(err, SessionError::Status { status: 503, .. }));
    assert!(err.is_retryable());
    mock.assert_hits_async(2).await;
}

#[tokio::test]
async fn test_client_error_is_sent_once() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/items/missing");
            then.status(404).json_body(json!({"errors": [{"message": "Route doesn't exist."}]}));
        })
        .await;

    let session = Session::new(&config(&server)).unwrap();
    let err = session.get("items/missing").await.unwrap_err();

    assert_eq!(err.status_code(), Some(404));
    mock.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_post_sends_json_body() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/items/books")
                .json_body(json!({"title": "Foundation"}));
            then.status(200)
                .json_body(json!({"data": {"id": 4, "title": "Foundation"}}));
        })
        .await;

    let session = Session::new(&config(&server)).unwrap();
    let resp = session
        .send(Request::post("items/books", json!({"title": "Foundation"})))
        .await
        .unwrap();
    assert_eq!(resp.data["id"], json!(4));
}

#[tokio::test]
async fn test_empty_body_is_null() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(DELETE).path("/items/books/4");
            then.status(204);
        })
        .await;

    let session = Session::new(&config(&server)).unwrap();
    let resp = session.send(Request::delete("items/books/4")).await.unwrap();
    assert!(resp.data.is_null());
    assert!(resp.is_empty());
}

// =============================================================================
// Files
// =============================================================================

#[tokio::test]
async fn test_multipart_upload_and_download() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/files");
            then.status(200).json_body(json!({"data": {
                "id": "7c3f3e74-9f4d-4a5c-9b2e-7d8f9a0b1c23",
                "filename_download": "notes.txt"
            }}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/assets/7c3f3e74-9f4d-4a5c-9b2e-7d8f9a0b1c23")
                .query_param("width", "64");
            then.status(200).body("raw bytes");
        })
        .await;

    let session = Session::new(&config(&server)).unwrap();
    let fields = vec![("title".to_string(), "Notes".to_string())];
    let resp = session
        .upload("files", &fields, FileUpload::new("notes.txt", b"hello".to_vec()))
        .await
        .unwrap();
    assert_eq!(resp.data["filename_download"], json!("notes.txt"));

    let bytes = session
        .download(
            "assets/7c3f3e74-9f4d-4a5c-9b2e-7d8f9a0b1c23",
            &[("width".to_string(), "64".to_string())],
        )
        .await
        .unwrap();
    assert_eq!(bytes, b"raw bytes");
}

// =============================================================================
// Client
// =============================================================================

#[tokio::test]
async fn test_connect_and_list_collections() {
    let server = MockServer::start_async().await;
    health(&server).await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/collections");
            then.status(200).json_body(common::fixture("collections"));
        })
        .await;

    let client = Directus::connect(config(&server)).await.unwrap();
    assert!(client.ping().await.unwrap() >= 1);
    assert_eq!(
        client.collection_names(false).await.unwrap(),
        vec!["books", "settings"]
    );
}

#[tokio::test]
async fn test_connect_with_failing_health_check() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/server/health");
            then.status(401).json_body(json!({"errors": [{"message": "Invalid user credentials."}]}));
        })
        .await;

    let err = Directus::connect(config(&server)).await.unwrap_err();
    assert!(matches!(err, Error::Session(SessionError::Unreachable { .. })));
    let message = err.to_string();
    assert!(message.contains(&server.base_url()));
    assert!(message.contains("secre..."));
    assert!(message.contains("Invalid user credentials."));
}
