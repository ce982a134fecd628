//! HTTP endpoint behavior in keyless local mode.

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use hrpulse_core::config::{RootConfig, SecretConfig};
use hrpulse_server::routes::router;
use hrpulse_server::state::AppState;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

fn test_router() -> axum::Router {
    let state = Arc::new(AppState::from_config(
        &RootConfig::default(),
        &SecretConfig::default(),
    ));
    router(state)
}

async fn post_chat(router: axum::Router, body: Value) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/chat")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn greeting_round_trip() {
    let (status, body) = post_chat(test_router(), json!({ "message": "Hello" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["intent"], json!("greeting_simple"));
    assert_eq!(body["data"]["cached"], json!(false));
    assert!(
        body["data"]["message"]
            .as_str()
            .unwrap()
            .contains("Pulse")
    );
}

#[tokio::test]
async fn repeated_greeting_is_served_from_cache() {
    let router = test_router();
    let (_, first) = post_chat(router.clone(), json!({ "message": "Hello" })).await;
    assert_eq!(first["data"]["cached"], json!(false));

    let (_, second) = post_chat(router, json!({ "message": "hello" })).await;
    assert_eq!(second["data"]["cached"], json!(true));
}

#[tokio::test]
async fn empty_message_is_a_validation_error() {
    let (status, body) = post_chat(test_router(), json!({ "message": "   " })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].as_str().unwrap().contains("empty"));
}

#[tokio::test]
async fn health_endpoint_responds() {
    let response = test_router()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn keyless_policy_query_degrades_instead_of_erroring() {
    let (status, body) = post_chat(
        test_router(),
        json!({ "message": "What is the sick leave policy?" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["intent"], json!("policy_query"));
    // No generation backend in keyless mode: the reply is the apology
    // template, not an HTTP error.
    assert!(!body["data"]["message"].as_str().unwrap().is_empty());
}
