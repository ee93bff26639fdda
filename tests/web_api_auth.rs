//! Web API Auth Tests
//!
//! Integration tests for registration, token sessions and service endpoints.

mod common;

use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use serde_json::{json, Value};

use common::{basic, connect, create_test_app, register, signup, TOKEN};

// ============================================================================
// Service endpoints
// ============================================================================

#[tokio::test]
async fn test_status() {
    let app = create_test_app().await;

    let response = app.server.get("/status").await;

    response.assert_status_ok();
    response.assert_json(&json!({ "redis": true, "db": true }));
}

#[tokio::test]
async fn test_stats() {
    let app = create_test_app().await;
    let token = signup(&app.server, "a@x.com", "pw1").await;
    common::create_node_ok(&app.server, &token, json!({ "name": "d", "type": "folder" })).await;

    let response = app.server.get("/stats").await;

    response.assert_status_ok();
    response.assert_json(&json!({ "users": 1, "files": 1 }));
}

// ============================================================================
// POST /users
// ============================================================================

#[tokio::test]
async fn test_register_success() {
    let app = create_test_app().await;

    let response = register(&app.server, "bob@dylan.com", "toto1234!").await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["email"], "bob@dylan.com");
    assert!(body["id"].is_string());
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn test_register_missing_fields() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/users")
        .json(&json!({ "password": "pw" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({ "error": "Missing email" }));

    let response = app
        .server
        .post("/users")
        .json(&json!({ "email": "a@x.com" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({ "error": "Missing password" }));
}

#[tokio::test]
async fn test_register_malformed_body() {
    let app = create_test_app().await;

    let response = app.server.post("/users").text("not json").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({ "error": "Missing email" }));
}

#[tokio::test]
async fn test_register_duplicate() {
    let app = create_test_app().await;
    register(&app.server, "a@x.com", "pw1").await;

    let response = register(&app.server, "a@x.com", "pw2").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({ "error": "Already exist" }));
}

// ============================================================================
// GET /connect, /users/me, /disconnect
// ============================================================================

#[tokio::test]
async fn test_connect_and_me() {
    let app = create_test_app().await;
    let created: Value = register(&app.server, "a@x.com", "pw1").await.json();

    let token = connect(&app.server, "a@x.com", "pw1").await;
    assert_eq!(token.len(), 32);

    let response = app.server.get("/users/me").add_header(TOKEN, token).await;

    response.assert_status_ok();
    response.assert_json(&json!({ "id": created["id"], "email": "a@x.com" }));
}

#[tokio::test]
async fn test_connect_password_with_colon() {
    let app = create_test_app().await;
    register(&app.server, "a@x.com", "p:w:1").await;

    let token = connect(&app.server, "a@x.com", "p:w:1").await;

    assert!(!token.is_empty());
}

#[tokio::test]
async fn test_connect_unauthorized() {
    let app = create_test_app().await;
    register(&app.server, "a@x.com", "pw1").await;

    for header in [
        basic("a@x.com", "wrong"),
        basic("nobody@x.com", "pw1"),
        "Basic !!notbase64".to_string(),
        "Bearer abc".to_string(),
    ] {
        let response = app
            .server
            .get("/connect")
            .add_header(AUTHORIZATION, header)
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        response.assert_json(&json!({ "error": "Unauthorized" }));
    }

    let response = app.server.get("/connect").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_requires_token() {
    let app = create_test_app().await;

    let response = app.server.get("/users/me").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    response.assert_json(&json!({ "error": "Unauthorized" }));

    let response = app
        .server
        .get("/users/me")
        .add_header(TOKEN, "0123456789abcdef0123456789abcdef")
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_disconnect() {
    let app = create_test_app().await;
    let token = signup(&app.server, "a@x.com", "pw1").await;

    let response = app
        .server
        .get("/disconnect")
        .add_header(TOKEN, token.clone())
        .await;
    response.assert_status(StatusCode::NO_CONTENT);
    assert!(response.as_bytes().is_empty());

    let response = app.server.get("/users/me").add_header(TOKEN, token.clone()).await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    // A revoked token no longer resolves, so a second disconnect is 401.
    let response = app.server.get("/disconnect").add_header(TOKEN, token).await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_disconnect_keeps_other_tokens() {
    let app = create_test_app().await;
    let first = signup(&app.server, "a@x.com", "pw1").await;
    let second = connect(&app.server, "a@x.com", "pw1").await;

    app.server
        .get("/disconnect")
        .add_header(TOKEN, first)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    app.server
        .get("/users/me")
        .add_header(TOKEN, second)
        .await
        .assert_status_ok();
}
