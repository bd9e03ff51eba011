// ABOUTME: Route-level tests for registration, login, and session introspection
// ABOUTME: Drives the axum router directly against an in-memory database
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvolveCoach

#![allow(missing_docs, clippy::unwrap_used)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use evolvecoach::auth::AuthManager;
use evolvecoach::database::Database;
use evolvecoach::routes::{self, ServerResources};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn test_app() -> Router {
    let database = Database::new("sqlite::memory:").await.unwrap();
    let auth = AuthManager::new(b"test-secret", 24);
    let resources = Arc::new(ServerResources::new(database, auth));
    routes::router(&resources)
}

async fn request_json(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = test_app().await;
    let (status, body) = request_json(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_register_login_me_flow() {
    let app = test_app().await;

    let (status, body) = request_json(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "email": "coach@example.com",
            "password": "secret99",
            "full_name": "Alex Coach",
            "user_type": "trainer"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let user_id = body["user_id"].as_str().unwrap().to_owned();

    let (status, body) = request_json(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "coach@example.com", "password": "secret99" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["user_id"], user_id.as_str());
    assert_eq!(body["user"]["user_type"], "trainer");
    let token = body["jwt_token"].as_str().unwrap().to_owned();

    let (status, body) = request_json(&app, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profile"]["email"], "coach@example.com");
    assert_eq!(body["profile"]["full_name"], "Alex Coach");
    // A trainer account carries a trainer extension and no client one
    assert!(body["trainer_profile"].is_object());
    assert!(body["client_profile"].is_null());
}

#[tokio::test]
async fn test_register_validation() {
    let app = test_app().await;

    // Short password
    let (status, body) = request_json(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "email": "user@example.com",
            "password": "short",
            "user_type": "client"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "invalid_input");

    // Malformed email
    let (status, _) = request_json(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "email": "not-an-email",
            "password": "secret99",
            "user_type": "client"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_duplicate_registration_is_rejected() {
    let app = test_app().await;
    let payload = json!({
        "email": "user@example.com",
        "password": "secret99",
        "user_type": "client"
    });

    let (status, _) =
        request_json(&app, "POST", "/api/auth/register", None, Some(payload.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) =
        request_json(&app, "POST", "/api/auth/register", None, Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "invalid_input");
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let app = test_app().await;
    request_json(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "email": "user@example.com",
            "password": "secret99",
            "user_type": "client"
        })),
    )
    .await;

    // Wrong password and unknown email fail identically
    let (status, body) = request_json(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "user@example.com", "password": "wrong99" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "auth_invalid");

    let (status, _) = request_json(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "missing@example.com", "password": "secret99" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_requires_a_valid_token() {
    let app = test_app().await;

    let (status, body) = request_json(&app, "GET", "/api/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "auth_required");

    let (status, body) =
        request_json(&app, "GET", "/api/auth/me", Some("not-a-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "auth_invalid");
}
