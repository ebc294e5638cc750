// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Request validation tests.
//!
//! These run against an offline store, so any request that reaches the store
//! fails with a 500. A 400 proves the request was rejected up front.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;

mod common;
use common::{create_test_app, send};

#[tokio::test]
async fn test_malformed_object_id_rejected() {
    let (app, _) = create_test_app();

    for (method, uri) in [
        ("GET", "/api/challenges/not-an-id"),
        ("DELETE", "/api/challenges/12345"),
        ("GET", "/api/events/xyz"),
        ("DELETE", "/api/blogs/zzzzzzzzzzzzzzzzzzzzzzzz"),
        ("POST", "/api/blogs/nope/like"),
    ] {
        let (status, body) = send(&app, method, uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{} {}", method, uri);
        assert_eq!(body["error"], "bad_request");
    }
}

#[tokio::test]
async fn test_malformed_id_rejected_before_body() {
    let (app, _) = create_test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/challenges/join/bad-id",
        Some(json!({ "userId": "jane@example.com" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("Invalid id"));
}

#[tokio::test]
async fn test_join_requires_user_id() {
    let (app, _) = create_test_app();
    let uri = "/api/challenges/join/65a4f0c2e13b9a0012345678";

    let (status, _) = send(&app, "POST", uri, Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "POST", uri, Some(json!({ "userId": "  " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_json_body() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/challenges")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_non_object_body_rejected() {
    let (app, _) = create_test_app();

    let (status, _) = send(&app, "POST", "/api/tips", Some(json!(["a", "b"]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_zero_page_rejected() {
    let (app, _) = create_test_app();

    let (status, body) = send(&app, "GET", "/api/challenges?page=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Page must be greater than 0");

    let (status, _) = send(&app, "GET", "/api/blogs?limit=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_dashboard_requires_email() {
    let (app, _) = create_test_app();

    for uri in [
        "/api/dashboard/user-stats",
        "/api/dashboard/user-stats?email=",
        "/api/dashboard/user-charts?email=%20",
    ] {
        let (status, _) = send(&app, "GET", uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
    }
}

#[tokio::test]
async fn test_user_creation_requires_email() {
    let (app, _) = create_test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/users",
        Some(json!({ "displayName": "Jane" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "email is required");
}
