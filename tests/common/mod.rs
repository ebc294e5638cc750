// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use ecotrack_api::config::Config;
use ecotrack_api::db::MongoDb;
use ecotrack_api::routes::create_router;
use ecotrack_api::AppState;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Connection string of a disposable MongoDB deployment, if configured.
#[allow(dead_code)]
pub fn mongo_test_uri() -> Option<String> {
    std::env::var("MONGODB_TEST_URI").ok()
}

/// Skip test with message if no test deployment is configured.
#[macro_export]
macro_rules! require_mongo {
    () => {
        if crate::common::mongo_test_uri().is_none() {
            eprintln!("⚠️  Skipping: MONGODB_TEST_URI not set");
            return;
        }
    };
}

/// Database name unique to one test, so tests can run in parallel.
#[allow(dead_code)]
pub fn unique_db_name(prefix: &str) -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("ecotrack_{}_{}", prefix, nanos)
}

/// Create a client for a fresh database on the test deployment.
#[allow(dead_code)]
pub fn test_db(prefix: &str) -> MongoDb {
    let uri = mongo_test_uri().expect("MONGODB_TEST_URI not set");
    MongoDb::new(&uri, &unique_db_name(prefix))
}

/// Drop the test database.
#[allow(dead_code)]
pub async fn drop_db(db: &MongoDb) {
    db.database()
        .await
        .expect("connect for cleanup")
        .drop()
        .await
        .expect("drop test database");
}

/// Build an app around `db`.
#[allow(dead_code)]
pub fn create_app_with_db(db: MongoDb) -> (axum::Router, Arc<AppState>) {
    let config = Config {
        database_name: db.database_name().to_string(),
        ..Config::default()
    };
    let state = Arc::new(AppState { config, db });
    (create_router(state.clone()), state)
}

/// Create a test app with an offline store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_app_with_db(MongoDb::new_mock())
}

/// Send a request and decode the JSON response body (`Null` if empty or not JSON).
#[allow(dead_code)]
pub async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}
