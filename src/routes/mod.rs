// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers.

pub mod blogs;
pub mod challenges;
pub mod dashboard;
pub mod events;
pub mod slides;
pub mod testimonials;
pub mod tips;
pub mod users;

use crate::db::{document_to_json, json_to_document, parse_object_id, MongoDb};
use crate::error::{AppError, Result};
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{routing::get, Json, Router};
use mongodb::bson::{self, doc, Bson, Document};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub build_id: String,
}

/// Root banner
async fn root() -> &'static str {
    "EcoTrack API is running!"
}

/// Health check response
async fn health_check() -> Json<HealthResponse> {
    let build_id = option_env!("BUILD_ID").unwrap_or("unknown").to_string();
    Json(HealthResponse {
        status: "ok".to_string(),
        build_id,
    })
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    // Public API: any origin, no credentials.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .merge(challenges::routes())
        .merge(events::routes())
        .merge(tips::routes())
        .merge(testimonials::routes())
        .merge(blogs::routes())
        .merge(users::routes())
        .merge(dashboard::routes())
        .merge(slides::routes())
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

// ─── Shared Handler Helpers ──────────────────────────────────

/// Free-form JSON object body. A malformed body becomes a 400 via `?`.
pub(crate) type JsonBody = std::result::Result<Json<Map<String, Value>>, JsonRejection>;

/// Unwrap a free-form body into a document without `_id`.
pub(crate) fn body_document(body: JsonBody) -> Result<Document> {
    let Json(body) = body?;
    json_to_document(body)
}

/// `{message}` response body.
pub(crate) fn message(text: &str) -> Json<Value> {
    Json(json!({ "message": text }))
}

/// `201 {insertedId, _id, ...document}`
pub(crate) fn created(inserted_id: Bson, mut document: Document) -> Response {
    document.insert("_id", inserted_id.clone());
    let mut body = document_to_json(document);
    body["insertedId"] = crate::db::json::bson_to_json(inserted_id);
    (StatusCode::CREATED, Json(body)).into_response()
}

/// Stamp `createdAt` and `updatedAt` on a new document.
pub(crate) fn stamp_created(document: &mut Document, now: bson::DateTime) {
    document.insert("createdAt", now);
    document.insert("updatedAt", now);
}

/// Fetch one document by its path id, or `not_found`.
pub(crate) async fn get_by_path_id(
    db: &MongoDb,
    collection: &str,
    raw_id: &str,
    not_found: &str,
) -> Result<Json<Value>> {
    let id = parse_object_id(raw_id)?;
    let document = db
        .find_by_id(collection, &id)
        .await?
        .ok_or_else(|| AppError::NotFound(not_found.to_string()))?;
    Ok(Json(document_to_json(document)))
}

/// `$set` the body fields plus `updatedAt` on the document at `raw_id`.
pub(crate) async fn patch_by_path_id(
    db: &MongoDb,
    collection: &str,
    raw_id: &str,
    mut fields: Document,
    now: bson::DateTime,
    outcome: (&str, &str),
) -> Result<Json<Value>> {
    let (updated, not_found) = outcome;
    let id = parse_object_id(raw_id)?;
    fields.insert("updatedAt", now);

    if !db
        .update_by_id(collection, &id, doc! { "$set": fields })
        .await?
    {
        return Err(AppError::NotFound(not_found.to_string()));
    }

    tracing::debug!(collection, id = %id, "Document updated");
    Ok(message(updated))
}

/// Delete the document at `raw_id`.
pub(crate) async fn delete_by_path_id(
    db: &MongoDb,
    collection: &str,
    raw_id: &str,
    outcome: (&str, &str),
) -> Result<Json<Value>> {
    let (deleted, not_found) = outcome;
    let id = parse_object_id(raw_id)?;

    if !db.delete_by_id(collection, &id).await? {
        return Err(AppError::NotFound(not_found.to_string()));
    }

    tracing::info!(collection, id = %id, "Document deleted");
    Ok(message(deleted))
}

/// Render a list of stored documents.
pub(crate) fn documents_json(documents: Vec<Document>) -> Json<Value> {
    Json(Value::Array(
        documents.into_iter().map(document_to_json).collect(),
    ))
}

/// Parse an optional positive `limit` query value, falling back to `default`.
pub(crate) fn limit_param(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|raw| raw.trim().parse::<i64>().ok())
        .filter(|limit| *limit > 0)
        .map(|limit| limit.min(crate::services::pagination::MAX_LIMIT as i64))
        .unwrap_or(default)
}
