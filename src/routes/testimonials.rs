// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Testimonial routes.

use super::{
    body_document, created, delete_by_path_id, documents_json, patch_by_path_id, stamp_created,
    JsonBody,
};
use crate::db::{collections, FindSpec};
use crate::error::Result;
use crate::time_utils::bson_now;
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::{
    routing::{get, patch},
    Json, Router,
};
use mongodb::bson::doc;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/testimonials",
            get(list_testimonials).post(create_testimonial),
        )
        .route(
            "/api/testimonials/{id}",
            patch(update_testimonial).delete(delete_testimonial),
        )
}

#[derive(Debug, Deserialize)]
struct TestimonialQuery {
    featured: Option<String>,
}

/// Testimonials, newest first. `featured=true` restricts to featured ones.
async fn list_testimonials(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TestimonialQuery>,
) -> Result<Json<Value>> {
    let filter = match query.featured.as_deref() {
        Some("true") => doc! { "featured": true },
        _ => doc! {},
    };

    let testimonials = state
        .db
        .find_documents(
            collections::TESTIMONIALS,
            filter,
            FindSpec::sorted(doc! { "createdAt": -1 }),
        )
        .await?;
    Ok(documents_json(testimonials))
}

async fn create_testimonial(
    State(state): State<Arc<AppState>>,
    body: JsonBody,
) -> Result<Response> {
    let mut testimonial = body_document(body)?;
    stamp_created(&mut testimonial, bson_now());

    let id = state
        .db
        .insert_document(collections::TESTIMONIALS, testimonial.clone())
        .await?;
    Ok(created(id, testimonial))
}

async fn update_testimonial(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: JsonBody,
) -> Result<Json<Value>> {
    patch_by_path_id(
        &state.db,
        collections::TESTIMONIALS,
        &id,
        body_document(body)?,
        bson_now(),
        ("Testimonial updated successfully", "Testimonial not found"),
    )
    .await
}

async fn delete_testimonial(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    delete_by_path_id(
        &state.db,
        collections::TESTIMONIALS,
        &id,
        ("Testimonial deleted successfully", "Testimonial not found"),
    )
    .await
}
