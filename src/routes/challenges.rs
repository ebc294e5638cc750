// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Challenge routes: listing, CRUD, joining, and per-user progress.

use super::{
    body_document, created, delete_by_path_id, get_by_path_id, message, patch_by_path_id,
    stamp_created, JsonBody,
};
use crate::db::json::record_to_json;
use crate::db::{collections, parse_object_id};
use crate::error::{AppError, Result};
use crate::models::{JoinRequest, ProgressUpdate};
use crate::services::pagination::DEFAULT_CHALLENGE_LIMIT;
use crate::services::{fetch_page, membership, populate, ChallengeQuery, PageRequest, SortOrder};
use crate::time_utils::{bson_now, parse_date_param, to_bson_datetime};
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{
    routing::{get, post},
    Json, Router,
};
use mongodb::bson::{doc, Bson, Document};
use serde_json::{json, Value};
use std::sync::Arc;

/// Fields holding calendar dates, stored as BSON dates when parseable.
const DATE_FIELDS: [&str; 2] = ["startDate", "endDate"];

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/challenges",
            get(list_challenges).post(create_challenge),
        )
        .route(
            "/api/challenges/{id}",
            get(get_challenge)
                .patch(update_challenge)
                .delete(delete_challenge),
        )
        .route("/api/challenges/join/{id}", post(join_challenge))
        // GET takes a user id, PATCH a join record id.
        .route(
            "/api/user-challenges/{id}",
            get(list_user_challenges).patch(update_progress),
        )
}

/// Store date strings as dates so range filters compare them correctly.
fn coerce_dates(document: &mut Document) {
    for field in DATE_FIELDS {
        let parsed = match document.get(field) {
            Some(Bson::String(raw)) => parse_date_param(raw),
            _ => None,
        };
        if let Some(date) = parsed {
            document.insert(field, to_bson_datetime(date));
        }
    }
}

// ─── Challenges ──────────────────────────────────────────────

/// List challenges with filters, sorting and pagination.
async fn list_challenges(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ChallengeQuery>,
) -> Result<Json<Value>> {
    let request = PageRequest::parse(
        query.page.as_deref(),
        query.limit.as_deref(),
        DEFAULT_CHALLENGE_LIMIT,
    )?;
    let sort = SortOrder::parse(query.sort.as_deref());
    let filter = query.to_filter();

    tracing::debug!(filter = %filter, ?sort, page = request.page, "Listing challenges");

    let page = fetch_page(&state.db, collections::CHALLENGES, filter, sort, request).await?;
    Ok(Json(page.into_json("challenges")))
}

async fn get_challenge(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    get_by_path_id(&state.db, collections::CHALLENGES, &id, "Challenge not found").await
}

/// Create a challenge. `participants` always starts at zero.
async fn create_challenge(State(state): State<Arc<AppState>>, body: JsonBody) -> Result<Response> {
    let mut challenge = body_document(body)?;
    coerce_dates(&mut challenge);
    challenge.insert("participants", 0_i32);
    stamp_created(&mut challenge, bson_now());

    let id = state
        .db
        .insert_document(collections::CHALLENGES, challenge.clone())
        .await?;

    tracing::info!(id = %id, "Challenge created");
    Ok(created(id, challenge))
}

/// Update challenge fields. The participant counter is not client-writable.
async fn update_challenge(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: JsonBody,
) -> Result<Json<Value>> {
    let mut fields = body_document(body)?;
    fields.remove("participants");
    coerce_dates(&mut fields);

    patch_by_path_id(
        &state.db,
        collections::CHALLENGES,
        &id,
        fields,
        bson_now(),
        ("Challenge updated successfully", "Challenge not found"),
    )
    .await
}

/// Delete a challenge. Join records referencing it are left in place.
async fn delete_challenge(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    delete_by_path_id(
        &state.db,
        collections::CHALLENGES,
        &id,
        ("Challenge deleted successfully", "Challenge not found"),
    )
    .await
}

// ─── Participation ───────────────────────────────────────────

async fn join_challenge(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: std::result::Result<Json<JoinRequest>, JsonRejection>,
) -> Result<Response> {
    let challenge_id = parse_object_id(&id)?;
    let Json(request) = body?;

    let record = membership::join_challenge(&state.db, challenge_id, &request).await?;

    let body = json!({
        "message": "Successfully joined challenge",
        "userChallenge": record_to_json(&record)?,
    });
    Ok((StatusCode::CREATED, Json(body)).into_response())
}

/// A user's joined challenges with challenge details attached.
async fn list_user_challenges(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>> {
    let records = populate::user_challenges_with_details(&state.db, &user_id).await?;
    Ok(Json(Value::Array(records)))
}

async fn update_progress(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: std::result::Result<Json<ProgressUpdate>, JsonRejection>,
) -> Result<Json<Value>> {
    let id = parse_object_id(&id)?;
    let Json(update) = body?;

    let set = update.to_set_document(bson_now());
    if !state
        .db
        .update_by_id(collections::USER_CHALLENGES, &id, doc! { "$set": set })
        .await?
    {
        return Err(AppError::NotFound("User challenge not found".to_string()));
    }

    tracing::debug!(id = %id, progress = ?update.progress, "Progress updated");
    Ok(message("Progress updated successfully"))
}
