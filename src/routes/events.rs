// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Event routes.

use super::{
    body_document, created, delete_by_path_id, documents_json, get_by_path_id, limit_param,
    patch_by_path_id, stamp_created, JsonBody,
};
use crate::db::json::record_to_json;
use crate::db::{collections, parse_object_id, FindSpec};
use crate::error::Result;
use crate::models::JoinRequest;
use crate::services::{membership, populate};
use crate::time_utils::bson_now;
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{
    routing::{get, post},
    Json, Router,
};
use mongodb::bson::doc;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// Upcoming events shown when no limit is given.
const DEFAULT_EVENT_LIMIT: i64 = 4;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/events", get(list_events).post(create_event))
        .route(
            "/api/events/{id}",
            get(get_event).patch(update_event).delete(delete_event),
        )
        .route("/api/events/join/{id}", post(join_event))
        .route("/api/user-events/{user_id}", get(list_user_events))
}

#[derive(Debug, Deserialize)]
struct EventListQuery {
    limit: Option<String>,
}

/// Events in date order, soonest first.
async fn list_events(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EventListQuery>,
) -> Result<Json<Value>> {
    let limit = limit_param(query.limit.as_deref(), DEFAULT_EVENT_LIMIT);
    let events = state
        .db
        .find_documents(
            collections::EVENTS,
            doc! {},
            FindSpec::sorted(doc! { "date": 1 }).with_limit(limit),
        )
        .await?;
    Ok(documents_json(events))
}

async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    get_by_path_id(&state.db, collections::EVENTS, &id, "Event not found").await
}

/// Create an event. `attendees` defaults to zero unless supplied.
async fn create_event(State(state): State<Arc<AppState>>, body: JsonBody) -> Result<Response> {
    let mut event = body_document(body)?;
    if matches!(event.get("attendees"), None | Some(mongodb::bson::Bson::Null)) {
        event.insert("attendees", 0_i32);
    }
    stamp_created(&mut event, bson_now());

    let id = state
        .db
        .insert_document(collections::EVENTS, event.clone())
        .await?;

    tracing::info!(id = %id, "Event created");
    Ok(created(id, event))
}

async fn update_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: JsonBody,
) -> Result<Json<Value>> {
    let mut fields = body_document(body)?;
    fields.remove("attendees");

    patch_by_path_id(
        &state.db,
        collections::EVENTS,
        &id,
        fields,
        bson_now(),
        ("Event updated successfully", "Event not found"),
    )
    .await
}

async fn delete_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    delete_by_path_id(
        &state.db,
        collections::EVENTS,
        &id,
        ("Event deleted successfully", "Event not found"),
    )
    .await
}

// ─── Attendance ──────────────────────────────────────────────

async fn join_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: std::result::Result<Json<JoinRequest>, JsonRejection>,
) -> Result<Response> {
    let event_id = parse_object_id(&id)?;
    let Json(request) = body?;

    let record = membership::join_event(&state.db, event_id, &request).await?;

    let body = json!({
        "message": "Successfully joined event",
        "userId": record.user_id,
        "userEvent": record_to_json(&record)?,
    });
    Ok((StatusCode::CREATED, Json(body)).into_response())
}

/// A user's joined events with event details attached.
async fn list_user_events(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>> {
    let records = populate::user_events_with_details(&state.db, &user_id).await?;
    Ok(Json(Value::Array(records)))
}
