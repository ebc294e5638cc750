// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User profile routes.
//!
//! Users are looked up by email for reads and profile upserts, and by id for
//! admin edits and deletion.

use super::{
    body_document, created, delete_by_path_id, documents_json, message, patch_by_path_id,
    JsonBody,
};
use crate::db::{collections, document_to_json, FindSpec};
use crate::error::{AppError, Result};
use crate::models::UserDefaults;
use crate::time_utils::bson_now;
use crate::AppState;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::{
    routing::{get, put},
    Json, Router,
};
use mongodb::bson::{doc, Document};
use serde_json::{json, Value};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/users", get(list_users).post(create_user))
        // GET takes an email, PATCH and DELETE an id.
        .route(
            "/api/users/{key}",
            get(get_user).patch(update_user).delete(delete_user),
        )
        .route("/api/users/profile/{email}", put(upsert_profile))
}

fn require_email(document: &Document) -> Result<String> {
    match document.get_str("email").map(str::trim) {
        Ok(email) if !email.is_empty() => Ok(email.to_string()),
        _ => Err(AppError::Validation("email is required".to_string())),
    }
}

async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<Value>> {
    let users = state
        .db
        .find_documents(
            collections::USERS,
            doc! {},
            FindSpec::sorted(doc! { "createdAt": -1 }),
        )
        .await?;
    Ok(documents_json(users))
}

/// Register a user unless one with the same email exists.
async fn create_user(State(state): State<Arc<AppState>>, body: JsonBody) -> Result<Response> {
    let mut user = body_document(body)?;
    let email = require_email(&user)?;
    let now = bson_now();

    user.insert("email", email.as_str());
    let defaults = UserDefaults::new(now).missing_from(&user);
    user.extend(defaults);
    user.insert("updatedAt", now);

    let inserted = state
        .db
        .insert_if_absent(collections::USERS, doc! { "email": email.as_str() }, user.clone())
        .await?;

    match inserted {
        Some(id) => {
            tracing::info!(email = %email, "User registered");
            Ok(created(id.into(), user))
        }
        None => {
            tracing::debug!(email = %email, "User already registered");
            let body = json!({ "message": "User already exists", "insertedId": null });
            Ok(Json(body).into_response())
        }
    }
}

async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<Value>> {
    let user = state
        .db
        .find_document(collections::USERS, doc! { "email": email.as_str() })
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(Json(document_to_json(user)))
}

async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: JsonBody,
) -> Result<Json<Value>> {
    patch_by_path_id(
        &state.db,
        collections::USERS,
        &id,
        body_document(body)?,
        bson_now(),
        ("User updated successfully", "User not found"),
    )
    .await
}

async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    delete_by_path_id(
        &state.db,
        collections::USERS,
        &id,
        ("User deleted successfully", "User not found"),
    )
    .await
}

/// Create or update the profile for `email`.
///
/// Supplied fields are always written; defaults are only applied when the
/// profile is created.
async fn upsert_profile(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
    body: JsonBody,
) -> Result<Json<Value>> {
    let mut fields = body_document(body)?;
    fields.remove("email");

    let now = bson_now();
    let defaults = UserDefaults::new(now).missing_from(&fields);
    fields.insert("updatedAt", now);

    let result = state
        .db
        .update_document(
            collections::USERS,
            doc! { "email": email.as_str() },
            doc! { "$set": fields, "$setOnInsert": defaults },
            true,
        )
        .await?;

    let inserted = result.upserted_id.is_some();
    tracing::info!(email = %email, inserted, "Profile saved");

    let mut body = message("Profile updated successfully").0;
    body["upserted"] = Value::Bool(inserted);
    Ok(Json(body))
}
