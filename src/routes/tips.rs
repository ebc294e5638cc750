// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Eco tip routes.

use super::{body_document, created, documents_json, stamp_created, JsonBody};
use crate::db::{collections, FindSpec};
use crate::error::Result;
use crate::time_utils::bson_now;
use crate::AppState;
use axum::extract::State;
use axum::response::Response;
use axum::{routing::get, Json, Router};
use mongodb::bson::doc;
use serde_json::Value;
use std::sync::Arc;

const LATEST_TIPS: i64 = 5;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/tips", get(list_tips).post(create_tip))
}

/// The most recent tips, newest first.
async fn list_tips(State(state): State<Arc<AppState>>) -> Result<Json<Value>> {
    let tips = state
        .db
        .find_documents(
            collections::TIPS,
            doc! {},
            FindSpec::sorted(doc! { "createdAt": -1 }).with_limit(LATEST_TIPS),
        )
        .await?;
    Ok(documents_json(tips))
}

async fn create_tip(State(state): State<Arc<AppState>>, body: JsonBody) -> Result<Response> {
    let mut tip = body_document(body)?;
    stamp_created(&mut tip, bson_now());

    let id = state
        .db
        .insert_document(collections::TIPS, tip.clone())
        .await?;
    Ok(created(id, tip))
}
