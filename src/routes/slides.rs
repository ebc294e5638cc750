// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Home page carousel slides.

use super::{body_document, documents_json, JsonBody};
use crate::db::{collections, json::bson_to_json, FindSpec};
use crate::error::Result;
use crate::AppState;
use axum::extract::State;
use axum::{routing::get, Json, Router};
use mongodb::bson::doc;
use serde_json::{json, Value};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/slides", get(list_slides).post(create_slide))
}

async fn list_slides(State(state): State<Arc<AppState>>) -> Result<Json<Value>> {
    let slides = state
        .db
        .find_documents(collections::SLIDES, doc! {}, FindSpec::default())
        .await?;
    Ok(documents_json(slides))
}

/// Store a slide as given. Responds 200 with the insert acknowledgement.
async fn create_slide(State(state): State<Arc<AppState>>, body: JsonBody) -> Result<Json<Value>> {
    let slide = body_document(body)?;
    let id = state.db.insert_document(collections::SLIDES, slide).await?;

    Ok(Json(json!({
        "acknowledged": true,
        "insertedId": bson_to_json(id),
    })))
}
