// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Blog routes: listing, CRUD, views, likes and comments.

use super::{
    body_document, created, delete_by_path_id, documents_json, limit_param, patch_by_path_id,
    stamp_created, JsonBody,
};
use crate::db::json::record_to_json;
use crate::db::{collections, document_to_json, parse_object_id, FindSpec};
use crate::error::{AppError, Result};
use crate::models::CommentRequest;
use crate::services::pagination::DEFAULT_BLOG_LIMIT;
use crate::services::{fetch_page, BlogQuery, PageRequest, SortOrder};
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
use mongodb::bson::{doc, Bson};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

const DEFAULT_LATEST_LIMIT: i64 = 3;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/blogs", get(list_blogs).post(create_blog))
        .route("/api/blogs/latest", get(latest_blogs))
        .route(
            "/api/blogs/{id}",
            get(view_blog).patch(update_blog).delete(delete_blog),
        )
        .route("/api/blogs/{id}/like", post(like_blog))
        .route("/api/blogs/{id}/comment", post(comment_on_blog))
}

// ─── Reading ─────────────────────────────────────────────────

/// Paginated blog listing, newest first.
async fn list_blogs(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BlogQuery>,
) -> Result<Json<Value>> {
    let request = PageRequest::parse(
        query.page.as_deref(),
        query.limit.as_deref(),
        DEFAULT_BLOG_LIMIT,
    )?;

    let page = fetch_page(
        &state.db,
        collections::BLOGS,
        query.to_filter(),
        SortOrder::Newest,
        request,
    )
    .await?;
    Ok(Json(page.into_json("blogs")))
}

#[derive(Debug, Deserialize)]
struct LatestQuery {
    limit: Option<String>,
}

async fn latest_blogs(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LatestQuery>,
) -> Result<Json<Value>> {
    let limit = limit_param(query.limit.as_deref(), DEFAULT_LATEST_LIMIT);
    let blogs = state
        .db
        .find_documents(
            collections::BLOGS,
            doc! {},
            FindSpec::sorted(doc! { "createdAt": -1 }).with_limit(limit),
        )
        .await?;
    Ok(documents_json(blogs))
}

/// Fetch a blog, counting the view.
async fn view_blog(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let id = parse_object_id(&id)?;
    let blog = state
        .db
        .find_and_update(
            collections::BLOGS,
            doc! { "_id": id },
            doc! { "$inc": { "views": 1 } },
        )
        .await?
        .ok_or_else(|| AppError::NotFound("Blog not found".to_string()))?;
    Ok(Json(document_to_json(blog)))
}

// ─── Writing ─────────────────────────────────────────────────

async fn create_blog(State(state): State<Arc<AppState>>, body: JsonBody) -> Result<Response> {
    let mut blog = body_document(body)?;
    blog.insert("views", 0_i32);
    blog.insert("likes", 0_i32);
    blog.insert("comments", Bson::Array(Vec::new()));
    stamp_created(&mut blog, bson_now());

    let id = state
        .db
        .insert_document(collections::BLOGS, blog.clone())
        .await?;

    tracing::info!(id = %id, "Blog created");
    Ok(created(id, blog))
}

/// Update blog fields. Counters and comments change only through their own routes.
async fn update_blog(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: JsonBody,
) -> Result<Json<Value>> {
    let mut fields = body_document(body)?;
    for managed in ["views", "likes", "comments"] {
        fields.remove(managed);
    }

    patch_by_path_id(
        &state.db,
        collections::BLOGS,
        &id,
        fields,
        bson_now(),
        ("Blog updated successfully", "Blog not found"),
    )
    .await
}

async fn delete_blog(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    delete_by_path_id(
        &state.db,
        collections::BLOGS,
        &id,
        ("Blog deleted successfully", "Blog not found"),
    )
    .await
}

// ─── Engagement ──────────────────────────────────────────────

/// Add a like. Likes are not deduplicated per user.
async fn like_blog(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let id = parse_object_id(&id)?;
    let blog = state
        .db
        .find_and_update(
            collections::BLOGS,
            doc! { "_id": id },
            doc! { "$inc": { "likes": 1 } },
        )
        .await?
        .ok_or_else(|| AppError::NotFound("Blog not found".to_string()))?;

    let likes = blog.get("likes").cloned().unwrap_or(Bson::Int32(0));
    Ok(Json(json!({
        "message": "Blog liked successfully",
        "likes": crate::db::json::bson_to_json(likes),
    })))
}

/// Append a comment to the blog's comment list.
async fn comment_on_blog(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: std::result::Result<Json<CommentRequest>, JsonRejection>,
) -> Result<Response> {
    let id = parse_object_id(&id)?;
    let Json(request) = body?;
    let comment = request.into_comment(bson_now());

    let stored = mongodb::bson::to_bson(&comment).map_err(|e| AppError::Internal(e.into()))?;
    if !state
        .db
        .update_by_id(
            collections::BLOGS,
            &id,
            doc! {
                "$push": { "comments": stored },
                "$set": { "updatedAt": comment.created_at },
            },
        )
        .await?
    {
        return Err(AppError::NotFound("Blog not found".to_string()));
    }

    tracing::debug!(blog_id = %id, user_id = %comment.user_id, "Comment added");
    let body = json!({
        "message": "Comment added successfully",
        "comment": record_to_json(&comment)?,
    });
    Ok((StatusCode::CREATED, Json(body)).into_response())
}
