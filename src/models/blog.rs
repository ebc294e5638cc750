// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Blog comment model.

use mongodb::bson;
use serde::{Deserialize, Serialize};

/// Comment embedded in a blog's `comments` array, in posting order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub user_id: String,
    pub username: String,
    pub content: String,
    pub created_at: bson::DateTime,
}

/// Body of a comment request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    pub user_id: String,
    pub username: String,
    pub content: String,
}

impl CommentRequest {
    pub fn into_comment(self, created_at: bson::DateTime) -> Comment {
        Comment {
            user_id: self.user_id,
            username: self.username,
            content: self.content,
            created_at,
        }
    }
}
