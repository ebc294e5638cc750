// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Challenge participation records.

use mongodb::bson::{self, doc, oid::ObjectId, Document};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Status assigned to a freshly joined challenge.
pub const STATUS_NOT_STARTED: &str = "Not Started";
pub const STATUS_IN_PROGRESS: &str = "In Progress";
pub const STATUS_COMPLETED: &str = "Completed";

/// User-challenge join record stored in `userChallenges`.
///
/// `challenge_id` is a weak reference: deleting the challenge leaves this
/// record in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserChallenge {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// App-supplied user identifier (usually an email)
    pub user_id: String,
    pub challenge_id: ObjectId,
    /// Free-form status, overwritten by progress updates
    pub status: String,
    /// Progress value, not range checked
    #[serde(default)]
    pub progress: f64,
    pub join_date: bson::DateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<bson::DateTime>,
}

impl UserChallenge {
    /// A new join record in the initial state.
    pub fn new(user_id: &str, challenge_id: ObjectId, join_date: bson::DateTime) -> Self {
        Self {
            id: None,
            user_id: user_id.to_string(),
            challenge_id,
            status: STATUS_NOT_STARTED.to_string(),
            progress: 0.0,
            join_date,
            updated_at: None,
        }
    }

    /// Uniqueness key of the record.
    pub fn key(&self) -> Document {
        doc! { "userId": self.user_id.as_str(), "challengeId": self.challenge_id }
    }
}

/// Body of a join request.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    #[validate(custom(function = "not_blank"))]
    pub user_id: String,
}

impl JoinRequest {
    pub fn new(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
        }
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("must not be blank".into()));
    }
    Ok(())
}

/// Body of a progress update. Absent fields are left untouched.
#[derive(Debug, Deserialize)]
pub struct ProgressUpdate {
    pub progress: Option<f64>,
    pub status: Option<String>,
}

impl ProgressUpdate {
    /// `$set` fields for this update, always stamping `updatedAt`.
    pub fn to_set_document(&self, now: bson::DateTime) -> Document {
        let mut set = doc! { "updatedAt": now };
        if let Some(progress) = self.progress {
            set.insert("progress", progress);
        }
        if let Some(status) = &self.status {
            set.insert("status", status.as_str());
        }
        set
    }
}
