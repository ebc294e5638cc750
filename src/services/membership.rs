// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Joining challenges and events.
//!
//! A join inserts the join record with a single insert-if-absent upsert and
//! then increments the parent's counter. The two writes are not atomic as a
//! pair: if the increment fails, the join record stays and the counter is
//! not corrected.

use crate::db::{collections, MongoDb};
use crate::error::{AppError, Result};
use crate::models::{JoinRequest, UserChallenge, UserEvent};
use crate::time_utils::bson_now;
use mongodb::bson::{self, doc, oid::ObjectId, Document};
use validator::Validate;

/// What is being joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinTarget {
    Challenge,
    Event,
}

impl JoinTarget {
    pub fn parent_collection(self) -> &'static str {
        match self {
            JoinTarget::Challenge => collections::CHALLENGES,
            JoinTarget::Event => collections::EVENTS,
        }
    }

    pub fn join_collection(self) -> &'static str {
        match self {
            JoinTarget::Challenge => collections::USER_CHALLENGES,
            JoinTarget::Event => collections::USER_EVENTS,
        }
    }

    /// Counter on the parent incremented once per join.
    pub fn counter_field(self) -> &'static str {
        match self {
            JoinTarget::Challenge => "participants",
            JoinTarget::Event => "attendees",
        }
    }

    fn noun(self) -> &'static str {
        match self {
            JoinTarget::Challenge => "challenge",
            JoinTarget::Event => "event",
        }
    }

    pub fn not_found(self) -> AppError {
        match self {
            JoinTarget::Challenge => AppError::NotFound("Challenge not found".to_string()),
            JoinTarget::Event => AppError::NotFound("Event not found".to_string()),
        }
    }

    pub fn already_joined(self) -> AppError {
        AppError::Conflict(format!("Already joined this {}", self.noun()))
    }
}

/// Validated, trimmed user id of a join request.
fn requesting_user(request: &JoinRequest) -> Result<&str> {
    request.validate()?;
    Ok(request.user_id.trim())
}

/// Join `target` with id `parent_id`, storing `record` under `key`.
async fn join(
    db: &MongoDb,
    target: JoinTarget,
    parent_id: &ObjectId,
    key: Document,
    record: Document,
) -> Result<ObjectId> {
    if db
        .find_by_id(target.parent_collection(), parent_id)
        .await?
        .is_none()
    {
        return Err(target.not_found());
    }

    let Some(id) = db
        .insert_if_absent(target.join_collection(), key, record)
        .await?
    else {
        return Err(target.already_joined());
    };

    let mut counter = Document::new();
    counter.insert(target.counter_field(), 1);
    let incremented = db
        .update_by_id(target.parent_collection(), parent_id, doc! { "$inc": counter })
        .await?;

    if !incremented {
        tracing::warn!(
            parent_id = %parent_id,
            target = target.noun(),
            "Parent removed while joining; counter not incremented"
        );
    }

    Ok(id)
}

fn to_document<T: serde::Serialize>(record: &T) -> Result<Document> {
    bson::to_document(record).map_err(|e| AppError::Internal(e.into()))
}

/// Join a challenge. Returns the stored join record.
pub async fn join_challenge(
    db: &MongoDb,
    challenge_id: ObjectId,
    request: &JoinRequest,
) -> Result<UserChallenge> {
    let user_id = requesting_user(request)?;
    let mut record = UserChallenge::new(user_id, challenge_id, bson_now());

    let id = join(
        db,
        JoinTarget::Challenge,
        &challenge_id,
        record.key(),
        to_document(&record)?,
    )
    .await?;
    record.id = Some(id);

    tracing::info!(user_id, challenge_id = %challenge_id, "User joined challenge");
    Ok(record)
}

/// Join an event. Returns the stored join record.
pub async fn join_event(
    db: &MongoDb,
    event_id: ObjectId,
    request: &JoinRequest,
) -> Result<UserEvent> {
    let user_id = requesting_user(request)?;
    let mut record = UserEvent::new(user_id, event_id, bson_now());

    let id = join(
        db,
        JoinTarget::Event,
        &event_id,
        record.key(),
        to_document(&record)?,
    )
    .await?;
    record.id = Some(id);

    tracing::info!(user_id, event_id = %event_id, "User joined event");
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_targets() {
        assert_eq!(JoinTarget::Challenge.counter_field(), "participants");
        assert_eq!(JoinTarget::Event.counter_field(), "attendees");
        assert_eq!(JoinTarget::Event.join_collection(), collections::USER_EVENTS);

        let err = JoinTarget::Challenge.already_joined();
        assert_eq!(err.to_string(), "Conflict: Already joined this challenge");
    }

    #[tokio::test]
    async fn test_blank_user_rejected_before_store() {
        let db = MongoDb::new_mock();
        let err = join_challenge(&db, ObjectId::new(), &JoinRequest::new("   ")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
