// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Attaches parent documents to join records.
//!
//! Parents are looked up one record at a time. A parent that has since been
//! deleted is rendered as `null` rather than failing the request.

use crate::db::{collections, document_to_json, FindSpec, MongoDb};
use crate::error::{AppError, Result};
use crate::services::stats::{group_by_stages, grouped_counts};
use futures_util::{stream, StreamExt, TryStreamExt};
use mongodb::bson::{doc, Document};
use serde_json::Value;

const MAX_CONCURRENT_LOOKUPS: usize = 16;

/// Render each record with its parent attached under `field`, preserving order.
///
/// Records are rendered as stored. A record whose `id_field` is not an
/// ObjectId gets a `null` parent without a lookup.
pub async fn attach_parents(
    db: &MongoDb,
    records: Vec<Document>,
    parent_collection: &str,
    id_field: &str,
    field: &str,
) -> Result<Vec<Value>> {
    stream::iter(records)
        .map(|record| async move {
            let parent = match record.get_object_id(id_field) {
                Ok(id) => db.find_by_id(parent_collection, &id).await?,
                Err(_) => {
                    tracing::debug!(id_field, "Join record without a parent id");
                    None
                }
            };
            let mut json = document_to_json(record);
            json[field] = parent.map(document_to_json).unwrap_or(Value::Null);
            Ok::<_, AppError>(json)
        })
        .buffered(MAX_CONCURRENT_LOOKUPS)
        .try_collect()
        .await
}

/// A user's join records in `collection`, newest first.
async fn join_records(db: &MongoDb, collection: &str, user_id: &str) -> Result<Vec<Document>> {
    db.find_documents(
        collection,
        doc! { "userId": user_id },
        FindSpec::sorted(doc! { "joinDate": -1 }),
    )
    .await
}

/// A user's joined challenges, newest first, each with `challenge` attached.
pub async fn user_challenges_with_details(db: &MongoDb, user_id: &str) -> Result<Vec<Value>> {
    let records = join_records(db, collections::USER_CHALLENGES, user_id).await?;

    tracing::debug!(user_id, count = records.len(), "Populating user challenges");

    attach_parents(
        db,
        records,
        collections::CHALLENGES,
        "challengeId",
        "challenge",
    )
    .await
}

/// A user's joined events, newest first, each with `event` attached.
pub async fn user_events_with_details(db: &MongoDb, user_id: &str) -> Result<Vec<Value>> {
    let records = join_records(db, collections::USER_EVENTS, user_id).await?;
    attach_parents(db, records, collections::EVENTS, "eventId", "event").await
}

/// Count a user's joined challenges by the category of the challenge.
///
/// Join records whose challenge no longer exists are left out.
pub async fn user_challenge_categories(
    db: &MongoDb,
    user_id: &str,
) -> Result<Vec<(String, u64)>> {
    let mut pipeline = vec![
        doc! { "$match": { "userId": user_id } },
        doc! {
            "$lookup": {
                "from": collections::CHALLENGES,
                "localField": "challengeId",
                "foreignField": "_id",
                "as": "challenge",
            }
        },
        doc! { "$unwind": "$challenge" },
    ];
    pipeline.extend(group_by_stages("challenge.category"));

    let groups = db.aggregate(collections::USER_CHALLENGES, pipeline).await?;
    Ok(grouped_counts(groups))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{oid::ObjectId, Bson};

    #[tokio::test]
    async fn test_empty_records_need_no_lookups() {
        // The offline client fails every call, so this only passes if no
        // lookup is attempted.
        let db = MongoDb::new_mock();
        let populated = attach_parents(&db, Vec::new(), collections::EVENTS, "eventId", "event")
            .await
            .unwrap();
        assert!(populated.is_empty());
    }

    #[tokio::test]
    async fn test_loosely_typed_records_render_as_stored() {
        // Nulls left by partial progress updates, and a missing parent id.
        let db = MongoDb::new_mock();
        let records = vec![doc! {
            "_id": ObjectId::new(),
            "userId": "jane@example.com",
            "status": "In Progress",
            "progress": Bson::Null,
        }];

        let populated = attach_parents(
            &db,
            records,
            collections::CHALLENGES,
            "challengeId",
            "challenge",
        )
        .await
        .unwrap();

        assert_eq!(populated.len(), 1);
        assert!(populated[0]["progress"].is_null());
        assert_eq!(populated[0]["status"], "In Progress");
        assert!(populated[0]["challenge"].is_null());
    }

    #[tokio::test]
    async fn test_lookup_errors_propagate() {
        let db = MongoDb::new_mock();
        let records = vec![doc! { "userId": "jane@example.com", "eventId": ObjectId::new() }];

        let err = attach_parents(&db, records, collections::EVENTS, "eventId", "event")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
    }
}
