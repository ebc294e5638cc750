//! Event participation records.

use mongodb::bson::{self, doc, oid::ObjectId, Document};
use serde::{Deserialize, Serialize};

/// User-event join record stored in `userEvents`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserEvent {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: String,
    /// Weak reference to the event
    pub event_id: ObjectId,
    pub join_date: bson::DateTime,
}

impl UserEvent {
    pub fn new(user_id: &str, event_id: ObjectId, join_date: bson::DateTime) -> Self {
        Self {
            id: None,
            user_id: user_id.to_string(),
            event_id,
            join_date,
        }
    }

    /// Uniqueness key of the record.
    pub fn key(&self) -> Document {
        doc! { "userId": self.user_id.as_str(), "eventId": self.event_id }
    }
}
