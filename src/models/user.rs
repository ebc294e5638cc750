//! User profile defaults.
//!
//! User documents are otherwise free-form; these are the fields the server
//! fills in when a profile is first created.

use mongodb::bson::{self, doc, Document};

pub const DEFAULT_ROLE: &str = "user";
pub const DEFAULT_STATUS: &str = "active";

/// Fields set only when a user document is inserted.
#[derive(Debug, Clone)]
pub struct UserDefaults {
    pub now: bson::DateTime,
}

impl UserDefaults {
    pub fn new(now: bson::DateTime) -> Self {
        Self { now }
    }

    /// Defaults for any field missing from `provided`.
    pub fn missing_from(&self, provided: &Document) -> Document {
        let defaults = doc! {
            "role": DEFAULT_ROLE,
            "status": DEFAULT_STATUS,
            "joinDate": self.now,
            "totalActivities": 0_i64,
            "totalPoints": 0_i64,
            "createdAt": self.now,
        };

        defaults
            .into_iter()
            .filter(|(key, _)| !provided.contains_key(key))
            .collect()
    }
}
