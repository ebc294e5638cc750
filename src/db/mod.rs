//! Database layer (MongoDB).

pub mod json;
pub mod mongo;

pub use json::{document_to_json, json_to_document};
pub use mongo::{FindSpec, MongoDb};

use crate::error::AppError;
use mongodb::bson::oid::ObjectId;

/// Collection names as constants.
pub mod collections {
    pub const CHALLENGES: &str = "challenges";
    /// Join records linking a user to a challenge
    pub const USER_CHALLENGES: &str = "userChallenges";
    pub const EVENTS: &str = "events";
    /// Join records linking a user to an event
    pub const USER_EVENTS: &str = "userEvents";
    pub const TIPS: &str = "tips";
    pub const TESTIMONIALS: &str = "testimonials";
    pub const BLOGS: &str = "blogs";
    pub const USERS: &str = "users";
    pub const SLIDES: &str = "slides";
}

/// Parse a path segment into an `ObjectId`, rejecting malformed ids up front.
pub fn parse_object_id(raw: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw.trim())
        .map_err(|_| AppError::Validation(format!("Invalid id: {}", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_object_id() {
        let oid = parse_object_id("65a4f0c2e13b9a0012345678").unwrap();
        assert_eq!(oid.to_hex(), "65a4f0c2e13b9a0012345678");

        let err = parse_object_id("not-an-id").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
