//! Conversion between stored BSON documents and API JSON.
//!
//! Stored documents render with ids as hex strings and dates as RFC3339
//! strings, which is what the web client expects.

use crate::error::AppError;
use crate::time_utils::format_utc_rfc3339;
use mongodb::bson::{self, Bson, Document};
use serde_json::{Map, Number, Value};

/// Render a stored document as JSON.
pub fn document_to_json(doc: Document) -> Value {
    Value::Object(
        doc.into_iter()
            .map(|(key, value)| (key, bson_to_json(value)))
            .collect(),
    )
}

/// Render a single BSON value as JSON.
pub fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => match chrono::DateTime::from_timestamp_millis(dt.timestamp_millis()) {
            Some(date) => Value::String(format_utc_rfc3339(date)),
            None => Bson::DateTime(dt).into_relaxed_extjson(),
        },
        Bson::Document(doc) => document_to_json(doc),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        Bson::String(s) => Value::String(s),
        Bson::Boolean(b) => Value::Bool(b),
        Bson::Int32(i) => Value::from(i),
        Bson::Int64(i) => Value::from(i),
        Bson::Double(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        Bson::Null | Bson::Undefined => Value::Null,
        other => other.into_relaxed_extjson(),
    }
}

/// Convert a request body into a document.
///
/// `_id` is always dropped: ids are assigned by the store and never
/// overwritten through a body.
pub fn json_to_document(mut body: Map<String, Value>) -> Result<Document, AppError> {
    body.remove("_id");
    bson::to_document(&body)
        .map_err(|e| AppError::Validation(format!("Unsupported request body: {}", e)))
}

/// Serialize a typed record and render it as JSON.
pub fn record_to_json<T: serde::Serialize>(record: &T) -> Result<Value, AppError> {
    let doc = bson::to_document(record).map_err(|e| AppError::Internal(e.into()))?;
    Ok(document_to_json(doc))
}
