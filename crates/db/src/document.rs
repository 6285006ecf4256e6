//! Schemaless documents as exchanged with the storage providers.
//!
//! Providers store JSON objects. Typed models convert to and from
//! [`Document`] at the repository boundary.

use chrono::{SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::StorageError;

/// A stored record: a JSON object whose `id` field is its key.
pub type Document = serde_json::Map<String, Value>;

pub const ID_FIELD: &str = "id";
pub const CREATED_AT_FIELD: &str = "createdAt";

/// Generate a new record id (time-ordered UUID v7).
pub fn new_record_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

/// Serialize a typed value into a document.
pub fn to_document<T: Serialize>(value: &T) -> Result<Document, StorageError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(StorageError::Corrupt(format!(
            "expected a JSON object, got {other}"
        ))),
    }
}

/// Deserialize a document into a typed value.
pub fn from_document<T: DeserializeOwned>(doc: Document) -> Result<T, StorageError> {
    Ok(serde_json::from_value(Value::Object(doc))?)
}

/// Read the `id` field of a document, if present and a string.
pub fn document_id(doc: &Document) -> Option<&str> {
    doc.get(ID_FIELD).and_then(Value::as_str)
}

/// Assign `id` and `createdAt` when the caller did not supply them.
///
/// Returns the id the document is stored under.
pub fn stamp_new(doc: &mut Document) -> String {
    let id = match document_id(doc) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => {
            let id = new_record_id();
            doc.insert(ID_FIELD.into(), Value::String(id.clone()));
            id
        }
    };
    if !doc.contains_key(CREATED_AT_FIELD) {
        doc.insert(
            CREATED_AT_FIELD.into(),
            Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
    }
    id
}

/// Shallow merge: every top-level field of `patch` replaces the stored one.
///
/// The `id` field is never overwritten.
pub fn merge(doc: &mut Document, patch: Document) {
    for (key, value) in patch {
        if key == ID_FIELD {
            continue;
        }
        doc.insert(key, value);
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => unreachable!("test documents are objects"),
        }
    }

    #[test]
    fn stamp_assigns_missing_id_and_created_at() {
        let mut d = doc(json!({"name": "Green Meadows"}));
        let id = stamp_new(&mut d);
        assert_eq!(d["id"], json!(id));
        assert!(d["createdAt"].is_string());
    }

    #[test]
    fn stamp_keeps_supplied_values() {
        let mut d = doc(json!({"id": "fixed", "createdAt": "2024-01-01T00:00:00Z"}));
        assert_eq!(stamp_new(&mut d), "fixed");
        assert_eq!(d["createdAt"], json!("2024-01-01T00:00:00Z"));
    }

    #[test]
    fn merge_replaces_top_level_fields_only() {
        let mut d = doc(json!({"id": "v1", "status": "pending", "meta": {"a": 1}}));
        merge(
            &mut d,
            doc(json!({"id": "other", "status": "approved", "meta": {"b": 2}})),
        );
        assert_eq!(d["id"], json!("v1"));
        assert_eq!(d["status"], json!("approved"));
        assert_eq!(d["meta"], json!({"b": 2}));
    }

    #[test]
    fn non_object_is_rejected() {
        assert!(to_document(&vec![1, 2]).is_err());
    }
}
