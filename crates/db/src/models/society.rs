//! Society records.

use gatepass_core::society::is_within_permission;
use gatepass_core::types::{RecordId, Timestamp};
use serde::{Deserialize, Serialize};

/// A document from the `societies` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Society {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    pub permission_from_date: Timestamp,
    pub permission_to_date: Timestamp,
    pub created_at: Timestamp,
}

impl Society {
    /// Whether the society's permission window contains `now`.
    pub fn is_active_at(&self, now: Timestamp) -> bool {
        is_within_permission(self.permission_from_date, self.permission_to_date, now)
    }
}

/// DTO for creating a new society.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSociety {
    pub name: String,
    pub address: Option<String>,
    pub permission_from_date: Timestamp,
    pub permission_to_date: Timestamp,
}

/// DTO for updating an existing society. All fields are optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSociety {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permission_from_date: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permission_to_date: Option<Timestamp>,
}
