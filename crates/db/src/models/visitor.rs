//! Visitor records.

use gatepass_core::types::{RecordId, Timestamp};
use gatepass_core::visitor::{Gender, VisitorStatus};
use serde::{Deserialize, Serialize};

/// A document from the `visitors` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visitor {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub id_proof: Option<String>,
    #[serde(default)]
    pub coming_from: Option<String>,
    #[serde(default)]
    pub purpose: Option<String>,
    #[serde(default)]
    pub contact_number: Option<String>,
    pub resident_id: RecordId,
    pub society_id: RecordId,
    /// JPEG/PNG data URI captured at the gate, or null.
    #[serde(default)]
    pub photo: Option<String>,
    pub status: VisitorStatus,
    pub entry_time: Timestamp,
    #[serde(default)]
    pub exit_time: Option<Timestamp>,
    #[serde(default)]
    pub created_by: Option<RecordId>,
    #[serde(default)]
    pub pre_approval_id: Option<RecordId>,
    pub created_at: Timestamp,
}

/// DTO for a new gate entry. Status and timestamps are set by the repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVisitor {
    pub name: String,
    pub gender: Gender,
    pub id_proof: Option<String>,
    pub coming_from: Option<String>,
    pub purpose: Option<String>,
    pub contact_number: Option<String>,
    pub resident_id: RecordId,
    pub society_id: RecordId,
    pub photo: Option<String>,
    pub created_by: Option<RecordId>,
    pub pre_approval_id: Option<RecordId>,
}

/// DTO for updating a visitor. All fields are optional.
///
/// Setting a status or exit time here is unguarded; the workflow layer is
/// where transitions are checked.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVisitor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<VisitorStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_time: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
}
