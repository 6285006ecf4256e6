//! Pre-approval records: a resident's advance pass for an expected visitor.

use gatepass_core::pre_approval::PreApprovalStatus;
use gatepass_core::types::{RecordId, Timestamp};
use serde::{Deserialize, Serialize};

/// A document from the `preApprovals` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreApproval {
    pub id: RecordId,
    pub society_id: RecordId,
    pub resident_id: RecordId,
    pub visitor_name: String,
    #[serde(default)]
    pub contact_number: Option<String>,
    #[serde(default)]
    pub purpose: Option<String>,
    #[serde(default)]
    pub valid_until: Option<Timestamp>,
    pub status: PreApprovalStatus,
    #[serde(default)]
    pub used_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for issuing a pre-approval. Status is set to `valid` by the repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePreApproval {
    pub society_id: RecordId,
    pub resident_id: RecordId,
    pub visitor_name: String,
    pub contact_number: Option<String>,
    pub purpose: Option<String>,
    pub valid_until: Option<Timestamp>,
}

/// DTO for updating a pre-approval. All fields are optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePreApproval {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PreApprovalStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used_at: Option<Timestamp>,
}
