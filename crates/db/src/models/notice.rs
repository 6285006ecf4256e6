//! Notice-board records. Notices are immutable once posted.

use gatepass_core::types::{RecordId, Timestamp};
use serde::{Deserialize, Serialize};

/// A document from the `notices` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub id: RecordId,
    pub society_id: RecordId,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub created_by: Option<RecordId>,
    pub created_at: Timestamp,
}

/// DTO for posting a new notice.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotice {
    pub society_id: RecordId,
    pub title: String,
    pub content: String,
    pub created_by: Option<RecordId>,
}
