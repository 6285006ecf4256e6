//! Repository for the `preApprovals` collection.

use gatepass_core::pre_approval::PreApprovalStatus;
use serde_json::Value;

use crate::collection::Collection;
use crate::document::{to_document, Document};
use crate::error::StorageError;
use crate::models::pre_approval::{CreatePreApproval, PreApproval, UpdatePreApproval};
use crate::providers::StorageProvider;

use super::{find_as, insert_as, list_as, patch_as};

/// Provides create/read/update operations for pre-approvals.
pub struct PreApprovalRepo;

impl PreApprovalRepo {
    pub async fn list(store: &dyn StorageProvider) -> Result<Vec<PreApproval>, StorageError> {
        list_as(store, Collection::PreApprovals).await
    }

    pub async fn find_by_id(
        store: &dyn StorageProvider,
        id: &str,
    ) -> Result<Option<PreApproval>, StorageError> {
        find_as(store, Collection::PreApprovals, id).await
    }

    /// Issue a pass with `status = valid`.
    pub async fn create(
        store: &dyn StorageProvider,
        input: &CreatePreApproval,
    ) -> Result<PreApproval, StorageError> {
        let mut doc = to_document(input)?;
        doc.insert(
            "status".into(),
            Value::String(PreApprovalStatus::Valid.name().into()),
        );
        insert_as(store, Collection::PreApprovals, doc).await
    }

    pub async fn update(
        store: &dyn StorageProvider,
        id: &str,
        input: &UpdatePreApproval,
    ) -> Result<PreApproval, StorageError> {
        patch_as(store, Collection::PreApprovals, id, input).await
    }

    /// Put a claimed pass back to `valid` with `usedAt` cleared.
    pub async fn release(
        store: &dyn StorageProvider,
        id: &str,
    ) -> Result<PreApproval, StorageError> {
        let mut patch = Document::new();
        patch.insert(
            "status".into(),
            Value::String(PreApprovalStatus::Valid.name().into()),
        );
        patch.insert("usedAt".into(), Value::Null);
        patch_as(store, Collection::PreApprovals, id, &patch).await
    }
}
