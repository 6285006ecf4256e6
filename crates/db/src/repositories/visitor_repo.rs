//! Repository for the `visitors` collection.

use chrono::Utc;
use gatepass_core::visitor::VisitorStatus;
use serde_json::Value;

use crate::collection::Collection;
use crate::document::to_document;
use crate::error::StorageError;
use crate::models::visitor::{CreateVisitor, UpdateVisitor, Visitor};
use crate::providers::StorageProvider;

use super::{find_as, insert_as, list_as, patch_as};

/// Provides create/read/update operations for visitors. Visitors are never
/// deleted.
pub struct VisitorRepo;

impl VisitorRepo {
    pub async fn list(store: &dyn StorageProvider) -> Result<Vec<Visitor>, StorageError> {
        list_as(store, Collection::Visitors).await
    }

    pub async fn find_by_id(
        store: &dyn StorageProvider,
        id: &str,
    ) -> Result<Option<Visitor>, StorageError> {
        find_as(store, Collection::Visitors, id).await
    }

    /// Record a gate entry: `status = pending`, `entryTime = now`,
    /// `exitTime = null`.
    pub async fn create(
        store: &dyn StorageProvider,
        input: &CreateVisitor,
    ) -> Result<Visitor, StorageError> {
        let mut doc = to_document(input)?;
        doc.insert(
            "status".into(),
            Value::String(VisitorStatus::Pending.name().into()),
        );
        doc.insert("entryTime".into(), serde_json::to_value(Utc::now())?);
        doc.insert("exitTime".into(), Value::Null);
        insert_as(store, Collection::Visitors, doc).await
    }

    pub async fn update(
        store: &dyn StorageProvider,
        id: &str,
        input: &UpdateVisitor,
    ) -> Result<Visitor, StorageError> {
        patch_as(store, Collection::Visitors, id, input).await
    }
}
