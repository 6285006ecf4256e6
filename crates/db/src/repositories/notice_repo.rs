//! Repository for the `notices` collection.

use crate::collection::Collection;
use crate::document::to_document;
use crate::error::StorageError;
use crate::models::notice::{CreateNotice, Notice};
use crate::providers::StorageProvider;

use super::{insert_as, list_as};

/// Notices are created and deleted, never edited.
pub struct NoticeRepo;

impl NoticeRepo {
    pub async fn list(store: &dyn StorageProvider) -> Result<Vec<Notice>, StorageError> {
        list_as(store, Collection::Notices).await
    }

    pub async fn create(
        store: &dyn StorageProvider,
        input: &CreateNotice,
    ) -> Result<Notice, StorageError> {
        insert_as(store, Collection::Notices, to_document(input)?).await
    }

    pub async fn delete(store: &dyn StorageProvider, id: &str) -> Result<(), StorageError> {
        store.delete(Collection::Notices, id).await
    }
}
