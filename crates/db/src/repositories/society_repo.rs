//! Repository for the `societies` collection.

use crate::collection::Collection;
use crate::document::to_document;
use crate::error::StorageError;
use crate::models::society::{CreateSociety, Society, UpdateSociety};
use crate::providers::StorageProvider;

use super::{find_as, insert_as, list_as, patch_as};

/// Provides CRUD operations for societies.
pub struct SocietyRepo;

impl SocietyRepo {
    pub async fn list(store: &dyn StorageProvider) -> Result<Vec<Society>, StorageError> {
        list_as(store, Collection::Societies).await
    }

    pub async fn find_by_id(
        store: &dyn StorageProvider,
        id: &str,
    ) -> Result<Option<Society>, StorageError> {
        find_as(store, Collection::Societies, id).await
    }

    pub async fn create(
        store: &dyn StorageProvider,
        input: &CreateSociety,
    ) -> Result<Society, StorageError> {
        insert_as(store, Collection::Societies, to_document(input)?).await
    }

    pub async fn update(
        store: &dyn StorageProvider,
        id: &str,
        input: &UpdateSociety,
    ) -> Result<Society, StorageError> {
        patch_as(store, Collection::Societies, id, input).await
    }

    pub async fn delete(store: &dyn StorageProvider, id: &str) -> Result<(), StorageError> {
        store.delete(Collection::Societies, id).await
    }
}
