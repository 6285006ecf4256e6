//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&dyn StorageProvider` as the first argument and convert
//! between typed models and stored documents.

pub mod notice_repo;
pub mod pre_approval_repo;
pub mod society_repo;
pub mod user_repo;
pub mod visitor_repo;

pub use notice_repo::NoticeRepo;
pub use pre_approval_repo::PreApprovalRepo;
pub use society_repo::SocietyRepo;
pub use user_repo::UserRepo;
pub use visitor_repo::VisitorRepo;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::collection::Collection;
use crate::document::{from_document, to_document, Document};
use crate::error::StorageError;
use crate::providers::StorageProvider;

async fn list_as<T: DeserializeOwned>(
    store: &dyn StorageProvider,
    collection: Collection,
) -> Result<Vec<T>, StorageError> {
    store
        .get_all(collection)
        .await?
        .into_iter()
        .map(from_document::<T>)
        .collect()
}

async fn find_as<T: DeserializeOwned>(
    store: &dyn StorageProvider,
    collection: Collection,
    id: &str,
) -> Result<Option<T>, StorageError> {
    store
        .get_by_id(collection, id)
        .await?
        .map(from_document::<T>)
        .transpose()
}

async fn insert_as<T: DeserializeOwned>(
    store: &dyn StorageProvider,
    collection: Collection,
    doc: Document,
) -> Result<T, StorageError> {
    from_document(store.add(collection, doc).await?)
}

async fn patch_as<T: DeserializeOwned, P: Serialize>(
    store: &dyn StorageProvider,
    collection: Collection,
    id: &str,
    patch: &P,
) -> Result<T, StorageError> {
    from_document(store.update(collection, id, to_document(patch)?).await?)
}
