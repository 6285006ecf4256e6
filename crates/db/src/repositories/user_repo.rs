//! Repository for the `users` collection.

use crate::collection::Collection;
use crate::document::{from_document, to_document};
use crate::error::StorageError;
use crate::models::user::{CreateUser, UpdateUser, User};
use crate::providers::StorageProvider;

use super::{find_as, insert_as, list_as, patch_as};

const EMAIL_FIELD: &str = "email";
const LOGIN_NAME_FIELD: &str = "loginName";

/// Provides CRUD operations and field lookups for users.
pub struct UserRepo;

impl UserRepo {
    pub async fn list(store: &dyn StorageProvider) -> Result<Vec<User>, StorageError> {
        list_as(store, Collection::Users).await
    }

    pub async fn find_by_id(
        store: &dyn StorageProvider,
        id: &str,
    ) -> Result<Option<User>, StorageError> {
        find_as(store, Collection::Users, id).await
    }

    /// Look up a user by email (case-insensitive).
    pub async fn find_by_email(
        store: &dyn StorageProvider,
        email: &str,
    ) -> Result<Option<User>, StorageError> {
        Self::find_by(store, EMAIL_FIELD, &email.to_lowercase()).await
    }

    /// Look up a user by login name (case-insensitive).
    pub async fn find_by_login_name(
        store: &dyn StorageProvider,
        login_name: &str,
    ) -> Result<Option<User>, StorageError> {
        Self::find_by(store, LOGIN_NAME_FIELD, &login_name.to_lowercase()).await
    }

    async fn find_by(
        store: &dyn StorageProvider,
        field: &str,
        value: &str,
    ) -> Result<Option<User>, StorageError> {
        store
            .find_by_field(Collection::Users, field, value)
            .await?
            .map(from_document)
            .transpose()
    }

    /// Insert a new user. Email and login name are stored lower-cased.
    pub async fn create(
        store: &dyn StorageProvider,
        input: &CreateUser,
    ) -> Result<User, StorageError> {
        let mut input = input.clone();
        input.email = input.email.to_lowercase();
        input.login_name = input.login_name.to_lowercase();
        insert_as(store, Collection::Users, to_document(&input)?).await
    }

    pub async fn update(
        store: &dyn StorageProvider,
        id: &str,
        input: &UpdateUser,
    ) -> Result<User, StorageError> {
        let mut input = input.clone();
        input.email = input.email.map(|e| e.to_lowercase());
        input.login_name = input.login_name.map(|l| l.to_lowercase());
        patch_as(store, Collection::Users, id, &input).await
    }

    pub async fn delete(store: &dyn StorageProvider, id: &str) -> Result<(), StorageError> {
        store.delete(Collection::Users, id).await
    }
}
