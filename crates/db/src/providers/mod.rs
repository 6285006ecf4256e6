//! The storage-provider capability and its three variants.
//!
//! The rest of the system only sees `Arc<dyn StorageProvider>`. Which variant
//! backs it is decided once, at startup, by [`connect`].

pub mod local;
pub mod memory;
pub mod remote;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use crate::collection::Collection;
use crate::document::Document;
use crate::error::StorageError;

pub use local::LocalStore;
pub use memory::MemoryStore;
pub use remote::PgDocumentStore;

/// Which backend variant is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Local,
    Remote,
    Memory,
}

impl BackendKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Remote => "remote",
            Self::Memory => "memory",
        }
    }
}

/// Collection/document CRUD contract shared by every backend.
///
/// `add` assigns `id` and `createdAt` when absent. `update` is a shallow
/// top-level merge and returns the stored result. `delete` is only
/// available on collections where [`Collection::supports_delete`] holds.
#[async_trait]
pub trait StorageProvider: Send + Sync {
    fn kind(&self) -> BackendKind;

    async fn get_all(&self, collection: Collection) -> Result<Vec<Document>, StorageError>;

    async fn get_by_id(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<Document>, StorageError>;

    async fn add(&self, collection: Collection, doc: Document) -> Result<Document, StorageError>;

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        patch: Document,
    ) -> Result<Document, StorageError>;

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), StorageError>;

    /// First document whose string field `field` equals `value`.
    async fn find_by_field(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> Result<Option<Document>, StorageError>;

    async fn health_check(&self) -> Result<(), StorageError>;
}

/// Guard shared by the providers' `delete` implementations.
pub(crate) fn ensure_deletable(collection: Collection) -> Result<(), StorageError> {
    if collection.supports_delete() {
        Ok(())
    } else {
        Err(StorageError::Unsupported {
            operation: "delete",
            collection,
        })
    }
}

/// Backend selection read from the environment.
#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// JSON files under a directory.
    Local { dir: PathBuf },
    /// PostgreSQL document table.
    Remote {
        database_url: String,
        max_connections: u32,
    },
}

/// Default directory for the local store.
pub const DEFAULT_LOCAL_DIR: &str = "./data";

/// Default pool size for the remote store.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 20;

impl StorageConfig {
    /// Load the backend selection from environment variables.
    ///
    /// | Env Var             | Default  |
    /// |---------------------|----------|
    /// | `STORAGE_BACKEND`   | `local`  |
    /// | `LOCAL_STORAGE_DIR` | `./data` |
    /// | `DATABASE_URL`      | required when `remote` |
    ///
    /// # Panics
    ///
    /// Panics on an unknown backend name or when `remote` is selected without
    /// a `DATABASE_URL`.
    pub fn from_env() -> Self {
        let backend = std::env::var("STORAGE_BACKEND").unwrap_or_else(|_| "local".into());
        match backend.trim().to_ascii_lowercase().as_str() {
            "local" => Self::Local {
                dir: std::env::var("LOCAL_STORAGE_DIR")
                    .unwrap_or_else(|_| DEFAULT_LOCAL_DIR.into())
                    .into(),
            },
            "remote" => Self::Remote {
                database_url: std::env::var("DATABASE_URL")
                    .expect("DATABASE_URL must be set when STORAGE_BACKEND=remote"),
                max_connections: DEFAULT_MAX_CONNECTIONS,
            },
            other => panic!("Unknown STORAGE_BACKEND '{other}'. Must be one of: local, remote"),
        }
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            Self::Local { .. } => BackendKind::Local,
            Self::Remote { .. } => BackendKind::Remote,
        }
    }
}

/// Build the configured provider. Remote stores are migrated before use.
pub async fn connect(config: &StorageConfig) -> Result<Arc<dyn StorageProvider>, StorageError> {
    match config {
        StorageConfig::Local { dir } => {
            let store = LocalStore::open(dir)?;
            tracing::info!(dir = %dir.display(), "Local storage opened");
            Ok(Arc::new(store))
        }
        StorageConfig::Remote {
            database_url,
            max_connections,
        } => {
            let store = PgDocumentStore::connect(database_url, *max_connections).await?;
            store.run_migrations().await?;
            tracing::info!("Remote document store connected and migrated");
            Ok(Arc::new(store))
        }
    }
}
