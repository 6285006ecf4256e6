use crate::collection::Collection;

/// Errors raised by any [`StorageProvider`](crate::StorageProvider) variant.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("{collection} record {id} not found")]
    NotFound { collection: Collection, id: String },

    #[error("{collection} record {id} already exists")]
    Conflict { collection: Collection, id: String },

    #[error("{operation} is not supported on {collection}")]
    Unsupported {
        operation: &'static str,
        collection: Collection,
    },

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Record serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Corrupt storage: {0}")]
    Corrupt(String),
}

impl StorageError {
    pub fn not_found(collection: Collection, id: &str) -> Self {
        Self::NotFound {
            collection,
            id: id.to_string(),
        }
    }
}
