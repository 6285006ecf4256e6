//! Remote document store on PostgreSQL.
//!
//! All five collections share one `documents` table with a JSONB body.
//! Updates use `body || patch`, which is the same shallow top-level merge the
//! other variants apply.

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::PgPool;

use super::{ensure_deletable, BackendKind, StorageProvider};
use crate::collection::Collection;
use crate::document::{stamp_new, Document, ID_FIELD};
use crate::error::StorageError;

pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    /// Create a connection pool from a database URL.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    /// Wrap an existing pool (used by `#[sqlx::test]`).
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<(), StorageError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl StorageProvider for PgDocumentStore {
    fn kind(&self) -> BackendKind {
        BackendKind::Remote
    }

    async fn get_all(&self, collection: Collection) -> Result<Vec<Document>, StorageError> {
        let rows = sqlx::query_scalar::<_, Json<Document>>(
            "SELECT body FROM documents WHERE collection = $1 ORDER BY seq ASC",
        )
        .bind(collection.name())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|Json(doc)| doc).collect())
    }

    async fn get_by_id(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<Document>, StorageError> {
        let row = sqlx::query_scalar::<_, Json<Document>>(
            "SELECT body FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection.name())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|Json(doc)| doc))
    }

    async fn add(
        &self,
        collection: Collection,
        mut doc: Document,
    ) -> Result<Document, StorageError> {
        let id = stamp_new(&mut doc);
        let row = sqlx::query_scalar::<_, Json<Document>>(
            "INSERT INTO documents (collection, id, body)
             VALUES ($1, $2, $3)
             ON CONFLICT (collection, id) DO NOTHING
             RETURNING body",
        )
        .bind(collection.name())
        .bind(&id)
        .bind(Json(&doc))
        .fetch_optional(&self.pool)
        .await?;
        match row {
            Some(Json(stored)) => Ok(stored),
            None => Err(StorageError::Conflict { collection, id }),
        }
    }

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        mut patch: Document,
    ) -> Result<Document, StorageError> {
        patch.remove(ID_FIELD);
        let row = sqlx::query_scalar::<_, Json<Document>>(
            "UPDATE documents SET body = body || $3, updated_at = NOW()
             WHERE collection = $1 AND id = $2
             RETURNING body",
        )
        .bind(collection.name())
        .bind(id)
        .bind(Json(&patch))
        .fetch_optional(&self.pool)
        .await?;
        row.map(|Json(doc)| doc)
            .ok_or_else(|| StorageError::not_found(collection, id))
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), StorageError> {
        ensure_deletable(collection)?;
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection.name())
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StorageError::not_found(collection, id));
        }
        Ok(())
    }

    async fn find_by_field(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> Result<Option<Document>, StorageError> {
        let row = sqlx::query_scalar::<_, Json<Document>>(
            "SELECT body FROM documents
             WHERE collection = $1 AND body ->> $2 = $3
             ORDER BY seq ASC
             LIMIT 1",
        )
        .bind(collection.name())
        .bind(field)
        .bind(value)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|Json(doc)| doc))
    }

    async fn health_check(&self) -> Result<(), StorageError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }
}
