//! In-memory fake provider for tests.
//!
//! Behaves like the other variants and additionally lets a test make reads
//! or writes of a collection fail, or hold the next read's result back for
//! a while so overlapping refreshes can complete out of order.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;
use tokio::sync::{Mutex, RwLock};

use super::{ensure_deletable, BackendKind, StorageProvider};
use crate::collection::Collection;
use crate::document::{merge, stamp_new, Document};
use crate::error::StorageError;

#[derive(Default)]
pub struct MemoryStore {
    data: RwLock<HashMap<Collection, IndexMap<String, Document>>>,
    failing: Mutex<HashSet<Collection>>,
    failing_writes: Mutex<HashSet<Collection>>,
    delays: Mutex<HashMap<Collection, Duration>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every read of `collection` fail until [`clear_failures`](Self::clear_failures).
    pub async fn fail_reads(&self, collection: Collection) {
        self.failing.lock().await.insert(collection);
    }

    /// Make every add, update and delete on `collection` fail.
    pub async fn fail_writes(&self, collection: Collection) {
        self.failing_writes.lock().await.insert(collection);
    }

    pub async fn clear_failures(&self) {
        self.failing.lock().await.clear();
        self.failing_writes.lock().await.clear();
    }

    /// Delay delivery of the next `get_all(collection)` by `delay`.
    ///
    /// The records are read first and returned after the delay, so the
    /// caller receives a snapshot that may be older than the store.
    pub async fn delay_next_read(&self, collection: Collection, delay: Duration) {
        self.delays.lock().await.insert(collection, delay);
    }

    async fn check_readable(&self, collection: Collection) -> Result<(), StorageError> {
        if self.failing.lock().await.contains(&collection) {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                format!("injected read failure on {collection}"),
            )));
        }
        Ok(())
    }

    async fn check_writable(&self, collection: Collection) -> Result<(), StorageError> {
        if self.failing_writes.lock().await.contains(&collection) {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                format!("injected write failure on {collection}"),
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl StorageProvider for MemoryStore {
    fn kind(&self) -> BackendKind {
        BackendKind::Memory
    }

    async fn get_all(&self, collection: Collection) -> Result<Vec<Document>, StorageError> {
        self.check_readable(collection).await?;
        let records: Vec<Document> = self
            .data
            .read()
            .await
            .get(&collection)
            .map(|records| records.values().cloned().collect())
            .unwrap_or_default();
        let delay = self.delays.lock().await.remove(&collection);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(records)
    }

    async fn get_by_id(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<Document>, StorageError> {
        self.check_readable(collection).await?;
        Ok(self
            .data
            .read()
            .await
            .get(&collection)
            .and_then(|records| records.get(id).cloned()))
    }

    async fn add(
        &self,
        collection: Collection,
        mut doc: Document,
    ) -> Result<Document, StorageError> {
        self.check_writable(collection).await?;
        let id = stamp_new(&mut doc);
        let mut data = self.data.write().await;
        let records = data.entry(collection).or_default();
        if records.contains_key(&id) {
            return Err(StorageError::Conflict { collection, id });
        }
        records.insert(id, doc.clone());
        Ok(doc)
    }

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        patch: Document,
    ) -> Result<Document, StorageError> {
        self.check_writable(collection).await?;
        let mut data = self.data.write().await;
        let doc = data
            .get_mut(&collection)
            .and_then(|records| records.get_mut(id))
            .ok_or_else(|| StorageError::not_found(collection, id))?;
        merge(doc, patch);
        Ok(doc.clone())
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), StorageError> {
        ensure_deletable(collection)?;
        self.check_writable(collection).await?;
        self.data
            .write()
            .await
            .get_mut(&collection)
            .and_then(|records| records.shift_remove(id))
            .map(|_| ())
            .ok_or_else(|| StorageError::not_found(collection, id))
    }

    async fn find_by_field(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> Result<Option<Document>, StorageError> {
        self.check_readable(collection).await?;
        Ok(self.data.read().await.get(&collection).and_then(|records| {
            records
                .values()
                .find(|doc| doc.get(field).and_then(Value::as_str) == Some(value))
                .cloned()
        }))
    }

    async fn health_check(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => unreachable!("test documents are objects"),
        }
    }

    #[tokio::test]
    async fn injected_failure_blocks_reads_not_writes() {
        let store = MemoryStore::new();
        store.fail_reads(Collection::Users).await;
        assert!(store.get_all(Collection::Users).await.is_err());
        assert!(store
            .add(Collection::Users, doc(json!({"name": "x"})))
            .await
            .is_ok());
        store.clear_failures().await;
        assert_eq!(store.get_all(Collection::Users).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn injected_write_failure_leaves_records_untouched() {
        let store = MemoryStore::new();
        let added = store
            .add(Collection::Notices, doc(json!({"title": "Lift"})))
            .await
            .unwrap();
        let id = added["id"].as_str().unwrap().to_string();

        store.fail_writes(Collection::Notices).await;
        assert!(store
            .add(Collection::Notices, doc(json!({"title": "Gym"})))
            .await
            .is_err());
        assert!(store
            .update(Collection::Notices, &id, doc(json!({"title": "Pool"})))
            .await
            .is_err());
        assert!(store.delete(Collection::Notices, &id).await.is_err());

        let records = store.get_all(Collection::Notices).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["title"], "Lift");
    }

    #[tokio::test]
    async fn duplicate_id_is_conflict() {
        let store = MemoryStore::new();
        store
            .add(Collection::Notices, doc(json!({"id": "n1"})))
            .await
            .unwrap();
        let err = store
            .add(Collection::Notices, doc(json!({"id": "n1"})))
            .await
            .unwrap_err();
        assert_matches!(err, StorageError::Conflict { .. });
    }

    #[tokio::test]
    async fn find_by_field_matches_exact_string() {
        let store = MemoryStore::new();
        store
            .add(Collection::Users, doc(json!({"email": "a@x.io"})))
            .await
            .unwrap();
        assert!(store
            .find_by_field(Collection::Users, "email", "a@x.io")
            .await
            .unwrap()
            .is_some());
        assert!(store
            .find_by_field(Collection::Users, "email", "b@x.io")
            .await
            .unwrap()
            .is_none());
    }
}
