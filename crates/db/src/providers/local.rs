//! Local file store: one JSON file per collection.
//!
//! `<dir>/<collection>.json` holds a JSON object of records keyed by id, in
//! insertion order. Every operation reads the file, and every write replaces
//! it through a temp-file rename, so the directory is always a complete
//! snapshot. File access is blocking, serialized by a mutex, and runs on the
//! blocking thread pool rather than the async workers.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;

use super::{ensure_deletable, BackendKind, StorageProvider};
use crate::collection::Collection;
use crate::document::{merge, stamp_new, Document};
use crate::error::StorageError;

type Records = IndexMap<String, Document>;

pub struct LocalStore {
    inner: Arc<Files>,
}

/// The store directory and the lock every file access holds.
struct Files {
    dir: PathBuf,
    lock: Mutex<()>,
}

impl Files {
    fn path_for(&self, collection: Collection) -> PathBuf {
        self.dir.join(format!("{}.json", collection.name()))
    }

    fn read(&self, collection: Collection) -> Result<Records, StorageError> {
        let path = self.path_for(collection);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Records::new()),
            Err(e) => return Err(e.into()),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Records::new());
        }
        serde_json::from_slice(&bytes).map_err(|e| {
            StorageError::Corrupt(format!("{}: {e}", path.display()))
        })
    }

    fn write(&self, collection: Collection, records: &Records) -> Result<(), StorageError> {
        let path = self.path_for(collection);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(records)?)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn with_records<T>(
        &self,
        collection: Collection,
        f: impl FnOnce(&mut Records) -> Result<(T, bool), StorageError>,
    ) -> Result<T, StorageError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| StorageError::Corrupt("local store lock poisoned".into()))?;
        let mut records = self.read(collection)?;
        let (out, dirty) = f(&mut records)?;
        if dirty {
            self.write(collection, &records)?;
        }
        Ok(out)
    }
}

impl LocalStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            inner: Arc::new(Files {
                dir,
                lock: Mutex::new(()),
            }),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.inner.dir
    }

    /// Run `f` with exclusive access to the collection's records on the
    /// blocking pool. `f` returns its output and whether to write back.
    async fn with_records<T, F>(&self, collection: Collection, f: F) -> Result<T, StorageError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Records) -> Result<(T, bool), StorageError> + Send + 'static,
    {
        let files = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || files.with_records(collection, f))
            .await
            .map_err(|e| {
                StorageError::Io(std::io::Error::other(format!("local store task failed: {e}")))
            })?
    }
}

#[async_trait]
impl StorageProvider for LocalStore {
    fn kind(&self) -> BackendKind {
        BackendKind::Local
    }

    async fn get_all(&self, collection: Collection) -> Result<Vec<Document>, StorageError> {
        self.with_records(collection, |records| {
            Ok((records.values().cloned().collect(), false))
        })
        .await
    }

    async fn get_by_id(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<Document>, StorageError> {
        let id = id.to_string();
        self.with_records(collection, move |records| {
            Ok((records.get(&id).cloned(), false))
        })
        .await
    }

    async fn add(
        &self,
        collection: Collection,
        mut doc: Document,
    ) -> Result<Document, StorageError> {
        let id = stamp_new(&mut doc);
        self.with_records(collection, move |records| {
            if records.contains_key(&id) {
                return Err(StorageError::Conflict { collection, id });
            }
            records.insert(id.clone(), doc.clone());
            tracing::debug!(%collection, %id, "Local record added");
            Ok((doc, true))
        })
        .await
    }

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        patch: Document,
    ) -> Result<Document, StorageError> {
        let id = id.to_string();
        self.with_records(collection, move |records| {
            let doc = records
                .get_mut(&id)
                .ok_or_else(|| StorageError::not_found(collection, &id))?;
            merge(doc, patch);
            Ok((doc.clone(), true))
        })
        .await
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), StorageError> {
        ensure_deletable(collection)?;
        let id = id.to_string();
        self.with_records(collection, move |records| {
            records
                .shift_remove(&id)
                .ok_or_else(|| StorageError::not_found(collection, &id))?;
            Ok(((), true))
        })
        .await
    }

    async fn find_by_field(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> Result<Option<Document>, StorageError> {
        let (field, value) = (field.to_string(), value.to_string());
        self.with_records(collection, move |records| {
            let found = records
                .values()
                .find(|doc| doc.get(&field).and_then(Value::as_str) == Some(value.as_str()))
                .cloned();
            Ok((found, false))
        })
        .await
    }

    async fn health_check(&self) -> Result<(), StorageError> {
        let meta = tokio::fs::metadata(&self.inner.dir).await?;
        if meta.is_dir() {
            Ok(())
        } else {
            Err(StorageError::Corrupt(format!(
                "{} is not a directory",
                self.inner.dir.display()
            )))
        }
    }
}
