//! Test doubles for the store and asset seams.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::{Collection, Document, DocumentStore, StoreError};
use crate::storage::{AssetStorage, StorageError};

/// Delegates to an inner store until `writes_allowed` writes have happened,
/// then fails every write. Reads always delegate.
pub struct FailingWrites<S> {
    inner: S,
    writes_allowed: usize,
    writes: AtomicUsize,
}

impl<S> FailingWrites<S> {
    pub fn after(inner: S, writes_allowed: usize) -> Self {
        Self {
            inner,
            writes_allowed,
            writes: AtomicUsize::new(0),
        }
    }

    fn check(&self) -> Result<(), StoreError> {
        let n = self.writes.fetch_add(1, Ordering::SeqCst);
        if n >= self.writes_allowed {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl<S: DocumentStore> DocumentStore for FailingWrites<S> {
    async fn list(&self, collection: Collection) -> Result<Vec<Document>, StoreError> {
        self.inner.list(collection).await
    }

    async fn add(&self, collection: Collection, data: Value) -> Result<String, StoreError> {
        self.check()?;
        self.inner.add(collection, data).await
    }

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        data: Value,
    ) -> Result<(), StoreError> {
        self.check()?;
        self.inner.update(collection, id, data).await
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError> {
        self.check()?;
        self.inner.delete(collection, id).await
    }
}

/// A store whose every call fails.
pub struct BrokenStore;

#[async_trait]
impl DocumentStore for BrokenStore {
    async fn list(&self, _: Collection) -> Result<Vec<Document>, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolClosed))
    }

    async fn add(&self, _: Collection, _: Value) -> Result<String, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolClosed))
    }

    async fn update(&self, _: Collection, _: &str, _: Value) -> Result<(), StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolClosed))
    }

    async fn delete(&self, _: Collection, _: &str) -> Result<(), StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolClosed))
    }
}

/// Records every upload path and hands back a fixed CDN-style URL.
#[derive(Default)]
pub struct RecordingAssets {
    pub uploads: std::sync::Mutex<Vec<String>>,
}

#[async_trait]
impl AssetStorage for RecordingAssets {
    async fn upload(
        &self,
        path: &str,
        _bytes: bytes::Bytes,
        _content_type: Option<&str>,
    ) -> Result<String, StorageError> {
        self.uploads
            .lock()
            .map_err(|_| StorageError::Upload("poisoned".into()))?
            .push(path.to_string());
        Ok(format!("https://cdn.test/{path}"))
    }
}

pub struct BrokenAssets;

#[async_trait]
impl AssetStorage for BrokenAssets {
    async fn upload(
        &self,
        _path: &str,
        _bytes: bytes::Bytes,
        _content_type: Option<&str>,
    ) -> Result<String, StorageError> {
        Err(StorageError::Upload("bucket unreachable".into()))
    }
}

pub fn shared<S: DocumentStore + 'static>(store: S) -> Arc<dyn DocumentStore> {
    Arc::new(store)
}
