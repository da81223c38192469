//! Object storage seam for uploaded images and logos.

pub mod memory;
pub mod s3;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Empty upload for {0}")]
    Empty(String),
}

/// Uploads a binary under `path` and returns a durable URL for it.
#[async_trait]
pub trait AssetStorage: Send + Sync {
    async fn upload(
        &self,
        path: &str,
        bytes: Bytes,
        content_type: Option<&str>,
    ) -> Result<String, StorageError>;
}

/// A file chosen in the admin console but not uploaded yet.
#[derive(Debug, Clone)]
pub struct PendingAsset {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl PendingAsset {
    pub fn new(file_name: impl Into<String>, content_type: Option<String>, bytes: Bytes) -> Self {
        Self {
            file_name: file_name.into(),
            content_type,
            bytes,
        }
    }

    /// Object key for this file: `<folder>/<epoch-ms>_<file name>`.
    pub fn storage_path(&self, folder: &str, epoch_ms: i64) -> String {
        asset_path(folder, epoch_ms, &self.file_name)
    }
}

/// Builds the upload key. Only the final component of the client-supplied
/// name is kept so a name cannot climb out of its folder.
pub fn asset_path(folder: &str, epoch_ms: i64, file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .find(|s| !s.is_empty())
        .unwrap_or("upload");
    let base = if base == ".." || base == "." {
        "upload"
    } else {
        base
    };
    format!("{folder}/{epoch_ms}_{base}")
}
