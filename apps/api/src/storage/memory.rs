use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;
use tracing::info;

use super::{AssetStorage, StorageError};

/// Route prefix under which demo assets are served.
pub const DEMO_ASSET_PREFIX: &str = "/demo-assets";

#[derive(Debug, Clone)]
pub struct StoredAsset {
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Demo-mode asset storage. Files stay in memory and are served back by the
/// `/demo-assets/*path` route, so returned URLs still resolve.
pub struct MemoryAssetStorage {
    base_url: String,
    latency: Duration,
    assets: RwLock<HashMap<String, StoredAsset>>,
}

impl MemoryAssetStorage {
    pub fn new(base_url: &str, latency: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            latency,
            assets: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get(&self, path: &str) -> Option<StoredAsset> {
        self.assets.read().await.get(path).cloned()
    }
}

#[async_trait]
impl AssetStorage for MemoryAssetStorage {
    async fn upload(
        &self,
        path: &str,
        bytes: Bytes,
        content_type: Option<&str>,
    ) -> Result<String, StorageError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if bytes.is_empty() {
            return Err(StorageError::Empty(path.to_string()));
        }

        info!("Demo mode: file upload to {path} ({} bytes)", bytes.len());
        self.assets.write().await.insert(
            path.to_string(),
            StoredAsset {
                content_type: content_type.map(str::to_string),
                bytes,
            },
        );
        Ok(format!("{}{}/{}", self.base_url, DEMO_ASSET_PREFIX, path))
    }
}
