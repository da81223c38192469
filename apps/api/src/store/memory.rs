use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use super::{Collection, Document, DocumentStore, StoreError};

/// Demo-mode store. Documents live in process memory and vanish on restart;
/// every call sleeps for the configured latency first.
pub struct MemoryDocumentStore {
    latency: Duration,
    collections: RwLock<HashMap<Collection, Vec<Document>>>,
}

impl MemoryDocumentStore {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            collections: RwLock::new(HashMap::new()),
        }
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn list(&self, collection: Collection) -> Result<Vec<Document>, StoreError> {
        self.simulate_latency().await;
        let collections = self.collections.read().await;
        Ok(collections.get(&collection).cloned().unwrap_or_default())
    }

    async fn add(&self, collection: Collection, data: Value) -> Result<String, StoreError> {
        self.simulate_latency().await;
        if !data.is_object() {
            return Err(StoreError::NotAnObject);
        }

        let id = format!("demo-{}", Uuid::new_v4().simple());
        info!("Demo mode: add document {id} to {collection}");

        self.collections
            .write()
            .await
            .entry(collection)
            .or_default()
            .push(Document {
                id: id.clone(),
                data,
                created_at: Utc::now(),
                updated_at: None,
            });
        Ok(id)
    }

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        data: Value,
    ) -> Result<(), StoreError> {
        self.simulate_latency().await;
        let Value::Object(fields) = data else {
            return Err(StoreError::NotAnObject);
        };
        info!("Demo mode: update document {id} in {collection}");

        let mut collections = self.collections.write().await;
        let doc = collections
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|d| d.id == id))
            .ok_or_else(|| StoreError::NotFound {
                collection,
                id: id.to_string(),
            })?;

        match &mut doc.data {
            Value::Object(existing) => existing.extend(fields),
            other => *other = Value::Object(fields),
        }
        doc.updated_at = Some(Utc::now());
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError> {
        self.simulate_latency().await;
        info!("Demo mode: delete document {id} from {collection}");

        if let Some(docs) = self.collections.write().await.get_mut(&collection) {
            docs.retain(|d| d.id != id);
        }
        Ok(())
    }
}
