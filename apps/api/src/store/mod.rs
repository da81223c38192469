//! Document store seam.
//!
//! Every collection is a flat list of JSON documents keyed by a store-assigned
//! identifier. The live backend is PostgreSQL (`postgres`), the demo backend
//! keeps documents in process memory (`memory`).

pub mod memory;
pub mod postgres;

#[cfg(test)]
pub mod testing;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use sqlx::FromRow;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    About,
    Education,
    Experience,
    Certifications,
    Projects,
    Contacts,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::About => "about",
            Collection::Education => "education",
            Collection::Experience => "experience",
            Collection::Certifications => "certifications",
            Collection::Projects => "projects",
            Collection::Contacts => "contacts",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored document as returned by the store, in collection iteration order.
#[derive(Debug, Clone, FromRow)]
pub struct Document {
    pub id: String,
    pub data: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Document {id} not found in {collection}")]
    NotFound { collection: Collection, id: String },

    #[error("Document body must be a JSON object")]
    NotAnObject,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Read/write access to document collections.
///
/// `update` merges the given top-level fields into the stored body
/// (last write wins). `delete` of an unknown id succeeds.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn list(&self, collection: Collection) -> Result<Vec<Document>, StoreError>;

    /// Inserts a new document and returns its assigned identifier.
    async fn add(&self, collection: Collection, data: Value) -> Result<String, StoreError>;

    async fn update(&self, collection: Collection, id: &str, data: Value)
        -> Result<(), StoreError>;

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError>;
}
