use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::models::{Entity, ValidationError};
use crate::store::{Document, DocumentStore, StoreError};

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("document body is not an object")]
    NotAnObject,

    #[error("malformed document: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Typed access to the collection of one entity kind.
pub struct Repository<E> {
    store: Arc<dyn DocumentStore>,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for Repository<E> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> Repository<E> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    /// All valid records in store order. Documents that fail to decode are
    /// skipped and logged.
    pub async fn list(&self) -> Result<Vec<E>, StoreError> {
        let docs = self.store.list(E::COLLECTION).await?;
        Ok(docs
            .into_iter()
            .filter_map(|doc| {
                let id = doc.id.clone();
                match decode::<E>(doc) {
                    Ok(record) => Some(record),
                    Err(e) => {
                        warn!("Skipping document {id} in {}: {e}", E::COLLECTION);
                        None
                    }
                }
            })
            .collect())
    }

    pub async fn first(&self) -> Result<Option<E>, StoreError> {
        Ok(self.list().await?.into_iter().next())
    }

    /// Persists a new record and returns the store-assigned identifier.
    pub async fn create(&self, record: &E) -> Result<String, StoreError> {
        self.store.add(E::COLLECTION, body(record)?).await
    }

    pub async fn update(&self, id: &str, record: &E) -> Result<(), StoreError> {
        self.store.update(E::COLLECTION, id, body(record)?).await
    }

    /// Writes only the given top-level fields.
    pub async fn patch(&self, id: &str, fields: Value) -> Result<(), StoreError> {
        self.store.update(E::COLLECTION, id, fields).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.store.delete(E::COLLECTION, id).await
    }
}

/// Decodes a stored document into a record: the document key becomes `id`
/// and the server-side creation stamp fills in a missing `createdAt`.
pub fn decode<E: Entity>(doc: Document) -> Result<E, DecodeError> {
    let Document {
        id,
        mut data,
        created_at,
        ..
    } = doc;
    let Value::Object(fields) = &mut data else {
        return Err(DecodeError::NotAnObject);
    };
    fields.insert("id".to_string(), Value::String(id));
    fields
        .entry("createdAt")
        .or_insert_with(|| Value::String(created_at.to_rfc3339()));

    let mut record: E = serde_json::from_value(data)?;
    record.normalize();
    record.validate()?;
    Ok(record)
}

/// The persisted body of a record. The identifier is the document key, so it
/// is never written into the body. Retired keys are written as null.
fn body<E: Entity>(record: &E) -> Result<Value, StoreError> {
    let mut value = serde_json::to_value(record)?;
    if let Value::Object(fields) = &mut value {
        fields.remove("id");
        for key in E::RETIRED_KEYS {
            fields.insert(key.to_string(), Value::Null);
        }
    }
    Ok(value)
}
