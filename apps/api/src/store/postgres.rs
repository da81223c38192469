use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::{Collection, Document, DocumentStore, StoreError};

const SCHEMA: [&str; 2] = [
    r#"
    CREATE TABLE IF NOT EXISTS documents (
        id TEXT PRIMARY KEY,
        collection TEXT NOT NULL,
        seq BIGSERIAL NOT NULL,
        data JSONB NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ
    )
    "#,
    "CREATE INDEX IF NOT EXISTS documents_collection_seq ON documents (collection, seq)",
];

/// PostgreSQL-backed document store. One JSONB table holds every collection.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    /// Wraps an existing pool and creates the documents table if missing.
    pub async fn from_pool(pool: PgPool) -> Result<Self, StoreError> {
        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<(), StoreError> {
        for ddl in SCHEMA {
            sqlx::query(ddl).execute(&self.pool).await?;
        }
        info!("Document schema ready");
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn list(&self, collection: Collection) -> Result<Vec<Document>, StoreError> {
        Ok(sqlx::query_as::<_, Document>(
            r#"
            SELECT id, data, created_at, updated_at
            FROM documents
            WHERE collection = $1
            ORDER BY seq ASC
            "#,
        )
        .bind(collection.as_str())
        .fetch_all(&self.pool)
        .await?)
    }

    async fn add(&self, collection: Collection, data: Value) -> Result<String, StoreError> {
        if !data.is_object() {
            return Err(StoreError::NotAnObject);
        }
        let id = Uuid::new_v4().simple().to_string();

        sqlx::query("INSERT INTO documents (id, collection, data) VALUES ($1, $2, $3)")
            .bind(&id)
            .bind(collection.as_str())
            .bind(&data)
            .execute(&self.pool)
            .await?;

        info!("Added document {id} to {collection}");
        Ok(id)
    }

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        data: Value,
    ) -> Result<(), StoreError> {
        if !data.is_object() {
            return Err(StoreError::NotAnObject);
        }

        // `||` merges top-level keys, mirroring a field-level update.
        let result = sqlx::query(
            r#"
            UPDATE documents
            SET data = data || $3, updated_at = now()
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection.as_str())
        .bind(id)
        .bind(&data)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                collection,
                id: id.to_string(),
            });
        }

        info!("Updated document {id} in {collection}");
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;

        info!("Deleted document {id} from {collection}");
        Ok(())
    }
}
