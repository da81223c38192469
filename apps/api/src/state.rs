use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::admin::auth::{AuthProvider, DemoAuth, SessionStore, StaticCredentials};
use crate::config::{Config, ContactBackend, LiveBackend};
use crate::contact::relay::RelayDelivery;
use crate::contact::{ContactDelivery, StoreDelivery};
use crate::db::create_pool;
use crate::models::Entity;
use crate::repository::Repository;
use crate::storage::memory::MemoryAssetStorage;
use crate::storage::s3::S3AssetStorage;
use crate::storage::AssetStorage;
use crate::store::memory::MemoryDocumentStore;
use crate::store::postgres::PgDocumentStore;
use crate::store::DocumentStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub assets: Arc<dyn AssetStorage>,
    /// Set in demo mode so `/demo-assets` can serve uploaded files back.
    pub demo_assets: Option<Arc<MemoryAssetStorage>>,
    pub auth: Arc<dyn AuthProvider>,
    pub sessions: SessionStore,
    pub contact: Arc<dyn ContactDelivery>,
    pub config: Config,
}

impl AppState {
    pub async fn from_config(config: Config) -> Result<Self> {
        match config.backend.clone() {
            Some(backend) => Self::live(config, &backend).await,
            None => Ok(Self::demo(config)),
        }
    }

    /// PostgreSQL documents, S3 assets and the configured admin account.
    pub async fn live(config: Config, backend: &LiveBackend) -> Result<Self> {
        let pool = create_pool(&backend.database_url).await?;
        let store: Arc<dyn DocumentStore> = Arc::new(PgDocumentStore::from_pool(pool).await?);
        info!("Document store: PostgreSQL");

        let assets: Arc<dyn AssetStorage> = Arc::new(S3AssetStorage::from_config(backend).await);
        info!("Asset storage: S3 bucket {}", backend.s3_bucket);

        let auth: Arc<dyn AuthProvider> = Arc::new(StaticCredentials::new(
            backend.admin_email.clone(),
            backend.admin_password.clone(),
        ));

        Ok(Self::assemble(config, store, assets, None, auth))
    }

    /// In-memory backends with simulated latency; nothing survives a restart.
    pub fn demo(config: Config) -> Self {
        info!(
            "Demo mode: no DATABASE_URL set, using in-memory backends ({}ms latency)",
            config.demo_latency.as_millis()
        );
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new(config.demo_latency));
        let demo_assets = Arc::new(MemoryAssetStorage::new(
            &config.public_base_url,
            config.demo_latency,
        ));
        let auth: Arc<dyn AuthProvider> = Arc::new(DemoAuth::new(config.demo_latency));

        Self::assemble(config, store, demo_assets.clone(), Some(demo_assets), auth)
    }

    fn assemble(
        config: Config,
        store: Arc<dyn DocumentStore>,
        assets: Arc<dyn AssetStorage>,
        demo_assets: Option<Arc<MemoryAssetStorage>>,
        auth: Arc<dyn AuthProvider>,
    ) -> Self {
        let contact: Arc<dyn ContactDelivery> = match &config.contact {
            ContactBackend::Store => Arc::new(StoreDelivery::new(Repository::new(store.clone()))),
            ContactBackend::Relay {
                endpoint,
                access_key,
            } => Arc::new(RelayDelivery::new(endpoint.clone(), access_key.clone())),
        };
        info!("Contact delivery: {}", contact.name());

        Self {
            sessions: SessionStore::new(config.session_ttl),
            store,
            assets,
            demo_assets,
            auth,
            contact,
            config,
        }
    }

    pub fn repo<E: Entity>(&self) -> Repository<E> {
        Repository::new(self.store.clone())
    }

    /// Whether the public site should query the store at all.
    pub fn is_demo(&self) -> bool {
        self.config.is_demo()
    }
}
