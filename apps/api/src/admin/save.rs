use chrono::Utc;
use thiserror::Error;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::{Entity, ValidationError};
use crate::repository::Repository;
use crate::storage::{AssetStorage, PendingAsset, StorageError};
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Upload(#[from] StorageError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<SaveError> for AppError {
    fn from(e: SaveError) -> Self {
        match e {
            SaveError::Invalid(e) => e.into(),
            SaveError::Upload(e) => e.into(),
            SaveError::Store(e) => e.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Saved<E> {
    pub record: E,
    pub created: bool,
}

/// Upload-then-persist for one record.
///
/// A pending file is uploaded first and its URL replaces the record's asset
/// reference. A record with an id is updated in place, one without is
/// created and gets the store-assigned id. For a singleton kind, a record
/// without an id replaces the one already stored. Upload and write are not
/// transactional: if the write fails after an upload, the uploaded object
/// stays behind.
pub async fn save_record<E: Entity>(
    repo: &Repository<E>,
    assets: &dyn AssetStorage,
    mut record: E,
    pending: Option<&PendingAsset>,
) -> Result<Saved<E>, SaveError> {
    record.validate()?;

    if E::SINGLETON && record.id().is_none() {
        if let Some(existing) = repo.first().await? {
            record.set_id(existing.id().map(str::to_owned));
        }
    }

    let mut uploaded = None;
    if let Some(asset) = pending {
        match E::ASSET_FOLDER {
            Some(folder) => {
                let path = asset.storage_path(folder, Utc::now().timestamp_millis());
                let url = assets
                    .upload(&path, asset.bytes.clone(), asset.content_type.as_deref())
                    .await?;
                record.set_asset_url(url);
                uploaded = Some(path);
            }
            None => warn!(
                "{} has no asset field, ignoring file {}",
                E::LABEL,
                asset.file_name
            ),
        }
    }

    let written = match record.id().map(str::to_owned) {
        Some(id) => repo.update(&id, &record).await.map(|()| false),
        None => match repo.create(&record).await {
            Ok(id) => {
                record.set_id(Some(id));
                Ok(true)
            }
            Err(e) => Err(e),
        },
    };

    match written {
        Ok(created) => {
            info!(
                "{} {} in {}",
                if created { "Created" } else { "Updated" },
                record.id().unwrap_or_default(),
                E::COLLECTION
            );
            Ok(Saved { record, created })
        }
        Err(e) => {
            if let Some(path) = uploaded {
                warn!("Write to {} failed, asset {path} is orphaned", E::COLLECTION);
            }
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContactMessage, Project};
    use crate::store::memory::MemoryDocumentStore;
    use crate::store::testing::{shared, BrokenAssets, FailingWrites, RecordingAssets};
    use bytes::Bytes;
    use std::time::Duration;

    fn project() -> Project {
        Project {
            title: "Site".into(),
            description: "Portfolio".into(),
            ..Default::default()
        }
    }

    fn png() -> PendingAsset {
        PendingAsset::new("shot.png", Some("image/png".into()), Bytes::from_static(b"png"))
    }

    #[tokio::test]
    async fn test_upload_url_lands_in_record() {
        let repo = Repository::<Project>::new(shared(MemoryDocumentStore::new(Duration::ZERO)));
        let assets = RecordingAssets::default();

        let saved = save_record(&repo, &assets, project(), Some(&png()))
            .await
            .unwrap();

        let path = assets.uploads.lock().unwrap()[0].clone();
        assert!(path.starts_with("project_images/"));
        assert!(path.ends_with("_shot.png"));
        assert_eq!(saved.record.image_url, Some(format!("https://cdn.test/{path}")));
        assert!(saved.created);

        let stored = repo.list().await.unwrap();
        assert_eq!(stored[0].image_url, saved.record.image_url);
    }

    #[tokio::test]
    async fn test_invalid_record_touches_nothing() {
        let repo = Repository::<Project>::new(shared(MemoryDocumentStore::new(Duration::ZERO)));
        let assets = RecordingAssets::default();

        let err = save_record(&repo, &assets, Project::default(), Some(&png()))
            .await
            .unwrap_err();
        assert!(matches!(err, SaveError::Invalid(_)));
        assert!(assets.uploads.lock().unwrap().is_empty());
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_upload_skips_write() {
        let repo = Repository::<Project>::new(shared(MemoryDocumentStore::new(Duration::ZERO)));

        let err = save_record(&repo, &BrokenAssets, project(), Some(&png()))
            .await
            .unwrap_err();
        assert!(matches!(err, SaveError::Upload(_)));
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_write_after_upload_leaves_asset() {
        let store = FailingWrites::after(MemoryDocumentStore::new(Duration::ZERO), 0);
        let repo = Repository::<Project>::new(shared(store));
        let assets = RecordingAssets::default();

        let err = save_record(&repo, &assets, project(), Some(&png()))
            .await
            .unwrap_err();
        assert!(matches!(err, SaveError::Store(_)));
        assert_eq!(assets.uploads.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_asset_ignored_for_entity_without_asset_field() {
        let repo =
            Repository::<ContactMessage>::new(shared(MemoryDocumentStore::new(Duration::ZERO)));
        let assets = RecordingAssets::default();
        let msg = ContactMessage {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            message: "Hello".into(),
            ..Default::default()
        };

        let saved = save_record(&repo, &assets, msg, Some(&png())).await.unwrap();
        assert!(saved.created);
        assert!(assets.uploads.lock().unwrap().is_empty());
    }
}
