use std::sync::Arc;

use serde::Serialize;
use tracing::error;

use super::notice::Notice;
use super::save::save_record;
use crate::models::Entity;
use crate::repository::Repository;
use crate::storage::{AssetStorage, PendingAsset};

/// What the asset preview should show.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Preview {
    /// A file picked locally and not uploaded yet.
    Pending { file_name: String, size: usize },
    /// The asset URL already saved on the record.
    Stored { url: String },
}

/// Editing state for one entity kind: a draft plus a mirror of the stored
/// list. The list is only changed after the store confirms a write.
pub struct AdminForm<E: Entity> {
    repo: Repository<E>,
    assets: Arc<dyn AssetStorage>,
    items: Vec<E>,
    draft: E,
    staged_item: String,
    pending: Option<PendingAsset>,
    editing: bool,
}

impl<E: Entity> AdminForm<E> {
    pub fn new(repo: Repository<E>, assets: Arc<dyn AssetStorage>) -> Self {
        Self {
            repo,
            assets,
            items: Vec::new(),
            draft: E::default(),
            staged_item: String::new(),
            pending: None,
            editing: false,
        }
    }

    pub async fn load(&mut self) -> Option<Notice> {
        match self.repo.list().await {
            Ok(items) => {
                self.items = items;
                None
            }
            Err(e) => {
                error!("Error fetching {} data: {e}", E::COLLECTION);
                self.items.clear();
                Some(Notice::error(format!(
                    "Could not fetch {} data. Please try again.",
                    E::COLLECTION
                )))
            }
        }
    }

    pub fn items(&self) -> &[E] {
        &self.items
    }

    pub fn draft(&self) -> &E {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut E {
        &mut self.draft
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn staged_item(&self) -> &str {
        &self.staged_item
    }

    pub fn set_staged_item(&mut self, text: impl Into<String>) {
        self.staged_item = text.into();
    }

    /// Appends the trimmed staging text to the draft's list field and clears
    /// the staging text. Blank input is ignored.
    pub fn add_staged_item(&mut self) -> bool {
        let item = self.staged_item.trim();
        if item.is_empty() {
            return false;
        }
        let item = item.to_string();
        match self.draft.list_items_mut() {
            Some(list) => {
                list.push(item);
                self.staged_item.clear();
                true
            }
            None => false,
        }
    }

    pub fn remove_item(&mut self, index: usize) {
        if let Some(list) = self.draft.list_items_mut() {
            if index < list.len() {
                list.remove(index);
            }
        }
    }

    pub fn select_asset(&mut self, asset: PendingAsset) {
        self.pending = Some(asset);
    }

    pub fn preview(&self) -> Option<Preview> {
        match &self.pending {
            Some(asset) => Some(Preview::Pending {
                file_name: asset.file_name.clone(),
                size: asset.bytes.len(),
            }),
            None => self.draft.asset_url().map(|url| Preview::Stored {
                url: url.to_string(),
            }),
        }
    }

    pub async fn submit(&mut self) -> Notice {
        let draft = self.draft.clone();
        match save_record(&self.repo, self.assets.as_ref(), draft, self.pending.as_ref()).await {
            Ok(saved) => {
                let id = saved.record.id().map(str::to_owned);
                if saved.created {
                    self.items.push(saved.record);
                } else if let Some(slot) = self
                    .items
                    .iter_mut()
                    .find(|item| item.id().is_some() && item.id() == id.as_deref())
                {
                    *slot = saved.record;
                }
                self.reset();
                Notice::success(format!(
                    "{} {} successfully.",
                    E::LABEL,
                    if saved.created { "added" } else { "updated" }
                ))
            }
            Err(e) => {
                error!("Error saving {} data: {e}", E::COLLECTION);
                Notice::error(format!(
                    "Could not save {}. Please try again.",
                    E::LABEL.to_lowercase()
                ))
            }
        }
    }

    /// Loads a listed record into the draft and switches to update mode.
    pub fn edit(&mut self, id: &str) -> bool {
        let Some(item) = self.items.iter().find(|item| item.id() == Some(id)) else {
            return false;
        };
        self.draft = item.clone();
        self.staged_item.clear();
        self.pending = None;
        self.editing = true;
        true
    }

    pub fn cancel(&mut self) {
        self.reset();
    }

    pub async fn delete(&mut self, id: &str) -> Notice {
        match self.repo.delete(id).await {
            Ok(()) => {
                self.items.retain(|item| item.id() != Some(id));
                Notice::success(format!("{} deleted successfully.", E::LABEL))
            }
            Err(e) => {
                error!("Error deleting {} {id}: {e}", E::COLLECTION);
                Notice::error(format!(
                    "Could not delete {}. Please try again.",
                    E::LABEL.to_lowercase()
                ))
            }
        }
    }

    fn reset(&mut self) {
        self.draft = E::default();
        self.staged_item.clear();
        self.pending = None;
        self.editing = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{About, Certification, Education, Experience, Project};
    use crate::store::memory::MemoryDocumentStore;
    use crate::store::testing::{
        shared, BrokenAssets, BrokenStore, FailingWrites, RecordingAssets,
    };
    use crate::store::DocumentStore;
    use bytes::Bytes;
    use std::time::Duration;

    fn memory() -> Arc<dyn DocumentStore> {
        shared(MemoryDocumentStore::new(Duration::ZERO))
    }

    fn form<E: Entity>(store: Arc<dyn DocumentStore>) -> AdminForm<E> {
        AdminForm::new(Repository::new(store), Arc::new(RecordingAssets::default()))
    }

    fn about(name: &str) -> About {
        About {
            name: name.into(),
            title: "Engineer".into(),
            bio: "Builds things".into(),
            ..Default::default()
        }
    }

    fn education(degree: &str) -> Education {
        Education {
            degree: degree.into(),
            institution: "Uni".into(),
            start_date: "2018".into(),
            end_date: "2021".into(),
            ..Default::default()
        }
    }

    fn experience(title: &str) -> Experience {
        Experience {
            title: title.into(),
            company: "Acme".into(),
            location: "Remote".into(),
            start_date: "2022".into(),
            end_date: "Present".into(),
            ..Default::default()
        }
    }

    fn certification(title: &str) -> Certification {
        Certification {
            title: title.into(),
            issuer: "Issuer".into(),
            issue_date: "2023".into(),
            ..Default::default()
        }
    }

    fn project(title: &str) -> Project {
        Project {
            title: title.into(),
            description: "Description".into(),
            ..Default::default()
        }
    }

    /// Create, update and delete through the form, checking the list mirror
    /// after each step. `rename` changes one field of a record.
    async fn exercise_crud<E: Entity + PartialEq>(make: fn(&str) -> E, rename: fn(&mut E)) {
        let store = memory();
        let mut form = form::<E>(store.clone());
        assert!(form.load().await.is_none());

        *form.draft_mut() = make("first");
        assert!(form.submit().await.is_success());
        *form.draft_mut() = make("second");
        assert!(form.submit().await.is_success());

        // Create: one new entry per submit, carrying the store-assigned id.
        let stored = store.list(E::COLLECTION).await.unwrap();
        assert_eq!(form.items().len(), 2);
        for (item, doc) in form.items().iter().zip(&stored) {
            assert_eq!(item.id(), Some(doc.id.as_str()));
        }
        assert!(form.draft().id().is_none());

        // Update: only the targeted entry changes.
        let first_id = form.items()[0].id().unwrap().to_string();
        let second_before = form.items()[1].clone();
        assert!(form.edit(&first_id));
        assert!(form.is_editing());
        rename(form.draft_mut());
        let expected = form.draft().clone();
        assert!(form.submit().await.is_success());
        assert!(!form.is_editing());
        assert_eq!(form.items().len(), 2);
        assert_eq!(form.items()[0], expected);
        assert_eq!(form.items()[0].id(), Some(first_id.as_str()));
        assert_eq!(form.items()[1], second_before);

        // Delete: exactly that id goes.
        let second_id = second_before.id().unwrap().to_string();
        assert!(form.delete(&first_id).await.is_success());
        let ids: Vec<_> = form.items().iter().map(|i| i.id().unwrap()).collect();
        assert_eq!(ids, vec![second_id.as_str()]);
        assert_eq!(store.list(E::COLLECTION).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_about_stays_a_single_record() {
        let store = memory();
        let mut form = form::<About>(store.clone());
        form.load().await;

        *form.draft_mut() = about("first");
        assert_eq!(form.submit().await.description, "About information added successfully.");
        let id = form.items()[0].id().unwrap().to_string();

        // A second create replaces the stored record instead of adding one.
        *form.draft_mut() = about("second");
        assert_eq!(form.submit().await.description, "About information updated successfully.");
        assert_eq!(form.items().len(), 1);
        assert_eq!(form.items()[0].id(), Some(id.as_str()));
        assert_eq!(form.items()[0].name, "second");

        let stored = Repository::<About>::new(store.clone()).list().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].name, "second");

        assert!(form.edit(&id));
        form.draft_mut().bio = "Rewritten".into();
        assert!(form.submit().await.is_success());
        assert_eq!(form.items()[0].bio, "Rewritten");

        assert!(form.delete(&id).await.is_success());
        assert!(form.items().is_empty());
        assert!(store.list(About::COLLECTION).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_crud_education() {
        exercise_crud(education, |e| e.end_date = "2022".into()).await;
    }

    #[tokio::test]
    async fn test_crud_experience() {
        exercise_crud(experience, |e| e.company = "Globex".into()).await;
    }

    #[tokio::test]
    async fn test_crud_certification() {
        exercise_crud(certification, |c| c.credential_id = Some("ABC-1".into())).await;
    }

    #[tokio::test]
    async fn test_crud_project() {
        exercise_crud(project, |p| p.featured = true).await;
    }

    #[tokio::test]
    async fn test_list_items_staging() {
        let mut form = form::<Project>(memory());

        form.set_staged_item("  Rust  ");
        assert!(form.add_staged_item());
        assert_eq!(form.staged_item(), "");
        form.set_staged_item("   ");
        assert!(!form.add_staged_item());
        form.set_staged_item("Axum");
        form.add_staged_item();
        form.set_staged_item("SQL");
        form.add_staged_item();

        form.remove_item(1);
        form.remove_item(10);
        assert_eq!(form.draft().technologies, vec!["Rust", "SQL"]);
    }

    #[tokio::test]
    async fn test_staging_is_noop_without_list_field() {
        let mut form = form::<Education>(memory());
        form.set_staged_item("anything");
        assert!(!form.add_staged_item());
        assert_eq!(form.staged_item(), "anything");
    }

    #[tokio::test]
    async fn test_selected_file_url_is_persisted_not_preview() {
        let store = memory();
        let mut form = form::<Project>(store.clone());
        *form.draft_mut() = project("Shot");
        form.select_asset(PendingAsset::new(
            "shot.png",
            Some("image/png".into()),
            Bytes::from_static(b"\x89PNG"),
        ));
        assert_eq!(
            form.preview(),
            Some(Preview::Pending {
                file_name: "shot.png".into(),
                size: 4
            })
        );

        assert!(form.submit().await.is_success());
        let url = form.items()[0].image_url.clone().unwrap();
        assert!(url.starts_with("https://cdn.test/project_images/"));
        assert!(url.ends_with("_shot.png"));

        let persisted = Repository::<Project>::new(store).list().await.unwrap();
        assert_eq!(persisted[0].image_url.as_deref(), Some(url.as_str()));
        assert!(form.preview().is_none());
    }

    #[tokio::test]
    async fn test_edit_without_new_file_keeps_url() {
        let store = memory();
        let mut form = form::<Project>(store);
        let mut p = project("Kept");
        p.image_url = Some("https://cdn.test/project_images/1_a.png".into());
        *form.draft_mut() = p;
        form.submit().await;

        let id = form.items()[0].id().unwrap().to_string();
        form.edit(&id);
        assert_eq!(
            form.preview(),
            Some(Preview::Stored {
                url: "https://cdn.test/project_images/1_a.png".into()
            })
        );
        form.draft_mut().description = "Changed".into();
        form.submit().await;
        assert_eq!(
            form.items()[0].image_url.as_deref(),
            Some("https://cdn.test/project_images/1_a.png")
        );
    }

    #[tokio::test]
    async fn test_cancel_restores_create_mode() {
        let mut form = form::<Project>(memory());
        *form.draft_mut() = project("A");
        form.submit().await;
        let id = form.items()[0].id().unwrap().to_string();

        form.edit(&id);
        form.draft_mut().title = "Unsaved".into();
        form.cancel();

        assert!(!form.is_editing());
        assert_eq!(form.draft(), &Project::default());
        assert_eq!(form.items()[0].title, "A");
    }

    #[tokio::test]
    async fn test_failed_write_leaves_list_and_draft() {
        let store = shared(FailingWrites::after(
            MemoryDocumentStore::new(Duration::ZERO),
            1,
        ));
        let mut form = form::<Project>(store);
        *form.draft_mut() = project("A");
        assert!(form.submit().await.is_success());

        let before = form.items().to_vec();
        *form.draft_mut() = project("B");
        let notice = form.submit().await;
        assert!(!notice.is_success());
        assert_eq!(notice.description, "Could not save project. Please try again.");
        assert_eq!(form.items(), before.as_slice());
        assert_eq!(form.draft().title, "B");

        let id = before[0].id().unwrap().to_string();
        assert!(!form.delete(&id).await.is_success());
        assert_eq!(form.items(), before.as_slice());
    }

    #[tokio::test]
    async fn test_failed_upload_aborts_submit() {
        let mut form =
            AdminForm::<Project>::new(Repository::new(memory()), Arc::new(BrokenAssets));
        *form.draft_mut() = project("A");
        form.select_asset(PendingAsset::new("a.png", None, Bytes::from_static(b"a")));

        assert!(!form.submit().await.is_success());
        assert!(form.items().is_empty());
        assert!(form.preview().is_some());
    }

    #[tokio::test]
    async fn test_failed_load_empties_list() {
        let mut form = form::<Certification>(shared(BrokenStore));
        let notice = form.load().await.unwrap();
        assert_eq!(
            notice.description,
            "Could not fetch certifications data. Please try again."
        );
        assert!(form.items().is_empty());
    }

    #[tokio::test]
    async fn test_edit_unknown_id_is_refused() {
        let mut form = form::<Project>(memory());
        assert!(!form.edit("nope"));
        assert!(!form.is_editing());
    }
}
