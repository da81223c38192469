use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error};

use super::fallback;
use crate::models::project::featured_first;
use crate::models::{About, Certification, Education, Entity, Experience, Project};
use crate::repository::Repository;
use crate::store::DocumentStore;

/// Result of reading one section from the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    /// The store returned usable data.
    Live(T),
    /// The store answered but had nothing usable.
    Empty,
    /// No store is configured, so nothing was queried.
    Unconfigured,
    /// The store returned an error.
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Live,
    Empty,
    Unconfigured,
    Failed,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Live => "live",
            Source::Empty => "empty",
            Source::Unconfigured => "unconfigured",
            Source::Failed => "failed",
        }
    }
}

impl<T> Fetched<T> {
    pub fn source(&self) -> Source {
        match self {
            Fetched::Live(_) => Source::Live,
            Fetched::Empty => Source::Empty,
            Fetched::Unconfigured => Source::Unconfigured,
            Fetched::Failed(_) => Source::Failed,
        }
    }

    /// Live data is shown as is; every other case shows `fallback` verbatim.
    pub fn or_fallback(self, fallback: impl FnOnce() -> T) -> Section<T> {
        let source = self.source();
        let data = match self {
            Fetched::Live(data) => data,
            _ => fallback(),
        };
        Section { source, data }
    }
}

/// What a page section displays, and where it came from.
#[derive(Debug, Clone, Serialize)]
pub struct Section<T> {
    pub source: Source,
    pub data: T,
}

/// First record of the collection, if any.
pub async fn fetch_one<E: Entity>(repo: Option<&Repository<E>>) -> Fetched<E> {
    let Some(repo) = repo else {
        return Fetched::Unconfigured;
    };
    match repo.first().await {
        Ok(Some(record)) => Fetched::Live(record),
        Ok(None) => {
            debug!("No {} document, showing sample", E::COLLECTION);
            Fetched::Empty
        }
        Err(e) => {
            error!("Error fetching {} data: {e}", E::COLLECTION);
            Fetched::Failed(e.to_string())
        }
    }
}

/// The whole collection in store order.
pub async fn fetch_all<E: Entity>(repo: Option<&Repository<E>>) -> Fetched<Vec<E>> {
    let Some(repo) = repo else {
        return Fetched::Unconfigured;
    };
    match repo.list().await {
        Ok(records) if records.is_empty() => {
            debug!("No {} documents, showing samples", E::COLLECTION);
            Fetched::Empty
        }
        Ok(records) => Fetched::Live(records),
        Err(e) => {
            error!("Error fetching {} data: {e}", E::COLLECTION);
            Fetched::Failed(e.to_string())
        }
    }
}

/// Everything the public page shows.
#[derive(Debug, Clone, Serialize)]
pub struct Portfolio {
    pub about: Section<About>,
    pub education: Section<Vec<Education>>,
    pub experience: Section<Vec<Experience>>,
    pub certifications: Section<Vec<Certification>>,
    pub projects: Section<Vec<Project>>,
}

/// Reads every section concurrently. `None` means demo mode: no store is
/// queried and every section shows its sample data.
pub async fn load_portfolio(store: Option<Arc<dyn DocumentStore>>) -> Portfolio {
    let about = store.clone().map(Repository::<About>::new);
    let education = store.clone().map(Repository::<Education>::new);
    let experience = store.clone().map(Repository::<Experience>::new);
    let certifications = store.clone().map(Repository::<Certification>::new);
    let projects = store.map(Repository::<Project>::new);

    let (about, education, experience, certifications, projects) = tokio::join!(
        fetch_one(about.as_ref()),
        fetch_all(education.as_ref()),
        fetch_all(experience.as_ref()),
        fetch_all(certifications.as_ref()),
        fetch_all(projects.as_ref()),
    );

    let mut projects = projects.or_fallback(fallback::projects);
    featured_first(&mut projects.data);

    Portfolio {
        about: about.or_fallback(fallback::about),
        education: education.or_fallback(fallback::education),
        experience: experience.or_fallback(fallback::experience),
        certifications: certifications.or_fallback(fallback::certifications),
        projects,
    }
}
