use serde::{Deserialize, Serialize};

use super::{lenient, require, Entity, ValidationError};
use crate::store::Collection;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string"
    )]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub technologies: Vec<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub github_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub live_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub featured: bool,
}

impl Entity for Project {
    const COLLECTION: Collection = Collection::Projects;
    const LABEL: &'static str = "Project";
    const ASSET_FOLDER: Option<&'static str> = Some("project_images");

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: Option<String>) {
        self.id = id;
    }

    fn asset_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    fn set_asset_url(&mut self, url: String) {
        self.image_url = Some(url);
    }

    fn list_items_mut(&mut self) -> Option<&mut Vec<String>> {
        Some(&mut self.technologies)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require(&[
            ("title", self.title.as_str()),
            ("description", self.description.as_str()),
        ])
    }
}

/// Moves featured projects to the front, keeping relative order otherwise.
pub fn featured_first(projects: &mut [Project]) {
    projects.sort_by_key(|p| !p.featured);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn project(title: &str, featured: bool) -> Project {
        Project {
            title: title.into(),
            description: "d".into(),
            featured,
            ..Default::default()
        }
    }

    #[test]
    fn test_featured_first_is_stable() {
        let mut projects = vec![project("A", false), project("B", true), project("C", false)];
        featured_first(&mut projects);
        let titles: Vec<_> = projects.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_featured_first_keeps_featured_order() {
        let mut projects = vec![
            project("A", true),
            project("B", false),
            project("C", true),
            project("D", false),
        ];
        featured_first(&mut projects);
        let titles: Vec<_> = projects.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "C", "B", "D"]);
    }

    #[test]
    fn test_featured_defaults_false_and_ignores_non_bool() {
        let p: Project =
            serde_json::from_value(json!({"title": "T", "description": "D"})).unwrap();
        assert!(!p.featured);
        let p: Project =
            serde_json::from_value(json!({"title": "T", "description": "D", "featured": "yes"}))
                .unwrap();
        assert!(!p.featured);
    }

    #[test]
    fn test_serialized_body_clears_absent_urls() {
        // Absent URLs go out as null so a field-merge update clears them.
        let body = serde_json::to_value(project("A", true)).unwrap();
        assert_eq!(
            body,
            json!({
                "title": "A", "description": "d", "technologies": [],
                "imageUrl": null, "githubUrl": null, "liveUrl": null, "featured": true
            })
        );
    }
}
