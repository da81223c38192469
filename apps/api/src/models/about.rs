use serde::{Deserialize, Serialize};

use super::{lenient, require, Entity, ValidationError};
use crate::store::Collection;

/// The single "about me" record shown at the top of the page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct About {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string"
    )]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub bio: String,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub photo_url: Option<String>,
    // Older documents stored the photo under `imageUrl`.
    #[serde(default, skip_serializing, deserialize_with = "lenient::opt_string")]
    pub(crate) image_url: Option<String>,
}

impl Entity for About {
    const COLLECTION: Collection = Collection::About;
    const LABEL: &'static str = "About information";
    const ASSET_FOLDER: Option<&'static str> = Some("profile_photos");
    const RETIRED_KEYS: &'static [&'static str] = &["imageUrl"];
    const SINGLETON: bool = true;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: Option<String>) {
        self.id = id;
    }

    fn asset_url(&self) -> Option<&str> {
        self.photo_url.as_deref()
    }

    fn set_asset_url(&mut self, url: String) {
        self.photo_url = Some(url);
    }

    fn list_items_mut(&mut self) -> Option<&mut Vec<String>> {
        Some(&mut self.skills)
    }

    fn normalize(&mut self) {
        if let Some(legacy) = self.image_url.take() {
            self.photo_url.get_or_insert(legacy);
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require(&[
            ("name", self.name.as_str()),
            ("title", self.title.as_str()),
            ("bio", self.bio.as_str()),
        ])
    }
}
