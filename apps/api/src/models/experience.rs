use serde::{Deserialize, Serialize};

use super::{lenient, require, Entity, ValidationError};
use crate::store::Collection;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string"
    )]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub company: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub location: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub start_date: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub end_date: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub responsibilities: Vec<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub logo_url: Option<String>,
}

impl Entity for Experience {
    const COLLECTION: Collection = Collection::Experience;
    const LABEL: &'static str = "Experience entry";
    const ASSET_FOLDER: Option<&'static str> = Some("company_logos");

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: Option<String>) {
        self.id = id;
    }

    fn asset_url(&self) -> Option<&str> {
        self.logo_url.as_deref()
    }

    fn set_asset_url(&mut self, url: String) {
        self.logo_url = Some(url);
    }

    fn list_items_mut(&mut self) -> Option<&mut Vec<String>> {
        Some(&mut self.responsibilities)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require(&[
            ("title", self.title.as_str()),
            ("company", self.company.as_str()),
            ("location", self.location.as_str()),
            ("startDate", self.start_date.as_str()),
            ("endDate", self.end_date.as_str()),
        ])
    }
}
