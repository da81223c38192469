use serde::{Deserialize, Serialize};

use super::{lenient, require, Entity, ValidationError};
use crate::store::Collection;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string"
    )]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub degree: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub institution: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub start_date: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub end_date: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub logo_url: Option<String>,
}

impl Entity for Education {
    const COLLECTION: Collection = Collection::Education;
    const LABEL: &'static str = "Education entry";
    const ASSET_FOLDER: Option<&'static str> = Some("education_logos");

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

    fn validate(&self) -> Result<(), ValidationError> {
        require(&[
            ("degree", self.degree.as_str()),
            ("institution", self.institution.as_str()),
            ("startDate", self.start_date.as_str()),
            ("endDate", self.end_date.as_str()),
        ])
    }
}
