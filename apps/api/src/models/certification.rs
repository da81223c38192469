use serde::{Deserialize, Serialize};

use super::{lenient, require, Entity, ValidationError};
use crate::store::Collection;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certification {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string"
    )]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub issuer: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub issue_date: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub expiry_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub credential_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub credential_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub logo_url: Option<String>,
}

impl Entity for Certification {
    const COLLECTION: Collection = Collection::Certifications;
    const LABEL: &'static str = "Certification";
    const ASSET_FOLDER: Option<&'static str> = Some("certification_logos");

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
        Some(&mut self.skills)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require(&[
            ("title", self.title.as_str()),
            ("issuer", self.issuer.as_str()),
            ("issueDate", self.issue_date.as_str()),
        ])
    }
}
