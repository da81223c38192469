pub mod about;
pub mod certification;
pub mod contact;
pub mod education;
pub mod experience;
pub mod project;

pub use about::About;
pub use certification::Certification;
pub use contact::ContactMessage;
pub use education::Education;
pub use experience::Experience;
pub use project::Project;

use std::fmt::Debug;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use crate::store::Collection;

#[derive(Debug, Clone, PartialEq, Error)]
#[error("Missing required fields: {}", .missing.join(", "))]
pub struct ValidationError {
    pub missing: Vec<&'static str>,
}

/// A record kind persisted in its own collection.
///
/// Each kind supplies its collection, the storage folder for its asset (if it
/// has one) and its single list-valued field (if it has one). Everything else
/// about the CRUD workflow is generic over this trait.
pub trait Entity:
    Serialize + DeserializeOwned + Clone + Default + Debug + Send + Sync + 'static
{
    const COLLECTION: Collection;
    /// Human label used in notifications, e.g. "Project".
    const LABEL: &'static str;
    const ASSET_FOLDER: Option<&'static str> = None;
    /// Old key spellings still found in stored documents. Writes null them
    /// so a merge update drops them.
    const RETIRED_KEYS: &'static [&'static str] = &[];
    /// The collection holds at most one record; creating another updates it.
    const SINGLETON: bool = false;

    fn id(&self) -> Option<&str>;
    fn set_id(&mut self, id: Option<String>);

    fn asset_url(&self) -> Option<&str> {
        None
    }
    fn set_asset_url(&mut self, _url: String) {}

    fn list_items_mut(&mut self) -> Option<&mut Vec<String>> {
        None
    }

    /// Fixes up legacy field spellings after decoding.
    fn normalize(&mut self) {}

    fn validate(&self) -> Result<(), ValidationError>;
}

/// Collects the names of required text fields that are blank.
pub(crate) fn require(fields: &[(&'static str, &str)]) -> Result<(), ValidationError> {
    let missing: Vec<_> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { missing })
    }
}

/// Tolerant field decoders for documents read back from the store.
pub(crate) mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Arrays keep their string members; anything else is an empty list.
    pub fn string_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        })
    }

    /// Blank or non-string values decode as absent.
    pub fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) if !s.trim().is_empty() => Some(s),
            _ => None,
        })
    }

    /// Numbers are stringified; other non-strings become blank and fail
    /// validation later.
    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            _ => String::new(),
        })
    }

    pub fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        Ok(matches!(Value::deserialize(d)?, Value::Bool(true)))
    }
}
