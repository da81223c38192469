use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{lenient, require, Entity, ValidationError};
use crate::store::Collection;

/// A message left through the public contact form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string"
    )]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub subject: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub message: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub read: bool,
}

impl Entity for ContactMessage {
    const COLLECTION: Collection = Collection::Contacts;
    const LABEL: &'static str = "Message";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: Option<String>) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require(&[
            ("name", self.name.as_str()),
            ("email", self.email.as_str()),
            ("message", self.message.as_str()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_read_defaults_false() {
        let msg: ContactMessage = serde_json::from_value(json!({
            "name": "Ada", "email": "ada@example.com", "message": "Hi",
            "createdAt": "2024-05-01T10:00:00Z"
        }))
        .unwrap();
        assert!(!msg.read);
        assert_eq!(msg.subject, None);
        assert_eq!(msg.created_at.to_rfc3339(), "2024-05-01T10:00:00+00:00");
    }

    #[test]
    fn test_malformed_timestamp_is_rejected() {
        let result: Result<ContactMessage, _> = serde_json::from_value(json!({
            "name": "Ada", "email": "ada@example.com", "message": "Hi",
            "createdAt": "yesterday"
        }));
        assert!(result.is_err());
    }
}
