use std::collections::BTreeMap;
use std::sync::OnceLock;

use async_trait::async_trait;
use chrono::Utc;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::info;

use crate::models::ContactMessage;
use crate::repository::Repository;
use crate::store::StoreError;

pub mod form;
pub mod handlers;
pub mod relay;

#[derive(Debug, Error)]
pub enum ContactError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Relay error (status {status}): {message}")]
    Relay { status: u16, message: String },

    /// The relay answered but reported `success: false`.
    #[error("Relay rejected the message: {0}")]
    Rejected(String),
}

/// What a visitor types into the public contact form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactSubmission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
    /// Hidden honeypot field. Humans leave it unset.
    #[serde(default, deserialize_with = "truthy")]
    pub botcheck: bool,
}

/// Per-field messages, keyed by field name.
pub type FieldErrors = BTreeMap<&'static str, String>;

impl ContactSubmission {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        for (field, value, label) in [
            ("name", &self.name, "Name"),
            ("email", &self.email, "Email"),
            ("subject", &self.subject, "Subject"),
            ("message", &self.message, "Message"),
        ] {
            if value.trim().is_empty() {
                errors.insert(field, format!("{label} is required"));
            }
        }
        if !errors.contains_key("email") && !is_email(&self.email) {
            errors.insert("email", "Invalid email address".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

static EMAIL: OnceLock<Regex> = OnceLock::new();

/// No whitespace, and an `@` with something on both sides.
pub fn is_email(value: &str) -> bool {
    EMAIL
        .get_or_init(|| Regex::new(r"^\S+@\S+$").expect("email pattern is valid"))
        .is_match(value)
}

fn truthy<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Bool(b) => b,
        Value::String(s) => !matches!(s.trim(), "" | "false" | "0" | "off"),
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        _ => false,
    })
}

/// Where an accepted contact message goes.
#[async_trait]
pub trait ContactDelivery: Send + Sync {
    fn name(&self) -> &'static str;

    async fn deliver(&self, submission: &ContactSubmission) -> Result<(), ContactError>;
}

/// Writes messages into the `contacts` collection read by the admin inbox.
pub struct StoreDelivery {
    repo: Repository<ContactMessage>,
}

impl StoreDelivery {
    pub fn new(repo: Repository<ContactMessage>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl ContactDelivery for StoreDelivery {
    fn name(&self) -> &'static str {
        "store"
    }

    async fn deliver(&self, submission: &ContactSubmission) -> Result<(), ContactError> {
        let subject = submission.subject.trim();
        let message = ContactMessage {
            id: None,
            name: submission.name.trim().to_string(),
            email: submission.email.trim().to_string(),
            subject: (!subject.is_empty()).then(|| subject.to_string()),
            message: submission.message.trim().to_string(),
            created_at: Utc::now(),
            read: false,
        };
        let id = self.repo.create(&message).await?;
        info!("Stored contact message {id} from {}", message.email);
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryDocumentStore;
    use crate::store::testing::shared;
    use serde_json::json;
    use std::time::Duration;

    fn submission() -> ContactSubmission {
        ContactSubmission {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            subject: "Hello".into(),
            message: "Nice site".into(),
            botcheck: false,
        }
    }

    #[test]
    fn test_is_email() {
        assert!(is_email("a@b"));
        assert!(is_email("ada@example.com"));
        assert!(!is_email("not-an-email"));
        assert!(!is_email("@example.com"));
        assert!(!is_email("ada@"));
        assert!(!is_email("ada @example.com"));
        assert!(!is_email("ada@example.com\n"));
        assert!(!is_email(""));
        // Only whitespace is excluded, so extra `@` signs still pass.
        assert!(is_email("a@b@c"));
    }

    #[test]
    fn test_validate_reports_each_field() {
        let errors = ContactSubmission::default().validate().unwrap_err();
        let fields: Vec<_> = errors.keys().copied().collect();
        assert_eq!(fields, vec!["email", "message", "name", "subject"]);
        assert_eq!(errors["email"], "Email is required");

        let mut bad = submission();
        bad.email = "not-an-email".into();
        let errors = bad.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors["email"], "Invalid email address");

        assert!(submission().validate().is_ok());
    }

    #[test]
    fn test_botcheck_truthiness() {
        let parse = |v: Value| -> bool {
            serde_json::from_value::<ContactSubmission>(json!({ "botcheck": v }))
                .unwrap()
                .botcheck
        };
        assert!(parse(json!(true)));
        assert!(parse(json!("on")));
        assert!(parse(json!(1)));
        assert!(!parse(json!(false)));
        assert!(!parse(json!("")));
        assert!(!parse(json!(null)));
        let missing: ContactSubmission = serde_json::from_value(json!({})).unwrap();
        assert!(!missing.botcheck);
    }

    #[tokio::test]
    async fn test_store_delivery_writes_unread_message() {
        let store = shared(MemoryDocumentStore::new(Duration::ZERO));
        let repo = Repository::<ContactMessage>::new(store);
        let delivery = StoreDelivery::new(repo.clone());

        let before = Utc::now();
        delivery.deliver(&submission()).await.unwrap();

        let stored = repo.list().await.unwrap();
        assert_eq!(stored.len(), 1);
        let msg = &stored[0];
        assert_eq!(msg.name, "Ada");
        assert_eq!(msg.subject.as_deref(), Some("Hello"));
        assert!(!msg.read);
        assert!(msg.created_at >= before);
        assert!(msg.id.is_some());
    }
}
