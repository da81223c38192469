use chrono::{Duration, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::error;

use super::notice::Notice;
use crate::models::ContactMessage;
use crate::repository::Repository;
use crate::store::StoreError;

/// What the inbox shows: the stored messages, or the sample list when there
/// are none.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InboxView {
    pub messages: Vec<ContactMessage>,
    pub sample: bool,
}

impl InboxView {
    pub fn from_messages(messages: Vec<ContactMessage>) -> Self {
        if messages.is_empty() {
            Self {
                messages: sample_messages(),
                sample: true,
            }
        } else {
            Self {
                messages,
                sample: false,
            }
        }
    }
}

pub fn newest_first(messages: &mut [ContactMessage]) {
    messages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Loads every contact message, newest first.
pub async fn load_messages(
    repo: &Repository<ContactMessage>,
) -> Result<Vec<ContactMessage>, StoreError> {
    let mut messages = repo.list().await?;
    newest_first(&mut messages);
    Ok(messages)
}

pub async fn mark_read(repo: &Repository<ContactMessage>, id: &str) -> Result<(), StoreError> {
    repo.patch(id, json!({ "read": true })).await
}

/// Triage state for the contact inbox. There is no create path here.
pub struct ContactInbox {
    repo: Repository<ContactMessage>,
    messages: Vec<ContactMessage>,
}

impl ContactInbox {
    pub fn new(repo: Repository<ContactMessage>) -> Self {
        Self {
            repo,
            messages: Vec::new(),
        }
    }

    pub async fn load(&mut self) -> Option<Notice> {
        match load_messages(&self.repo).await {
            Ok(messages) => {
                self.messages = messages;
                None
            }
            Err(e) => {
                error!("Error fetching messages: {e}");
                Some(Notice::error(
                    "Could not fetch contact messages. Please try again.",
                ))
            }
        }
    }

    pub fn messages(&self) -> &[ContactMessage] {
        &self.messages
    }

    pub fn view(&self) -> InboxView {
        InboxView::from_messages(self.messages.clone())
    }

    /// Marks a message read once the store confirms. A failure leaves the
    /// local flag as it was, so an earlier success is never undone.
    pub async fn mark_read(&mut self, id: &str) -> Notice {
        match mark_read(&self.repo, id).await {
            Ok(()) => {
                if let Some(message) = self.messages.iter_mut().find(|m| m.id.as_deref() == Some(id)) {
                    message.read = true;
                }
                Notice::success("Message marked as read.")
            }
            Err(e) => {
                error!("Error marking message {id} as read: {e}");
                Notice::error("Could not update message status. Please try again.")
            }
        }
    }

    pub async fn delete(&mut self, id: &str) -> Notice {
        match self.repo.delete(id).await {
            Ok(()) => {
                self.messages.retain(|m| m.id.as_deref() != Some(id));
                Notice::success("Message deleted successfully.")
            }
            Err(e) => {
                error!("Error deleting message {id}: {e}");
                Notice::error("Could not delete message. Please try again.")
            }
        }
    }
}

/// Shown while the inbox is empty.
pub fn sample_messages() -> Vec<ContactMessage> {
    let now = Utc::now();
    let sample = |id: &str, name: &str, email: &str, message: &str, days: i64, read: bool| {
        ContactMessage {
            id: Some(id.to_string()),
            name: name.to_string(),
            email: email.to_string(),
            subject: None,
            message: message.to_string(),
            created_at: now - Duration::days(days),
            read,
        }
    };
    vec![
        sample(
            "sample-1",
            "Jordan Lee",
            "jordan.lee@example.com",
            "I would like to discuss a potential collaboration on an upcoming project.",
            1,
            false,
        ),
        sample(
            "sample-2",
            "Priya Raman",
            "priya.r@example.com",
            "Your portfolio is impressive! We are hiring for a role that matches your skills.",
            3,
            true,
        ),
        sample(
            "sample-3",
            "Tomás Ortega",
            "tomas.o@example.com",
            "A colleague pointed me to your site. Could we schedule a call about a project?",
            7,
            true,
        ),
    ]
}
