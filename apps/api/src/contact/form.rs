use serde::Serialize;
use tracing::{error, warn};

use super::{ContactDelivery, ContactError, ContactSubmission, FieldErrors};
use crate::admin::notice::Notice;

const SENT: &str = "Thank you! Your message has been sent successfully.";
const NOT_SENT: &str = "An error occurred while sending your message. Please try again.";

/// State of the form after a submit attempt.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactOutcome {
    pub notice: Notice,
    pub form: ContactSubmission,
    pub errors: FieldErrors,
}

/// The public contact form: cleared after a reported success, left as typed
/// otherwise.
#[derive(Debug, Default)]
pub struct ContactForm {
    values: ContactSubmission,
    errors: FieldErrors,
}

impl ContactForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values(values: ContactSubmission) -> Self {
        Self {
            values,
            errors: FieldErrors::new(),
        }
    }

    pub fn values(&self) -> &ContactSubmission {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut ContactSubmission {
        &mut self.values
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Validates, then hands the message to `delivery`. Nothing is delivered
    /// while a field is invalid.
    pub async fn submit(&mut self, delivery: &dyn ContactDelivery) -> Notice {
        if let Err(errors) = self.values.validate() {
            self.errors = errors;
            return Notice::error("Please correct the highlighted fields.");
        }
        self.errors.clear();

        if self.values.botcheck {
            warn!(
                "Dropping contact submission with botcheck set (email: {})",
                self.values.email
            );
            self.values = ContactSubmission::default();
            return Notice::success(SENT);
        }

        match delivery.deliver(&self.values).await {
            Ok(()) => {
                self.values = ContactSubmission::default();
                Notice::success(SENT)
            }
            Err(ContactError::Rejected(message)) => Notice::error(message),
            Err(e) => {
                error!("Error sending contact message via {}: {e}", delivery.name());
                Notice::error(NOT_SENT)
            }
        }
    }

    pub fn outcome(&self, notice: Notice) -> ContactOutcome {
        ContactOutcome {
            notice,
            form: self.values.clone(),
            errors: self.errors.clone(),
        }
    }
}
