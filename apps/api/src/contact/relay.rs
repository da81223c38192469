use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{ContactDelivery, ContactError, ContactSubmission};

/// Forwards contact messages to a third-party form relay (Web3Forms-style
/// JSON API). No retries: a failed post is reported back to the visitor.
#[derive(Clone)]
pub struct RelayDelivery {
    client: Client,
    endpoint: String,
    access_key: String,
}

#[derive(Debug, Serialize)]
struct RelayRequest<'a> {
    name: &'a str,
    email: &'a str,
    subject: &'a str,
    message: &'a str,
    access_key: &'a str,
    botcheck: bool,
}

#[derive(Debug, Deserialize)]
struct RelayResponse {
    #[serde(default)]
    success: bool,
    message: Option<String>,
}

impl RelayDelivery {
    pub fn new(endpoint: String, access_key: String) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            endpoint,
            access_key,
        }
    }
}

#[async_trait]
impl ContactDelivery for RelayDelivery {
    fn name(&self) -> &'static str {
        "relay"
    }

    async fn deliver(&self, submission: &ContactSubmission) -> Result<(), ContactError> {
        let body = RelayRequest {
            name: &submission.name,
            email: &submission.email,
            subject: &submission.subject,
            message: &submission.message,
            access_key: &self.access_key,
            botcheck: submission.botcheck,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("accept", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let text = response.text().await?;
        interpret(status, &text)
    }
}

/// The relay's `success` flag decides the outcome, whatever the status code.
fn interpret(status: u16, body: &str) -> Result<(), ContactError> {
    match serde_json::from_str::<RelayResponse>(body) {
        Ok(RelayResponse { success: true, .. }) => {
            debug!("Relay accepted message (status {status})");
            Ok(())
        }
        Ok(RelayResponse { message, .. }) => {
            let message = message.unwrap_or_else(|| "Message was not accepted".to_string());
            warn!("Relay rejected message (status {status}): {message}");
            Err(ContactError::Rejected(message))
        }
        Err(_) => Err(ContactError::Relay {
            status,
            message: body.chars().take(200).collect(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_flag_wins() {
        assert!(interpret(200, r#"{"success": true, "message": "Email sent"}"#).is_ok());
        // A success body is honored even on an unusual status.
        assert!(interpret(202, r#"{"success": true}"#).is_ok());
    }

    #[test]
    fn test_rejection_carries_relay_message() {
        match interpret(200, r#"{"success": false, "message": "Invalid access key"}"#) {
            Err(ContactError::Rejected(m)) => assert_eq!(m, "Invalid access key"),
            other => panic!("unexpected {other:?}"),
        }
        match interpret(400, r#"{"success": false}"#) {
            Err(ContactError::Rejected(m)) => assert_eq!(m, "Message was not accepted"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_non_json_body_is_relay_error() {
        match interpret(502, "<html>Bad Gateway</html>") {
            Err(ContactError::Relay { status, message }) => {
                assert_eq!(status, 502);
                assert!(message.contains("Bad Gateway"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_request_wire_format() {
        let body = RelayRequest {
            name: "Ada",
            email: "ada@example.com",
            subject: "Hi",
            message: "Hello",
            access_key: "key",
            botcheck: false,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["access_key"], "key");
        assert_eq!(value["botcheck"], false);
        assert_eq!(value["subject"], "Hi");
    }
}
