//! Admin sign-in and session lifecycle.
//!
//! A session is issued on a successful sign-in and invalidated on logout or
//! once its TTL has passed. Sessions live only in process memory, so a
//! restart signs every admin out.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::header::AUTHORIZATION, http::request::Parts};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub email: String,
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError>;
    async fn sign_out(&self, identity: &Identity) -> Result<(), AuthError>;
}

/// A single admin account configured through the environment.
pub struct StaticCredentials {
    email: String,
    password: String,
}

impl StaticCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

#[async_trait]
impl AuthProvider for StaticCredentials {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let email_ok = email.trim().eq_ignore_ascii_case(&self.email);
        let password_ok = constant_time_eq(password.as_bytes(), self.password.as_bytes());
        if email_ok && password_ok {
            Ok(Identity {
                email: self.email.clone(),
            })
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }

    async fn sign_out(&self, _identity: &Identity) -> Result<(), AuthError> {
        Ok(())
    }
}

/// Demo-mode provider: waits, then accepts any non-empty email.
pub struct DemoAuth {
    latency: Duration,
}

impl DemoAuth {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl AuthProvider for DemoAuth {
    async fn sign_in(&self, email: &str, _password: &str) -> Result<Identity, AuthError> {
        info!("Demo mode: login attempt for {email}");
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if email.trim().is_empty() {
            return Err(AuthError::InvalidCredentials);
        }
        Ok(Identity {
            email: email.trim().to_string(),
        })
    }

    async fn sign_out(&self, identity: &Identity) -> Result<(), AuthError> {
        info!("Demo mode: logout for {}", identity.email);
        Ok(())
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: Uuid,
    pub email: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn identity(&self) -> Identity {
        Identity {
            email: self.email.clone(),
        }
    }
}

#[derive(Clone)]
pub struct SessionStore {
    ttl: chrono::Duration,
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl SessionStore {
    pub fn new(ttl: chrono::Duration) -> Self {
        Self {
            ttl,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn issue(&self, identity: &Identity) -> Session {
        self.issue_at(identity, Utc::now()).await
    }

    pub async fn issue_at(&self, identity: &Identity, now: DateTime<Utc>) -> Session {
        let session = Session {
            token: Uuid::new_v4(),
            email: identity.email.clone(),
            issued_at: now,
            expires_at: now + self.ttl,
        };
        self.sessions
            .write()
            .await
            .insert(session.token, session.clone());
        info!("Issued admin session for {}", session.email);
        session
    }

    pub async fn validate(&self, token: Uuid) -> Option<Session> {
        self.validate_at(token, Utc::now()).await
    }

    /// Returns the live session for `token`; an expired one is dropped.
    pub async fn validate_at(&self, token: Uuid, now: DateTime<Utc>) -> Option<Session> {
        let mut sessions = self.sessions.write().await;
        match sessions.get(&token) {
            Some(session) if session.is_expired_at(now) => {
                warn!("Admin session for {} expired", session.email);
                sessions.remove(&token);
                None
            }
            Some(session) => Some(session.clone()),
            None => None,
        }
    }

    pub async fn revoke(&self, token: Uuid) -> Option<Session> {
        self.sessions.write().await.remove(&token)
    }
}

/// Extractor for routes that require a signed-in admin.
pub struct AdminSession(pub Session);

#[axum::async_trait]
impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .and_then(|t| Uuid::parse_str(t.trim()).ok())
            .ok_or(AppError::Unauthorized)?;

        state
            .sessions
            .validate(token)
            .await
            .map(AdminSession)
            .ok_or(AppError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> Identity {
        Identity {
            email: "me@example.com".into(),
        }
    }

    #[tokio::test]
    async fn test_static_credentials() {
        let provider = StaticCredentials::new("me@example.com", "s3cret");
        assert!(provider.sign_in("Me@Example.com ", "s3cret").await.is_ok());
        assert!(matches!(
            provider.sign_in("me@example.com", "wrong").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(provider.sign_in("other@example.com", "s3cret").await.is_err());
    }

    #[tokio::test]
    async fn test_demo_auth_accepts_any_email() {
        let provider = DemoAuth::new(Duration::ZERO);
        assert_eq!(provider.sign_in("x@y", "").await.unwrap().email, "x@y");
        assert!(provider.sign_in("  ", "pw").await.is_err());
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let store = SessionStore::new(chrono::Duration::minutes(30));
        let now = Utc::now();
        let session = store.issue_at(&identity(), now).await;

        assert!(store.validate_at(session.token, now).await.is_some());
        assert!(store.revoke(session.token).await.is_some());
        assert!(store.validate_at(session.token, now).await.is_none());
    }

    #[tokio::test]
    async fn test_session_expires_after_ttl() {
        let store = SessionStore::new(chrono::Duration::minutes(30));
        let now = Utc::now();
        let session = store.issue_at(&identity(), now).await;

        let later = now + chrono::Duration::minutes(31);
        assert!(store.validate_at(session.token, later).await.is_none());
        // Dropped on the expired lookup, even when checked "earlier" again.
        assert!(store.validate_at(session.token, now).await.is_none());
    }

    #[tokio::test]
    async fn test_unknown_token_is_rejected() {
        let store = SessionStore::new(chrono::Duration::minutes(30));
        assert!(store.validate(Uuid::new_v4()).await.is_none());
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"ab"));
    }
}
