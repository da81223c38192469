use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

pub const DEFAULT_RELAY_ENDPOINT: &str = "https://api.web3forms.com/submit";

/// Application configuration loaded from environment variables.
///
/// `DATABASE_URL` is the live/demo switch: when it is set every live-backend
/// variable becomes required, when it is absent the service runs in demo
/// mode with in-memory backends.
#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub public_base_url: String,
    pub backend: Option<LiveBackend>,
    pub session_ttl: chrono::Duration,
    pub demo_latency: Duration,
    pub contact: ContactBackend,
}

/// Settings for the real document store, object storage and credentials.
#[derive(Clone)]
pub struct LiveBackend {
    pub database_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub s3_public_url: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub admin_email: String,
    pub admin_password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ContactBackend {
    /// Messages are written to the `contacts` collection.
    Store,
    /// Messages are forwarded to a third-party form relay.
    Relay { endpoint: String, access_key: String },
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let env = Env(lookup);

        let port: u16 = env.parse_or("PORT", 8080)?;
        let backend = match env.optional("DATABASE_URL") {
            Some(database_url) => Some(LiveBackend {
                database_url,
                s3_bucket: env.require("S3_BUCKET")?,
                s3_endpoint: env.require("S3_ENDPOINT")?,
                s3_public_url: env.require("S3_PUBLIC_URL")?,
                aws_access_key_id: env.require("AWS_ACCESS_KEY_ID")?,
                aws_secret_access_key: env.require("AWS_SECRET_ACCESS_KEY")?,
                admin_email: env.require("ADMIN_EMAIL")?,
                admin_password: env.require("ADMIN_PASSWORD")?,
            }),
            None => None,
        };

        let contact = match env.optional("CONTACT_BACKEND").as_deref() {
            None | Some("store") => ContactBackend::Store,
            Some("relay") => ContactBackend::Relay {
                endpoint: env
                    .optional("RELAY_ENDPOINT")
                    .unwrap_or_else(|| DEFAULT_RELAY_ENDPOINT.to_string()),
                access_key: env.require("RELAY_ACCESS_KEY")?,
            },
            Some(other) => {
                return Err(anyhow!(
                    "CONTACT_BACKEND must be 'store' or 'relay', got '{other}'"
                ))
            }
        };

        let ttl_minutes: i64 = env.parse_or("SESSION_TTL_MINUTES", 480)?;
        let latency_ms: u64 = env.parse_or("DEMO_LATENCY_MS", 300)?;

        Ok(Config {
            port,
            rust_log: env.optional("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            public_base_url: env
                .optional("PUBLIC_BASE_URL")
                .unwrap_or_else(|| format!("http://localhost:{port}")),
            backend,
            session_ttl: chrono::Duration::minutes(ttl_minutes),
            demo_latency: Duration::from_millis(latency_ms),
            contact,
        })
    }

    pub fn is_demo(&self) -> bool {
        self.backend.is_none()
    }
}

struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn require(&self, key: &str) -> Result<String> {
        self.optional(key)
            .with_context(|| format!("Required environment variable '{key}' is not set"))
    }

    fn parse_or<T>(&self, key: &str, default: T) -> Result<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        match self.optional(key) {
            Some(raw) => raw
                .parse::<T>()
                .with_context(|| format!("{key} has an invalid value '{raw}'")),
            None => Ok(default),
        }
    }
}
