/// Configuration models
use crate::constants::{DEFAULT_BROKER_TIMEOUT_SECS, DEFAULT_BUCKET_NAME, DEFAULT_EVENT_EXCHANGE};
use crate::error::MaildropError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Explicit configuration injected into every component
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MaildropConfig {
    pub broker: BrokerConfig,
    pub storage: StorageConfig,
    /// Strip path separators and control characters from filenames used in keys
    #[serde(default)]
    pub sanitize_content_names: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BrokerConfig {
    pub url: String,
    /// Labels the broker connection and is stamped as the message app id
    pub service_name: String,
    #[serde(default = "default_exchange")]
    pub exchange: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default = "default_bucket")]
    pub bucket: String,
    #[serde(default)]
    pub access_key_id: Option<String>,
    #[serde(default)]
    pub secret_access_key: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    /// Custom endpoint for S3-compatible stores; enables path-style addressing
    #[serde(default)]
    pub endpoint_url: Option<String>,
}

fn default_exchange() -> String {
    DEFAULT_EVENT_EXCHANGE.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_BROKER_TIMEOUT_SECS
}

fn default_bucket() -> String {
    DEFAULT_BUCKET_NAME.to_string()
}

impl BrokerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl StorageConfig {
    /// Returns the access key pair, or a credentials error when either half is missing
    pub fn credentials(&self) -> Result<(&str, &str), MaildropError> {
        match (
            self.access_key_id.as_deref().filter(|s| !s.is_empty()),
            self.secret_access_key.as_deref().filter(|s| !s.is_empty()),
        ) {
            (Some(id), Some(secret)) => Ok((id, secret)),
            _ => Err(MaildropError::MissingCredentials(
                "AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY must both be set".to_string(),
            )),
        }
    }
}

impl MaildropConfig {
    /// Loads configuration from environment variables and validates it
    pub fn from_env() -> Result<Self, MaildropError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, MaildropError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup("MAILDROP_BROKER_URL")
            .ok_or_else(|| MaildropError::Config("Missing MAILDROP_BROKER_URL".to_string()))?;

        let service_name = lookup("MAILDROP_SERVICE_NAME")
            .ok_or_else(|| MaildropError::Config("Missing MAILDROP_SERVICE_NAME".to_string()))?;

        let timeout_secs = match lookup("MAILDROP_BROKER_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                MaildropError::Config(format!("Invalid MAILDROP_BROKER_TIMEOUT_SECS: {}", raw))
            })?,
            None => DEFAULT_BROKER_TIMEOUT_SECS,
        };

        let sanitize_content_names = lookup("MAILDROP_SANITIZE_CONTENT_NAMES")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let config = Self {
            broker: BrokerConfig {
                url,
                service_name,
                exchange: lookup("MAILDROP_EVENT_EXCHANGE").unwrap_or_else(default_exchange),
                timeout_secs,
            },
            storage: StorageConfig {
                bucket: lookup("MAILDROP_BUCKET").unwrap_or_else(default_bucket),
                access_key_id: lookup("AWS_ACCESS_KEY_ID"),
                secret_access_key: lookup("AWS_SECRET_ACCESS_KEY"),
                region: lookup("AWS_REGION"),
                endpoint_url: lookup("MAILDROP_S3_ENDPOINT"),
            },
            sanitize_content_names,
        };

        config.validate()?;
        tracing::info!("Configuration validated successfully");

        Ok(config)
    }

    /// Validates configuration is usable. Credentials are checked later, when
    /// the bucket is acquired.
    pub fn validate(&self) -> Result<(), MaildropError> {
        let url = Url::parse(&self.broker.url)?;
        if !matches!(url.scheme(), "amqp" | "amqps") {
            return Err(MaildropError::Config(format!(
                "Broker URL must use amqp or amqps, got {}",
                url.scheme()
            )));
        }

        if self.broker.service_name.trim().is_empty() {
            return Err(MaildropError::Config("Service name not configured".to_string()));
        }

        if self.broker.timeout_secs == 0 {
            return Err(MaildropError::Config(
                "Broker timeout must be > 0".to_string(),
            ));
        }

        if self.storage.bucket.trim().is_empty() {
            return Err(MaildropError::Config("Bucket not configured".to_string()));
        }

        if let Some(endpoint) = &self.storage.endpoint_url {
            Url::parse(endpoint)?;
        }

        Ok(())
    }
}
