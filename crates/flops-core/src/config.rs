//! Configuration structures for flops clients.
//!
//! A client is built from an explicit, validated configuration struct. The
//! credential pair it carries is immutable once built.

use crate::Error;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::time::Duration;
use url::Url;
use validator::Validate;

/// Versioned base URL of the public API.
pub const DEFAULT_ENDPOINT: &str = "https://api.flops.ru/api/v1/";

/// Environment variable holding the client identifier.
pub const ENV_CLIENT_ID: &str = "FLOPS_CLIENT_ID";

/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "FLOPS_API_KEY";

/// Environment variable overriding the endpoint.
pub const ENV_ENDPOINT: &str = "FLOPS_ENDPOINT";

/// Client identifier and API key sent with every request.
///
/// Emptiness is not rejected here; the request pipeline refuses to issue a call
/// when either half is empty.
#[derive(Clone)]
pub struct Credentials {
    client_id: String,
    api_key: SecretString,
}

impl Credentials {
    /// Create a credential pair.
    #[must_use]
    pub fn new(client_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            api_key: SecretString::from(api_key.into()),
        }
    }

    /// The client identifier.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// The API key.
    #[must_use]
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Returns true when both halves are non-empty.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.client_id.is_empty() && !self.api_key.expose_secret().is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// Configuration for a flops client instance.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FlopsConfig {
    /// API base URL
    #[validate(url)]
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Client identifier
    #[serde(default)]
    pub client_id: String,

    /// API key
    #[serde(default = "empty_secret", deserialize_with = "deserialize_secret")]
    pub api_key: SecretString,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Interval between operation status checks, in milliseconds
    #[validate(range(min = 10, max = 60000))]
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Whether to verify TLS certificates
    #[serde(default = "default_tls_verify")]
    pub tls_verify: bool,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn empty_secret() -> SecretString {
    SecretString::from(String::new())
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

const fn default_request_timeout_secs() -> u64 {
    30
}

const fn default_poll_interval_ms() -> u64 {
    500
}

const fn default_tls_verify() -> bool {
    true
}

impl FlopsConfig {
    /// Create a configuration for the public endpoint.
    #[must_use]
    pub fn new(client_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: default_endpoint(),
            client_id: client_id.into(),
            api_key: SecretString::from(api_key.into()),
            request_timeout_secs: default_request_timeout_secs(),
            poll_interval_ms: default_poll_interval_ms(),
            tls_verify: default_tls_verify(),
        }
    }

    /// Build a configuration from `FLOPS_CLIENT_ID`, `FLOPS_API_KEY` and the
    /// optional `FLOPS_ENDPOINT`.
    ///
    /// Missing credentials become empty strings so the failure surfaces as an
    /// authorization error on the first call.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting configuration fails validation.
    pub fn from_env() -> Result<Self, Error> {
        let client_id = std::env::var(ENV_CLIENT_ID).unwrap_or_default();
        let api_key = std::env::var(ENV_API_KEY).unwrap_or_default();
        let mut config = Self::new(client_id, api_key);
        if let Ok(endpoint) = std::env::var(ENV_ENDPOINT) {
            config = config.with_endpoint(endpoint);
        }
        config.check()?;
        Ok(config)
    }

    /// Set the API base URL.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = seconds;
        self
    }

    /// Set the operation polling interval in milliseconds.
    #[must_use]
    pub const fn with_poll_interval_ms(mut self, millis: u64) -> Self {
        self.poll_interval_ms = millis;
        self
    }

    /// Set whether to verify TLS certificates.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Validate field ranges and the endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] describing the first invalid field.
    pub fn check(&self) -> Result<(), Error> {
        self.validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))
    }

    /// The credential pair carried by this configuration.
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials {
            client_id: self.client_id.clone(),
            api_key: self.api_key.clone(),
        }
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Get the polling interval as a Duration.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Parse the endpoint, ensuring a trailing slash so relative paths join
    /// beneath the version segment.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn parse_endpoint(&self) -> Result<Url, Error> {
        let mut endpoint = self.endpoint.clone();
        if !endpoint.ends_with('/') {
            endpoint.push('/');
        }
        Url::parse(&endpoint)
            .map_err(|e| Error::InvalidEndpoint(format!("Invalid endpoint `{}`: {e}", self.endpoint)))
    }
}
