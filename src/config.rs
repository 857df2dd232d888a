//! Service configuration
//!
//! Settings are layered: built-in defaults, then an optional YAML file, then
//! `AGGREGATOR_*` environment variables, then command-line flags.
//!
//! # Example
//!
//! ```yaml
//! api:
//!   base_url: https://api.example.com
//!   bearer_token: secret
//!   timeout:
//!     connect_ms: 5000
//!     read_ms: 30000
//!     write_ms: 30000
//! cache:
//!   enabled: true
//!   ttl_secs: 300
//! aggregation:
//!   deadline_ms: 60000
//! server:
//!   port: 8080
//! ```

use crate::aggregate::{AggregationOptions, CacheConfig};
use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RetryPolicy};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Prefix shared by all environment overrides
pub const ENV_PREFIX: &str = "AGGREGATOR_";

/// Top-level settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api: ApiSettings,
    pub cache: CacheSettings,
    pub aggregation: AggregationSettings,
    pub server: ServerSettings,
}

/// Upstream API connection settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    pub bearer_token: String,
    pub timeout: TimeoutSettings,
    pub retry: RetrySettings,
}

/// Per-call timeouts in milliseconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutSettings {
    pub connect_ms: u64,
    pub read_ms: u64,
    pub write_ms: u64,
}

impl Default for TimeoutSettings {
    fn default() -> Self {
        Self {
            connect_ms: 5000,
            read_ms: 30000,
            write_ms: 30000,
        }
    }
}

/// Retry budget for one upstream page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub multiplier: f64,
    pub max_backoff_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 1000,
            multiplier: 2.0,
            max_backoff_ms: 5000,
        }
    }
}

/// Aggregate cache settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub enabled: bool,
    pub ttl_secs: u64,
    pub max_capacity: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: 300,
            max_capacity: 1,
        }
    }
}

/// Aggregation loop settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationSettings {
    /// Overall deadline for one full aggregation; unset means none
    pub deadline_ms: Option<u64>,
    /// Treat a page without pagination headers as an error
    pub require_cursor: bool,
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Settings {
    /// Parse settings from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load settings from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_yaml(&contents)
    }

    /// Load defaults or the given file, then apply process environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        settings.apply_env(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    /// Apply `AGGREGATOR_*` overrides read through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

        if let Some(v) = var("API_BASE_URL") {
            self.api.base_url = v;
        }
        if let Some(v) = var("API_BEARER_TOKEN") {
            self.api.bearer_token = v;
        }
        if let Some(v) = var("API_CONNECT_TIMEOUT_MS") {
            self.api.timeout.connect_ms = parse_value("API_CONNECT_TIMEOUT_MS", &v)?;
        }
        if let Some(v) = var("API_READ_TIMEOUT_MS") {
            self.api.timeout.read_ms = parse_value("API_READ_TIMEOUT_MS", &v)?;
        }
        if let Some(v) = var("API_WRITE_TIMEOUT_MS") {
            self.api.timeout.write_ms = parse_value("API_WRITE_TIMEOUT_MS", &v)?;
        }
        if let Some(v) = var("CACHE_ENABLED") {
            self.cache.enabled = parse_value("CACHE_ENABLED", &v)?;
        }
        if let Some(v) = var("CACHE_TTL_SECS") {
            self.cache.ttl_secs = parse_value("CACHE_TTL_SECS", &v)?;
        }
        if let Some(v) = var("AGGREGATION_DEADLINE_MS") {
            self.aggregation.deadline_ms = Some(parse_value("AGGREGATION_DEADLINE_MS", &v)?);
        }
        if let Some(v) = var("SERVER_PORT") {
            self.server.port = parse_value("SERVER_PORT", &v)?;
        }

        Ok(())
    }

    /// Reject settings the service cannot start with
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(Error::missing_field("api.base_url"));
        }
        url::Url::parse(&self.api.base_url)?;

        if self.api.bearer_token.trim().is_empty() {
            return Err(Error::missing_field("api.bearer_token"));
        }
        if self.api.retry.max_attempts == 0 {
            return Err(Error::invalid_config(
                "api.retry.max_attempts",
                "must be at least 1",
            ));
        }
        if self.api.retry.multiplier < 1.0 {
            return Err(Error::invalid_config(
                "api.retry.multiplier",
                "must be at least 1.0",
            ));
        }
        Ok(())
    }

    /// HTTP client configuration for the upstream API
    pub fn http_client_config(&self) -> HttpClientConfig {
        let timeout = &self.api.timeout;
        HttpClientConfig::builder()
            .base_url(self.api.base_url.clone())
            .bearer_token(&self.api.bearer_token)
            .timeouts(
                Duration::from_millis(timeout.connect_ms),
                Duration::from_millis(timeout.read_ms),
                Duration::from_millis(timeout.write_ms),
            )
            .retry(self.retry_policy())
            .build()
    }

    /// Retry policy for upstream pages
    pub fn retry_policy(&self) -> RetryPolicy {
        let retry = &self.api.retry;
        RetryPolicy {
            max_attempts: retry.max_attempts,
            initial_backoff: Duration::from_millis(retry.initial_backoff_ms),
            multiplier: retry.multiplier,
            max_backoff: Duration::from_millis(retry.max_backoff_ms),
        }
    }

    /// Cache configuration
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            enabled: self.cache.enabled,
            ttl: Duration::from_secs(self.cache.ttl_secs),
            max_capacity: self.cache.max_capacity,
        }
    }

    /// Aggregation options
    pub fn aggregation_options(&self) -> AggregationOptions {
        AggregationOptions {
            deadline: self.aggregation.deadline_ms.map(Duration::from_millis),
            require_cursor: self.aggregation.require_cursor,
        }
    }
}

fn parse_value<T: FromStr>(name: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| Error::invalid_config(format!("{ENV_PREFIX}{name}"), e.to_string()))
}
