//! Error types for the contact aggregator
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use std::sync::Arc;
use thiserror::Error;

/// The main error type for the contact aggregator
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Upstream Errors
    // ============================================================================
    #[error("Failed to fetch contacts after multiple retry attempts for page {page}")]
    UpstreamUnavailable {
        page: u32,
        #[source]
        source: Box<Error>,
    },

    #[error("Page {page} carried no pagination headers")]
    MalformedCursor { page: u32 },

    #[error("Aggregation did not finish within {timeout_ms}ms")]
    DeadlineExceeded { timeout_ms: u64 },

    // ============================================================================
    // Request Errors
    // ============================================================================
    #[error("{message}")]
    InvalidArgument { parameter: String, message: String },

    #[error("Invalid value '{value}' for parameter '{parameter}'. {expected}")]
    InvalidParameterType {
        parameter: String,
        value: String,
        expected: String,
    },

    /// A failure observed by every caller that joined the same computation
    #[error(transparent)]
    Shared(Arc<Error>),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Wrap the last failure of an exhausted retry budget
    pub fn upstream(page: u32, source: Error) -> Self {
        Self::UpstreamUnavailable {
            page,
            source: Box::new(source),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Create an invalid parameter type error
    pub fn invalid_type(
        parameter: impl Into<String>,
        value: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self::InvalidParameterType {
            parameter: parameter.into(),
            value: value.into(),
            expected: expected.into(),
        }
    }

    /// Take ownership of a shared error, keeping it wrapped if other holders remain
    pub fn from_shared(shared: Arc<Error>) -> Self {
        Arc::try_unwrap(shared).unwrap_or_else(Self::Shared)
    }

    /// The underlying error, looking through `Shared` wrappers
    pub fn root(&self) -> &Error {
        match self {
            Error::Shared(inner) => inner.root(),
            other => other,
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self.root() {
            Error::Http(_) | Error::Timeout { .. } | Error::Decode { .. } => true,
            Error::HttpStatus { .. } => true,
            _ => false,
        }
    }

    /// Check if this error originates from the upstream API
    pub fn is_upstream(&self) -> bool {
        matches!(
            self.root(),
            Error::UpstreamUnavailable { .. } | Error::MalformedCursor { .. }
        )
    }
}

/// Result type alias for the contact aggregator
pub type Result<T> = std::result::Result<T, Error>;
