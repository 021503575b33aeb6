//! Errors shared across the client crates.

use std::error::Error as StdError;

/// Boxed error cause.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Configuration problem detected when the HTTP client is first built.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing API base URL")]
    MissingBaseUrl,

    #[error("Missing API credential")]
    MissingCredential,

    #[error("Invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Invalid header value: {0}")]
    InvalidHeader(String),
}

/// A language or namespace code that is not a safe path segment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid translation code '{0}'")]
pub struct InvalidCode(pub String);

/// A specific load failed.
///
/// Carries a human-readable message, the HTTP status when a response was
/// received, and the original cause.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct I18nClientError {
    message: String,
    status: Option<u16>,
    #[source]
    source: Option<BoxError>,
}

impl I18nClientError {
    /// Create an error with a message only.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            source: None,
        }
    }

    /// Attach the HTTP status code.
    pub fn with_status(mut self, status: Option<u16>) -> Self {
        self.status = status;
        self
    }

    /// Attach the original cause.
    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// The message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP status of the failing response, if any.
    pub fn status(&self) -> Option<u16> {
        self.status
    }
}
