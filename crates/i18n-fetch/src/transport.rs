//! Transport seam between the fetcher and the HTTP stack.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use i18n_core::{ClientConfig, ConfigError, Credential};

use crate::error::{status_text, FetchError};

/// Per-request timeout. Fixed.
pub const REQUEST_TIMEOUT: Duration = Duration::from_millis(30_000);

/// A received HTTP response, whatever its status.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// Reason phrase.
    pub status_text: String,
    /// Raw body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Create a response with the canonical reason phrase.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            status_text: status_text(status),
            body: body.into(),
        }
    }

    /// Create a response with a JSON body.
    pub fn json(status: u16, value: &serde_json::Value) -> Self {
        Self::new(status, value.to_string())
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Convert a non-2xx response into an error.
    pub fn error_for_status(self) -> Result<Self, FetchError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(FetchError::Http {
                status: self.status,
                status_text: self.status_text,
            })
        }
    }
}

/// HTTP client bound to a base URL and credential.
///
/// Returns `Ok` for any received response; `Err` only when no response
/// arrived.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Issue `GET <base_url><path>`.
    async fn get(&self, path: &str) -> Result<HttpResponse, FetchError>;
}

/// Everything needed to build a transport.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionSettings {
    /// Base URL, without trailing slash.
    pub base_url: String,
    /// Credential sent with every request.
    pub credential: Credential,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ConnectionSettings {
    /// Derive settings from a client configuration.
    ///
    /// Fails when the base URL or credential is missing.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            base_url: config.api_base_url.trim().trim_end_matches('/').to_string(),
            credential: config.credential.clone(),
            timeout: REQUEST_TIMEOUT,
        })
    }

    /// Default headers: credential plus JSON content type.
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        vec![
            self.credential.header(),
            ("content-type", "application/json".to_string()),
        ]
    }
}

/// Builds transports from connection settings.
pub trait Connector: Send + Sync {
    /// Build a transport.
    fn connect(&self, settings: &ConnectionSettings) -> Result<Arc<dyn HttpTransport>, FetchError>;
}
