//! Fetch failures and their classification.

use i18n_core::{ConfigError, InvalidCode};

/// Error type for fetch operations.
///
/// `Display` renders the human-readable diagnostic used in logs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    #[error("Connection refused ({base_url})")]
    ConnectionRefused { base_url: String },

    #[error("Host not found ({base_url})")]
    HostNotFound { base_url: String },

    #[error("Request timeout ({timeout_ms}ms)")]
    Timeout { timeout_ms: u64 },

    #[error("HTTP {status}: {status_text}")]
    Http { status: u16, status_text: String },

    #[error("Network error ({})", .code.as_deref().unwrap_or("Unknown"))]
    Network { code: Option<String> },

    #[error("Invalid response body: {0}")]
    Decode(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Language or namespace unusable in a request path.
    #[error(transparent)]
    InvalidKey(#[from] InvalidCode),

    /// Failure with neither a response nor a dispatched request.
    #[error("{0}")]
    Other(String),
}

impl FetchError {
    /// Create an HTTP error, filling in the canonical status text.
    pub fn http(status: u16) -> Self {
        Self::Http {
            status,
            status_text: status_text(status),
        }
    }

    /// Whether another attempt may succeed.
    ///
    /// Retryable: no response at all, 5xx, or 429. Every other 4xx,
    /// configuration and decoding failures are final.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ConnectionRefused { .. }
            | Self::HostNotFound { .. }
            | Self::Timeout { .. }
            | Self::Network { .. } => true,
            Self::Http { status, .. } => *status == 429 || (500..=599).contains(status),
            Self::Decode(_) | Self::Config(_) | Self::InvalidKey(_) | Self::Other(_) => false,
        }
    }

    /// HTTP status of the response, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Canonical reason phrase for a status code ("" when unknown).
pub fn status_text(status: u16) -> String {
    http::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(FetchError::ConnectionRefused { base_url: "x".into() }.is_retryable());
        assert!(FetchError::HostNotFound { base_url: "x".into() }.is_retryable());
        assert!(FetchError::Timeout { timeout_ms: 30000 }.is_retryable());
        assert!(FetchError::Network { code: None }.is_retryable());
        assert!(FetchError::http(500).is_retryable());
        assert!(FetchError::http(503).is_retryable());
        assert!(FetchError::http(599).is_retryable());
        assert!(FetchError::http(429).is_retryable());
    }

    #[test]
    fn test_non_retryable_classification() {
        for status in [400, 401, 403, 404, 409, 422, 499] {
            assert!(!FetchError::http(status).is_retryable(), "status {}", status);
        }
        assert!(!FetchError::Decode("bad".into()).is_retryable());
        assert!(!FetchError::Config(ConfigError::MissingBaseUrl).is_retryable());
        assert!(!FetchError::Other("boom".into()).is_retryable());
    }

    #[test]
    fn test_diagnostic_messages() {
        assert_eq!(
            FetchError::ConnectionRefused { base_url: "https://api.example.com".into() }.to_string(),
            "Connection refused (https://api.example.com)"
        );
        assert_eq!(
            FetchError::HostNotFound { base_url: "https://nope.invalid".into() }.to_string(),
            "Host not found (https://nope.invalid)"
        );
        assert_eq!(
            FetchError::Timeout { timeout_ms: 30000 }.to_string(),
            "Request timeout (30000ms)"
        );
        assert_eq!(FetchError::http(404).to_string(), "HTTP 404: Not Found");
        assert_eq!(FetchError::http(429).to_string(), "HTTP 429: Too Many Requests");
        assert_eq!(
            FetchError::Network { code: Some("ConnectionReset".into()) }.to_string(),
            "Network error (ConnectionReset)"
        );
        assert_eq!(FetchError::Network { code: None }.to_string(), "Network error (Unknown)");
        assert_eq!(FetchError::Other("raw message".into()).to_string(), "raw message");
    }

    #[test]
    fn test_status() {
        assert_eq!(FetchError::http(502).status(), Some(502));
        assert_eq!(FetchError::Timeout { timeout_ms: 1 }.status(), None);
    }
}
