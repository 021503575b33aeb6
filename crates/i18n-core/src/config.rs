//! Client configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Language used when none is configured.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Environment variable names read by [`ClientConfig::apply_env_overrides`].
pub mod env {
    /// Base URL of the translation API.
    pub const API_URL: &str = "I18N_API_URL";
    /// API key, sent as `x-api-key`.
    pub const API_KEY: &str = "I18N_API_KEY";
    /// Bearer token, sent as `Authorization: Bearer`.
    pub const BEARER_TOKEN: &str = "I18N_BEARER_TOKEN";
    /// Default language code.
    pub const DEFAULT_LANGUAGE: &str = "I18N_DEFAULT_LANGUAGE";
    /// Maximum retry attempts.
    pub const MAX_RETRIES: &str = "I18N_MAX_RETRIES";
    /// Base retry delay in milliseconds.
    pub const BASE_DELAY_MS: &str = "I18N_BASE_DELAY_MS";
    /// Maximum retry delay in milliseconds.
    pub const MAX_DELAY_MS: &str = "I18N_MAX_DELAY_MS";
}

/// Static credential presented to the translation API.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Credential {
    /// Sent as `Authorization: Bearer <token>`.
    Bearer(String),
    /// Sent as `x-api-key: <key>`.
    ApiKey(String),
}

impl Credential {
    /// Create a bearer-token credential.
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer(token.into())
    }

    /// Create an API-key credential.
    pub fn api_key(key: impl Into<String>) -> Self {
        Self::ApiKey(key.into())
    }

    /// The raw secret.
    pub fn secret(&self) -> &str {
        match self {
            Self::Bearer(s) | Self::ApiKey(s) => s,
        }
    }

    /// Whether the secret is blank.
    pub fn is_empty(&self) -> bool {
        self.secret().trim().is_empty()
    }

    /// Header name and value carrying this credential.
    pub fn header(&self) -> (&'static str, String) {
        match self {
            Self::Bearer(token) => ("authorization", format!("Bearer {}", token)),
            Self::ApiKey(key) => ("x-api-key", key.clone()),
        }
    }

    /// Short label for the credential kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bearer(_) => "bearer",
            Self::ApiKey(_) => "api_key",
        }
    }
}

impl Default for Credential {
    fn default() -> Self {
        Self::Bearer(String::new())
    }
}

// Secrets never reach logs.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redacted = if self.is_empty() { "<empty>" } else { "<redacted>" };
        match self {
            Self::Bearer(_) => f.debug_tuple("Bearer").field(&redacted).finish(),
            Self::ApiKey(_) => f.debug_tuple("ApiKey").field(&redacted).finish(),
        }
    }
}

/// Optional retry overrides, merged over the fetcher's defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    /// Maximum number of retries after the first attempt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
    /// Delay before the first retry, in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_delay_ms: Option<u64>,
    /// Upper bound for any single delay, in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_delay_ms: Option<u64>,
    /// Growth factor applied per attempt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backoff_multiplier: Option<f64>,
}

impl RetrySettings {
    /// Set the maximum number of retries.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Set the base delay in milliseconds.
    pub fn with_base_delay_ms(mut self, ms: u64) -> Self {
        self.base_delay_ms = Some(ms);
        self
    }

    /// Set the maximum delay in milliseconds.
    pub fn with_max_delay_ms(mut self, ms: u64) -> Self {
        self.max_delay_ms = Some(ms);
        self
    }

    /// Set the backoff multiplier.
    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = Some(multiplier);
        self
    }
}

/// Configuration for the translation client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the translation API (e.g., "https://i18n.example.com/api").
    #[serde(default)]
    pub api_base_url: String,
    /// Credential sent with every request.
    #[serde(default)]
    pub credential: Credential,
    /// Language used as fallback when enumeration fails.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_language: Option<String>,
    /// Retry overrides.
    #[serde(default)]
    pub retry: RetrySettings,
}

impl ClientConfig {
    /// Create a new client configuration.
    pub fn new(api_base_url: impl Into<String>, credential: Credential) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            credential,
            default_language: None,
            retry: RetrySettings::default(),
        }
    }

    /// Set the default language.
    pub fn with_default_language(mut self, language: impl Into<String>) -> Self {
        self.default_language = Some(language.into());
        self
    }

    /// Set retry overrides.
    pub fn with_retry(mut self, retry: RetrySettings) -> Self {
        self.retry = retry;
        self
    }

    /// Configured default language, or [`DEFAULT_LANGUAGE`].
    pub fn default_language(&self) -> &str {
        self.default_language
            .as_deref()
            .filter(|l| !l.is_empty())
            .unwrap_or(DEFAULT_LANGUAGE)
    }

    /// Check that a client can be built from this configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base_url.trim().is_empty() {
            return Err(ConfigError::MissingBaseUrl);
        }
        if self.credential.is_empty() {
            return Err(ConfigError::MissingCredential);
        }
        Ok(())
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    /// Apply overrides from an arbitrary variable source.
    ///
    /// `I18N_API_KEY` wins over `I18N_BEARER_TOKEN` when both are set.
    /// Unparseable numeric values are ignored.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(env::API_URL) {
            self.api_base_url = url;
        }

        if let Some(key) = get(env::API_KEY) {
            self.credential = Credential::ApiKey(key);
        } else if let Some(token) = get(env::BEARER_TOKEN) {
            self.credential = Credential::Bearer(token);
        }

        if let Some(language) = get(env::DEFAULT_LANGUAGE) {
            self.default_language = Some(language);
        }

        if let Some(n) = get(env::MAX_RETRIES).and_then(|v| v.parse().ok()) {
            self.retry.max_retries = Some(n);
        }
        if let Some(ms) = get(env::BASE_DELAY_MS).and_then(|v| v.parse().ok()) {
            self.retry.base_delay_ms = Some(ms);
        }
        if let Some(ms) = get(env::MAX_DELAY_MS).and_then(|v| v.parse().ok()) {
            self.retry.max_delay_ms = Some(ms);
        }
    }
}
