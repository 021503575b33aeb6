//! reqwest-backed transport.

use std::error::Error as StdError;
use std::io;
use std::sync::Arc;

use async_trait::async_trait;
use i18n_core::ConfigError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::error::FetchError;
use crate::transport::{ConnectionSettings, Connector, HttpResponse, HttpTransport};

/// Builds [`ReqwestTransport`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReqwestConnector;

impl Connector for ReqwestConnector {
    fn connect(&self, settings: &ConnectionSettings) -> Result<Arc<dyn HttpTransport>, FetchError> {
        reqwest::Url::parse(&settings.base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: settings.base_url.clone(),
            reason: e.to_string(),
        })?;

        let mut headers = HeaderMap::new();
        for (name, value) in settings.headers() {
            let mut value = HeaderValue::from_str(&value)
                .map_err(|_| ConfigError::InvalidHeader(name.to_string()))?;
            if name != "content-type" {
                value.set_sensitive(true);
            }
            headers.insert(HeaderName::from_static(name), value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(settings.timeout)
            .build()
            .map_err(|e| FetchError::Other(e.to_string()))?;

        Ok(Arc::new(ReqwestTransport {
            client,
            base_url: settings.base_url.clone(),
            timeout_ms: settings.timeout.as_millis() as u64,
        }))
    }
}

/// HTTP transport over a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: String,
    timeout_ms: u64,
}

impl ReqwestTransport {
    fn classify(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            return FetchError::Timeout {
                timeout_ms: self.timeout_ms,
            };
        }
        if err.is_builder() {
            return FetchError::Other(err.to_string());
        }
        if err.is_connect() {
            if io_kind(&err) == Some(io::ErrorKind::ConnectionRefused) {
                return FetchError::ConnectionRefused {
                    base_url: self.base_url.clone(),
                };
            }
            if is_dns_failure(&err) {
                return FetchError::HostNotFound {
                    base_url: self.base_url.clone(),
                };
            }
        }
        FetchError::Network {
            code: io_kind(&err).map(|kind| format!("{:?}", kind)),
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, path: &str) -> Result<HttpResponse, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| self.classify(e))?;

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body: body.to_vec(),
        })
    }
}

fn io_kind(err: &(dyn StdError + 'static)) -> Option<io::ErrorKind> {
    let mut source = err.source();
    while let Some(e) = source {
        if let Some(io_err) = e.downcast_ref::<io::Error>() {
            return Some(io_err.kind());
        }
        source = e.source();
    }
    None
}

// hyper-util reports resolver failures only through the message text.
fn is_dns_failure(err: &(dyn StdError + 'static)) -> bool {
    let mut current: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(e) = current {
        let msg = e.to_string().to_lowercase();
        if msg.contains("dns error")
            || msg.contains("failed to lookup address")
            || msg.contains("name or service not known")
            || msg.contains("no such host")
        {
            return true;
        }
        current = e.source();
    }
    false
}
