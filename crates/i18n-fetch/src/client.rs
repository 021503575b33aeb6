//! Translation fetcher with lazy, resettable HTTP client.

use std::sync::Arc;

use async_trait::async_trait;
use i18n_core::{
    ClientConfig, Credential, I18nClientError, TranslationKey, TranslationLoader, TranslationMap,
    TranslationSet,
};
use parking_lot::{Mutex, RwLock};

use crate::error::FetchError;
use crate::payload;
use crate::reqwest_transport::ReqwestConnector;
use crate::retry::RetryPolicy;
use crate::transport::{ConnectionSettings, Connector, HttpResponse, HttpTransport};

/// Liveness endpoint.
pub const HEALTH_PATH: &str = "/health";

/// Language enumeration endpoint.
pub const LANGUAGES_PATH: &str = "/translations/language";

/// HTTP loader for translation tables.
///
/// Every network call runs inside the retry envelope of the configured
/// [`RetryPolicy`]. The HTTP client is built on first use from the current
/// configuration and shared by concurrent requests until
/// [`reset_connection`](Self::reset_connection) discards it.
pub struct TranslationFetcher {
    config: RwLock<ClientConfig>,
    retry: RetryPolicy,
    connector: Arc<dyn Connector>,
    handle: Mutex<Option<Arc<dyn HttpTransport>>>,
}

impl TranslationFetcher {
    /// Create a fetcher using the reqwest transport.
    pub fn new(config: ClientConfig) -> Self {
        Self::with_connector(config, Arc::new(ReqwestConnector))
    }

    /// Create a fetcher with a custom transport connector.
    pub fn with_connector(config: ClientConfig, connector: Arc<dyn Connector>) -> Self {
        if let Err(e) = config.validate() {
            tracing::warn!(error = %e, "Incomplete API configuration, HTTP client will not initialize");
        }

        Self {
            retry: RetryPolicy::from_settings(&config.retry),
            config: RwLock::new(config),
            connector,
            handle: Mutex::new(None),
        }
    }

    /// The retry policy in effect.
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// The configured default language, or "en".
    pub fn default_language(&self) -> String {
        self.config.read().default_language().to_string()
    }

    /// Whether an HTTP client is currently cached.
    pub fn is_connected(&self) -> bool {
        self.handle.lock().is_some()
    }

    /// Discard the cached HTTP client; the next call rebuilds it.
    ///
    /// Requests already in flight keep their client.
    pub fn reset_connection(&self) {
        if self.handle.lock().take().is_some() {
            tracing::debug!("HTTP client reset");
        }
    }

    /// Swap the credential and reset the connection.
    pub fn rotate_credential(&self, credential: Credential) {
        self.config.write().credential = credential;
        self.reset_connection();
    }

    fn transport(&self) -> Result<Arc<dyn HttpTransport>, FetchError> {
        let mut handle = self.handle.lock();
        if let Some(transport) = handle.as_ref() {
            return Ok(Arc::clone(transport));
        }

        let settings = ConnectionSettings::from_config(&self.config.read())?;
        let transport = self.connector.connect(&settings)?;
        tracing::debug!(base_url = %settings.base_url, "HTTP client initialized");

        *handle = Some(Arc::clone(&transport));
        Ok(transport)
    }

    async fn get(&self, path: &str) -> Result<HttpResponse, FetchError> {
        self.retry
            .execute(path, |_| async move {
                let transport = self.transport()?;
                let result = match transport.get(path).await {
                    Ok(response) => response.error_for_status(),
                    Err(e) => Err(e),
                };
                if let Err(e) = &result {
                    tracing::error!(method = "GET", path, error = %e, "Request failed");
                }
                result
            })
            .await
    }

    async fn fetch_table(&self, key: &TranslationKey) -> Result<TranslationMap, FetchError> {
        let response = self.get(&key.path()?).await?;
        payload::translations(&response.body)
    }

    /// Available language codes.
    ///
    /// Falls back to `[default_language]` on any failure.
    pub async fn list_languages(&self) -> Vec<String> {
        let result = self
            .get(LANGUAGES_PATH)
            .await
            .and_then(|response| payload::languages(&response.body));

        match result {
            Ok(Some(languages)) => languages,
            Ok(None) => {
                let fallback = self.default_language();
                tracing::warn!(fallback = %fallback, "No language list in response, using fallback");
                vec![fallback]
            }
            Err(e) => {
                let fallback = self.default_language();
                tracing::warn!(error = %e, fallback = %fallback, "Failed to fetch languages, using fallback");
                vec![fallback]
            }
        }
    }

    /// Namespaces published for `language`. Empty on any failure.
    pub async fn list_namespaces(&self, language: &str) -> Vec<String> {
        let result = match TranslationKey::language(language).path() {
            Ok(path) => self
                .get(&path)
                .await
                .and_then(|response| payload::namespaces(&response.body)),
            Err(e) => Err(e.into()),
        };

        match result {
            Ok(namespaces) => namespaces,
            Err(e) => {
                tracing::warn!(language, error = %e, "Failed to fetch namespaces");
                Vec::new()
            }
        }
    }

    /// Base translations for every available language, fetched one language
    /// at a time in listed order.
    ///
    /// A language that fails to load gets an empty table. Configuration
    /// errors abort the whole load.
    pub async fn load_all(&self) -> Result<TranslationSet, I18nClientError> {
        let languages = self.list_languages().await;
        let mut set = TranslationSet::new();

        for language in languages {
            let key = TranslationKey::language(&language);
            match self.fetch_table(&key).await {
                Ok(table) => {
                    set.insert(language, table);
                }
                Err(FetchError::Config(e)) => {
                    tracing::error!(error = %e, "Failed to load translations");
                    return Err(I18nClientError::new("Failed to load translations").with_source(e));
                }
                Err(e) => {
                    tracing::warn!(language = %language, error = %e, "Failed to load language");
                    set.insert(language, TranslationMap::new());
                }
            }
        }

        let loaded: Vec<&str> = set.keys().map(String::as_str).collect();
        tracing::info!(languages = %loaded.join(", "), "Loaded translations");
        Ok(set)
    }

    /// Translations for `language`, optionally scoped to `namespace`.
    ///
    /// Failures are surfaced as a client error naming the key.
    pub async fn load_language_namespace(
        &self,
        language: &str,
        namespace: Option<&str>,
    ) -> Result<TranslationMap, I18nClientError> {
        let key = TranslationKey::from_parts(language, namespace);

        match self.fetch_table(&key).await {
            Ok(table) => {
                tracing::info!(key = %key, entries = table.len(), "Loaded translations");
                Ok(table)
            }
            Err(e) => {
                tracing::error!(key = %key, error = %e, "Failed to load translations");
                Err(I18nClientError::new(format!("Failed to load {}", key))
                    .with_status(e.status())
                    .with_source(e))
            }
        }
    }

    /// True iff the health endpoint answers 2xx within the retry budget.
    pub async fn health_check(&self) -> bool {
        match self.get(HEALTH_PATH).await {
            Ok(_) => true,
            Err(e) => {
                tracing::error!(error = %e, "Health check failed");
                false
            }
        }
    }
}

#[async_trait]
impl TranslationLoader for TranslationFetcher {
    async fn languages(&self) -> Vec<String> {
        self.list_languages().await
    }

    async fn namespaces(&self, language: &str) -> Vec<String> {
        self.list_namespaces(language).await
    }

    async fn load(&self) -> Result<TranslationSet, I18nClientError> {
        self.load_all().await
    }

    async fn load_language_namespace(
        &self,
        language: &str,
        namespace: Option<&str>,
    ) -> Result<TranslationMap, I18nClientError> {
        TranslationFetcher::load_language_namespace(self, language, namespace).await
    }

    async fn health_check(&self) -> bool {
        TranslationFetcher::health_check(self).await
    }
}
