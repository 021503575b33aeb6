//! Capability traits between the fetcher, the coordinator and the host.

use async_trait::async_trait;

use crate::error::{I18nClientError, InvalidCode};
use crate::translation::{TranslationKey, TranslationMap, TranslationSet};

/// Source of translation tables.
///
/// Implemented by the HTTP fetcher; the host's i18n layer and the refresh
/// coordinator call through this trait.
#[async_trait]
pub trait TranslationLoader: Send + Sync {
    /// Available language codes. Degrades to the default language, never fails.
    async fn languages(&self) -> Vec<String>;

    /// Namespaces available for a language. Degrades to an empty list.
    async fn namespaces(&self, language: &str) -> Vec<String>;

    /// Base translations for every available language.
    async fn load(&self) -> Result<TranslationSet, I18nClientError>;

    /// Translations for one language, optionally scoped to a namespace.
    async fn load_language_namespace(
        &self,
        language: &str,
        namespace: Option<&str>,
    ) -> Result<TranslationMap, I18nClientError>;

    /// Whether the remote API is reachable and healthy.
    async fn health_check(&self) -> bool;
}

/// Lookup failure reported by a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("No translations loaded for language '{0}'")]
    UnknownLanguage(String),

    #[error("Missing translation '{key}' for language '{language}'")]
    MissingKey { key: String, language: String },

    #[error("Translation '{key}' is not a string")]
    NotAString { key: String },

    #[error(transparent)]
    InvalidKey(#[from] InvalidCode),

    #[error("Catalog error: {0}")]
    Backend(String),
}

/// Consumer of translation tables: the host's lookup/interpolation engine.
///
/// The client caches nothing itself; every successfully loaded table is
/// handed here and replaces the previous table for the same key.
pub trait TranslationCatalog: Send + Sync {
    /// Replace the table stored under `key`.
    ///
    /// On error the previous table, if any, stays in place.
    fn apply(&self, key: &TranslationKey, translations: TranslationMap) -> Result<(), CatalogError>;

    /// Render `key` for `language`.
    fn translate(&self, key: &str, language: &str) -> Result<String, CatalogError>;
}
