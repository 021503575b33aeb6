//! Mutually exclusive refresh of translation tables.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use i18n_core::{ClientConfig, TranslationCatalog, TranslationKey, TranslationLoader};

use crate::error::{RefreshError, RefreshOutcome, RefreshReport};

/// Keeps a catalog up to date with the remote translation API.
///
/// At most one refresh runs at a time per coordinator. A refresh requested
/// while another is running is skipped, not queued.
pub struct RefreshCoordinator {
    config: ClientConfig,
    loader: Arc<dyn TranslationLoader>,
    catalog: Arc<dyn TranslationCatalog>,
    refreshing: AtomicBool,
}

/// Clears the in-progress flag on every exit path.
struct RefreshGuard<'a>(&'a AtomicBool);

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl RefreshCoordinator {
    /// Create an idle coordinator over `loader` and `catalog`.
    pub fn new(
        config: ClientConfig,
        loader: Arc<dyn TranslationLoader>,
        catalog: Arc<dyn TranslationCatalog>,
    ) -> Self {
        Self {
            config,
            loader,
            catalog,
            refreshing: AtomicBool::new(false),
        }
    }

    /// Whether a refresh is currently running.
    pub fn is_refresh_in_progress(&self) -> bool {
        self.refreshing.load(Ordering::Acquire)
    }

    fn try_begin(&self) -> Option<RefreshGuard<'_>> {
        self.refreshing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RefreshGuard(&self.refreshing))
    }

    /// Timer entry point. Never fails; errors are logged.
    pub async fn scheduled_refresh(&self) {
        let Some(_guard) = self.try_begin() else {
            tracing::info!("Translation refresh already in progress, skipping");
            return;
        };

        tracing::info!("Starting scheduled translation refresh");
        match self.perform_refresh().await {
            Ok(report) => {
                tracing::info!(
                    loaded = report.loaded.len(),
                    failed = report.failed.len(),
                    "Scheduled translation refresh completed"
                );
            }
            Err(e) => {
                tracing::error!(error = %e, "Scheduled translation refresh failed");
            }
        }
    }

    /// Operator entry point. Same exclusivity as the timer, but failures
    /// reach the caller.
    pub async fn manual_refresh(&self) -> Result<RefreshOutcome, RefreshError> {
        let Some(_guard) = self.try_begin() else {
            tracing::info!("Translation refresh already in progress, skipping");
            return Ok(RefreshOutcome::Skipped);
        };

        tracing::info!("Starting manual translation refresh");
        match self.perform_refresh().await {
            Ok(report) => {
                tracing::info!(%report, "Manual translation refresh completed");
                Ok(RefreshOutcome::Completed(report))
            }
            Err(e) => {
                tracing::error!(error = %e, "Manual translation refresh failed");
                Err(e)
            }
        }
    }

    async fn perform_refresh(&self) -> Result<RefreshReport, RefreshError> {
        if !self.loader.health_check().await {
            return Err(RefreshError::Unhealthy);
        }

        let languages = self.loader.languages().await;
        let mut report = RefreshReport::default();

        for language in &languages {
            self.refresh_language(language, &mut report).await;
        }

        let default_language = self.config.default_language();
        if !languages.iter().any(|l| l == default_language) {
            tracing::debug!(language = default_language, "Default language not listed, refreshing it");
            self.refresh_language(default_language, &mut report).await;
        }

        Ok(report)
    }

    async fn refresh_language(&self, language: &str, report: &mut RefreshReport) {
        self.refresh_table(TranslationKey::language(language), report)
            .await;

        for namespace in self.loader.namespaces(language).await {
            self.refresh_table(TranslationKey::namespaced(language, namespace), report)
                .await;
        }
    }

    async fn refresh_table(&self, key: TranslationKey, report: &mut RefreshReport) {
        let namespace = key.namespace.as_deref();
        match self
            .loader
            .load_language_namespace(&key.language, namespace)
            .await
        {
            Ok(table) => {
                let entries = table.len();
                match self.catalog.apply(&key, table) {
                    Ok(()) => {
                        tracing::debug!(key = %key, entries, "Applied translations");
                        report.loaded.push(key);
                    }
                    Err(e) => {
                        tracing::warn!(key = %key, error = %e, "Catalog rejected translations");
                        report.failed.push(key);
                    }
                }
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Skipping translations");
                report.failed.push(key);
            }
        }
    }

    /// Render `key` in `language` (or the default language).
    ///
    /// Returns `key` itself when the lookup fails.
    pub fn get_translation(&self, key: &str, language: Option<&str>) -> String {
        let language = language.unwrap_or_else(|| self.config.default_language());
        match self.catalog.translate(key, language) {
            Ok(text) => text,
            Err(e) => {
                tracing::debug!(key, language, error = %e, "Translation lookup failed");
                key.to_string()
            }
        }
    }

    /// Ask the loader whether the translation API is reachable.
    pub async fn health_check(&self) -> bool {
        self.loader.health_check().await
    }

    /// A copy of the configuration.
    pub fn configuration(&self) -> ClientConfig {
        self.config.clone()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use async_trait::async_trait;
    use i18n_core::{
        CatalogError, Credential, I18nClientError, TranslationMap, TranslationSet,
    };
    use i18n_fetch::mock::{ok_json, refused, status, MockConnector, MockTransport};
    use i18n_fetch::TranslationFetcher;
    use parking_lot::Mutex;
    use serde_json::{json, Value};

    use super::*;

    #[derive(Default)]
    struct ScriptedLoader {
        healthy: bool,
        languages: Vec<String>,
        namespaces: HashMap<String, Vec<String>>,
        tables: HashMap<TranslationKey, TranslationMap>,
        latency: Option<Duration>,
        health_calls: Mutex<usize>,
        loads: Mutex<Vec<TranslationKey>>,
    }

    impl ScriptedLoader {
        fn healthy(languages: &[&str]) -> Self {
            Self {
                healthy: true,
                languages: languages.iter().map(|l| l.to_string()).collect(),
                ..Self::default()
            }
        }

        fn with_table(mut self, key: TranslationKey, table: Value) -> Self {
            let table = table.as_object().cloned().unwrap_or_default();
            self.tables.insert(key, table);
            self
        }

        fn with_namespaces(mut self, language: &str, namespaces: &[&str]) -> Self {
            self.namespaces.insert(
                language.to_string(),
                namespaces.iter().map(|n| n.to_string()).collect(),
            );
            self
        }

        fn with_latency(mut self, latency: Duration) -> Self {
            self.latency = Some(latency);
            self
        }

        fn health_calls(&self) -> usize {
            *self.health_calls.lock()
        }

        fn loads(&self) -> Vec<TranslationKey> {
            self.loads.lock().clone()
        }
    }

    #[async_trait]
    impl TranslationLoader for ScriptedLoader {
        async fn languages(&self) -> Vec<String> {
            self.languages.clone()
        }

        async fn namespaces(&self, language: &str) -> Vec<String> {
            self.namespaces.get(language).cloned().unwrap_or_default()
        }

        async fn load(&self) -> Result<TranslationSet, I18nClientError> {
            Ok(TranslationSet::new())
        }

        async fn load_language_namespace(
            &self,
            language: &str,
            namespace: Option<&str>,
        ) -> Result<TranslationMap, I18nClientError> {
            let key = TranslationKey::from_parts(language, namespace);
            self.loads.lock().push(key.clone());
            self.tables
                .get(&key)
                .cloned()
                .ok_or_else(|| I18nClientError::new(format!("Failed to load {}", key)))
        }

        async fn health_check(&self) -> bool {
            *self.health_calls.lock() += 1;
            if let Some(latency) = self.latency {
                tokio::time::sleep(latency).await;
            }
            self.healthy
        }
    }

    #[derive(Default)]
    struct MemoryCatalog {
        tables: Mutex<HashMap<TranslationKey, TranslationMap>>,
        read_only: Vec<TranslationKey>,
    }

    impl MemoryCatalog {
        fn table(&self, key: &TranslationKey) -> Option<TranslationMap> {
            self.tables.lock().get(key).cloned()
        }
    }

    impl TranslationCatalog for MemoryCatalog {
        fn apply(&self, key: &TranslationKey, translations: TranslationMap) -> Result<(), CatalogError> {
            if self.read_only.contains(key) {
                return Err(CatalogError::Backend(format!("{} is read-only", key)));
            }
            self.tables.lock().insert(key.clone(), translations);
            Ok(())
        }

        fn translate(&self, key: &str, language: &str) -> Result<String, CatalogError> {
            let tables = self.tables.lock();
            let table = tables
                .get(&TranslationKey::language(language))
                .ok_or_else(|| CatalogError::UnknownLanguage(language.to_string()))?;
            match table.get(key) {
                Some(Value::String(text)) => Ok(text.clone()),
                Some(_) => Err(CatalogError::NotAString { key: key.to_string() }),
                None => Err(CatalogError::MissingKey {
                    key: key.to_string(),
                    language: language.to_string(),
                }),
            }
        }
    }

    fn config() -> ClientConfig {
        ClientConfig::new("https://api.example.com", Credential::api_key("test-token"))
            .with_default_language("en")
    }

    fn coordinator(loader: ScriptedLoader) -> (RefreshCoordinator, Arc<ScriptedLoader>, Arc<MemoryCatalog>) {
        let loader = Arc::new(loader);
        let catalog = Arc::new(MemoryCatalog::default());
        let coordinator = RefreshCoordinator::new(config(), loader.clone(), catalog.clone());
        (coordinator, loader, catalog)
    }

    #[tokio::test]
    async fn test_manual_refresh_applies_every_table() {
        let loader = ScriptedLoader::healthy(&["en", "tr"])
            .with_namespaces("en", &["validation"])
            .with_table(TranslationKey::language("en"), json!({ "hello": "Hello" }))
            .with_table(
                TranslationKey::namespaced("en", "validation"),
                json!({ "required": "Required" }),
            )
            .with_table(TranslationKey::language("tr"), json!({ "hello": "Merhaba" }));
        let (coordinator, loader, catalog) = coordinator(loader);

        let outcome = coordinator.manual_refresh().await.unwrap();

        let report = outcome.report().unwrap();
        assert!(report.is_complete());
        assert_eq!(
            report.loaded,
            vec![
                TranslationKey::language("en"),
                TranslationKey::namespaced("en", "validation"),
                TranslationKey::language("tr"),
            ]
        );
        assert_eq!(loader.loads(), report.loaded);
        assert_eq!(
            catalog.table(&TranslationKey::language("tr")).unwrap()["hello"],
            json!("Merhaba")
        );
        assert!(!coordinator.is_refresh_in_progress());
    }

    #[tokio::test]
    async fn test_refresh_is_best_effort() {
        let loader = ScriptedLoader::healthy(&["en", "de", "tr"])
            .with_namespaces("tr", &["common", "validation"])
            .with_table(TranslationKey::language("en"), json!({}))
            .with_table(TranslationKey::language("tr"), json!({}))
            .with_table(TranslationKey::namespaced("tr", "validation"), json!({}));
        let (coordinator, _, catalog) = coordinator(loader);

        let report = coordinator.manual_refresh().await.unwrap();
        let report = report.report().unwrap();

        assert_eq!(
            report.failed,
            vec![
                TranslationKey::language("de"),
                TranslationKey::namespaced("tr", "common"),
            ]
        );
        assert_eq!(report.loaded.len(), 3);
        assert!(catalog
            .table(&TranslationKey::namespaced("tr", "validation"))
            .is_some());
    }

    #[tokio::test]
    async fn test_rejected_table_is_reported_as_failed() {
        let loader = ScriptedLoader::healthy(&["en", "tr"])
            .with_table(TranslationKey::language("en"), json!({ "hello": "Hello" }))
            .with_table(TranslationKey::language("tr"), json!({ "hello": "Merhaba" }));
        let catalog = Arc::new(MemoryCatalog {
            read_only: vec![TranslationKey::language("tr")],
            ..MemoryCatalog::default()
        });
        let coordinator = RefreshCoordinator::new(config(), Arc::new(loader), catalog.clone());

        let outcome = coordinator.manual_refresh().await.unwrap();

        let report = outcome.report().unwrap();
        assert_eq!(report.loaded, vec![TranslationKey::language("en")]);
        assert_eq!(report.failed, vec![TranslationKey::language("tr")]);
        assert!(catalog.table(&TranslationKey::language("tr")).is_none());
        assert_eq!(coordinator.get_translation("hello", Some("tr")), "hello");
    }

    #[tokio::test]
    async fn test_default_language_refreshed_when_not_listed() {
        let loader = ScriptedLoader::healthy(&["tr"])
            .with_table(TranslationKey::language("tr"), json!({}))
            .with_table(TranslationKey::language("en"), json!({ "hello": "Hello" }));
        let (coordinator, loader, _) = coordinator(loader);

        coordinator.manual_refresh().await.unwrap();

        assert_eq!(
            loader.loads(),
            vec![TranslationKey::language("tr"), TranslationKey::language("en")]
        );
        assert_eq!(coordinator.get_translation("hello", None), "Hello");
    }

    #[tokio::test]
    async fn test_default_language_not_refreshed_twice() {
        let loader = ScriptedLoader::healthy(&["en"])
            .with_table(TranslationKey::language("en"), json!({}));
        let (coordinator, loader, _) = coordinator(loader);

        coordinator.manual_refresh().await.unwrap();

        assert_eq!(loader.loads(), vec![TranslationKey::language("en")]);
    }

    #[tokio::test]
    async fn test_unhealthy_api_aborts_refresh() {
        let loader = ScriptedLoader {
            healthy: false,
            languages: vec!["en".to_string()],
            ..ScriptedLoader::default()
        };
        let (coordinator, loader, _) = coordinator(loader);

        let err = coordinator.manual_refresh().await.unwrap_err();

        assert!(matches!(err, RefreshError::Unhealthy));
        assert!(loader.loads().is_empty());
        assert!(!coordinator.is_refresh_in_progress());
    }

    #[tokio::test]
    async fn test_scheduled_refresh_swallows_errors() {
        let (coordinator, loader, _) = coordinator(ScriptedLoader::default());

        coordinator.scheduled_refresh().await;

        assert_eq!(loader.health_calls(), 1);
        assert!(!coordinator.is_refresh_in_progress());
    }

    #[tokio::test(start_paused = true)]
    async fn test_flag_set_only_while_refreshing() {
        let loader = ScriptedLoader::healthy(&[]).with_latency(Duration::from_millis(100));
        let (coordinator, _, _) = coordinator(loader);

        assert!(!coordinator.is_refresh_in_progress());
        let (outcome, during) = tokio::join!(coordinator.manual_refresh(), async {
            coordinator.is_refresh_in_progress()
        });

        assert!(during);
        assert!(matches!(outcome, Ok(RefreshOutcome::Completed(_))));
        assert!(!coordinator.is_refresh_in_progress());
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_refresh_is_skipped() {
        let loader = ScriptedLoader::healthy(&[]).with_latency(Duration::from_millis(100));
        let (coordinator, loader, _) = coordinator(loader);

        let (first, (), second) = tokio::join!(
            coordinator.manual_refresh(),
            coordinator.scheduled_refresh(),
            coordinator.manual_refresh(),
        );

        assert!(matches!(first, Ok(RefreshOutcome::Completed(_))));
        assert!(matches!(second, Ok(RefreshOutcome::Skipped)));
        assert_eq!(loader.health_calls(), 1);
    }

    #[tokio::test]
    async fn test_get_translation_falls_back_to_key() {
        let loader = ScriptedLoader::healthy(&["en"])
            .with_table(TranslationKey::language("en"), json!({ "hello": "Hello", "nested": {} }));
        let (coordinator, _, _) = coordinator(loader);
        coordinator.manual_refresh().await.unwrap();

        assert_eq!(coordinator.get_translation("hello", Some("en")), "Hello");
        assert_eq!(coordinator.get_translation("missing", None), "missing");
        assert_eq!(coordinator.get_translation("nested", None), "nested");
        assert_eq!(coordinator.get_translation("hello", Some("xx")), "hello");
    }

    #[tokio::test]
    async fn test_configuration_is_an_independent_copy() {
        let (coordinator, _, _) = coordinator(ScriptedLoader::default());

        let mut copy = coordinator.configuration();
        assert_eq!(copy, config());

        copy.api_base_url = "https://elsewhere.example.com".to_string();
        assert_eq!(coordinator.configuration(), config());
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_through_http_fetcher() {
        let transport = MockTransport::new();
        transport
            .respond_once("/health", refused())
            .respond("/health", status(200))
            .respond(
                "/translations/language",
                ok_json(json!({ "success": true, "data": { "languages": ["tr"] } })),
            )
            .respond(
                "/translations/tr",
                ok_json(json!({ "translations": { "hello": "Merhaba" }, "namespaces": ["errors"] })),
            )
            .respond("/translations/tr/errors", status(500))
            .respond(
                "/translations/en",
                ok_json(json!({ "success": true, "data": { "hello": "Hello" } })),
            );
        let fetcher = Arc::new(TranslationFetcher::with_connector(
            config(),
            MockConnector::new(transport.clone()),
        ));
        let catalog = Arc::new(MemoryCatalog::default());
        let coordinator = RefreshCoordinator::new(config(), fetcher, catalog);

        let outcome = coordinator.manual_refresh().await.unwrap();

        let report = outcome.report().unwrap();
        assert_eq!(report.failed, vec![TranslationKey::namespaced("tr", "errors")]);
        assert_eq!(coordinator.get_translation("hello", Some("tr")), "Merhaba");
        assert_eq!(coordinator.get_translation("hello", None), "Hello");
        assert_eq!(transport.call_count("/health"), 2);
        assert_eq!(transport.call_count("/translations/tr/errors"), 4);
    }
}
