//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use i18n_fetch::TranslationFetcher;
use i18n_refresh::RefreshCoordinator;

use crate::catalog::FileCatalog;
use crate::config::{CliConfig, CONFIG_FILE_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// Effective configuration, environment overrides applied.
    pub config: CliConfig,
    /// Config file the configuration was read from, if any.
    pub config_path: Option<PathBuf>,
    pub output: Output,
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file and environment.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = if let Some(path) = config_path {
            (CliConfig::load(Path::new(path))?, Some(PathBuf::from(path)))
        } else {
            match Self::find_config(&cwd) {
                Some((config, path)) => (config, Some(path)),
                None => (CliConfig::default(), None),
            }
        };

        Ok(Self {
            config: config.with_env_overrides(),
            config_path,
            output,
            cwd,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<(CliConfig, PathBuf)> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_FILE_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    match CliConfig::load(&config_path) {
                        Ok(config) => return Some((config, config_path)),
                        Err(e) => tracing::warn!(path = %config_path.display(), error = %e, "Ignoring unreadable config file"),
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Build an HTTP fetcher from the effective configuration.
    pub fn fetcher(&self) -> Arc<TranslationFetcher> {
        Arc::new(TranslationFetcher::new(self.config.client.clone()))
    }

    /// Catalog directory: `dir` if given, otherwise the configured one.
    pub fn catalog_dir(&self, dir: Option<&str>) -> PathBuf {
        self.resolve_path(dir.unwrap_or(&self.config.catalog.dir))
    }

    /// Open the file catalog in the chosen directory.
    pub fn catalog(&self, dir: Option<&str>) -> Result<Arc<FileCatalog>> {
        let dir = self.catalog_dir(dir);
        let catalog = FileCatalog::open(&dir)
            .with_context(|| format!("Failed to open catalog: {}", dir.display()))?;
        Ok(Arc::new(catalog))
    }

    /// Wire a refresh coordinator writing into `catalog`.
    pub fn coordinator(&self, catalog: Arc<FileCatalog>) -> RefreshCoordinator {
        RefreshCoordinator::new(self.config.client.clone(), self.fetcher(), catalog)
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if Path::new(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }
}
