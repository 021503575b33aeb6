//! CLI configuration.

use std::path::Path;

use anyhow::{Context, Result};
use i18n_core::ClientConfig;
use i18n_refresh::RefreshSchedule;
use serde::{Deserialize, Serialize};

/// File names searched for, in order, from the working directory upward.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["i18n.toml", ".i18n.toml", "i18n.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Translation API client settings.
    #[serde(default)]
    pub client: ClientConfig,

    /// Local catalog settings.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Refresh schedule settings.
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

impl CliConfig {
    /// Load config from a file. `.json` files are JSON, anything else TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Apply `I18N_*` environment variable overrides.
    pub fn with_env_overrides(mut self) -> Self {
        self.client.apply_env_overrides();
        self
    }

    /// Refresh schedule described by this config.
    pub fn refresh_schedule(&self) -> RefreshSchedule {
        RefreshSchedule::every_hours(self.schedule.every_hours)
    }
}

/// Local catalog settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Directory holding `<language>.json` and `<language>.<namespace>.json`.
    #[serde(default = "default_catalog_dir")]
    pub dir: String,
}

fn default_catalog_dir() -> String {
    "translations".to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            dir: default_catalog_dir(),
        }
    }
}

/// Refresh schedule settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Hours between scheduled refreshes (UTC, on the hour).
    #[serde(default = "default_every_hours")]
    pub every_hours: u32,
}

fn default_every_hours() -> u32 {
    RefreshSchedule::default().interval_hours()
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            every_hours: default_every_hours(),
        }
    }
}

/// Generate a default i18n.toml config file.
pub fn generate_default_config() -> String {
    r#"# Translation client configuration
#
# Environment variables override these values:
#   I18N_API_URL, I18N_API_KEY, I18N_BEARER_TOKEN, I18N_DEFAULT_LANGUAGE,
#   I18N_MAX_RETRIES, I18N_BASE_DELAY_MS, I18N_MAX_DELAY_MS

[client]
api_base_url = "https://i18n.example.com/api"
default_language = "en"

[client.credential]
# "api_key" is sent as x-api-key, "bearer" as Authorization: Bearer
kind = "api_key"
value = ""

[client.retry]
max_retries = 3
base_delay_ms = 1000
max_delay_ms = 10000
backoff_multiplier = 2.0

[catalog]
dir = "translations"

[schedule]
every_hours = 3
"#
    .to_string()
}
