//! CLI command implementations.

pub mod config;
pub mod health;
pub mod languages;
pub mod load;
pub mod refresh;
pub mod translate;

use clap::{Args, Subcommand};

/// Arguments for the namespaces command.
#[derive(Args)]
pub struct NamespacesArgs {
    /// Language code.
    pub language: String,
}

/// Arguments for the load command.
#[derive(Args)]
pub struct LoadArgs {
    /// Language code (default: every available language).
    pub language: Option<String>,

    /// Namespace within the language.
    #[arg(requires = "language")]
    pub namespace: Option<String>,
}

/// Arguments for the refresh command.
#[derive(Args)]
pub struct RefreshArgs {
    /// Catalog directory (default: from config).
    #[arg(short, long)]
    pub out: Option<String>,
}

/// Arguments for the watch command.
#[derive(Args)]
pub struct WatchArgs {
    /// Catalog directory (default: from config).
    #[arg(short, long)]
    pub out: Option<String>,

    /// Hours between refreshes (default: from config).
    #[arg(long)]
    pub every_hours: Option<u32>,

    /// Refresh once immediately before waiting for the schedule.
    #[arg(long)]
    pub now: bool,
}

/// Arguments for the translate command.
#[derive(Args)]
pub struct TranslateArgs {
    /// Translation key (dot-separated).
    pub key: String,

    /// Language code (default: configured default language).
    #[arg(short, long)]
    pub lang: Option<String>,

    /// Catalog directory (default: from config).
    #[arg(short, long)]
    pub out: Option<String>,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}
