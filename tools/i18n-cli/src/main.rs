//! i18n CLI - Command line tool for the translation-data client.
//!
//! Commands:
//! - `i18n health` - Probe the translation API
//! - `i18n languages` - List available languages
//! - `i18n namespaces` - List namespaces for a language
//! - `i18n load` - Fetch translation tables as JSON
//! - `i18n refresh` - Refresh the local catalog once
//! - `i18n watch` - Refresh the local catalog on a schedule
//! - `i18n translate` - Look up a key in the local catalog
//! - `i18n config` - Manage configuration

mod catalog;
mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ConfigArgs, LoadArgs, NamespacesArgs, RefreshArgs, TranslateArgs, WatchArgs};

/// i18n CLI - Fetch and refresh translations from a remote API
#[derive(Parser)]
#[command(name = "i18n")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the translation API is healthy
    Health,

    /// List available languages
    Languages,

    /// List namespaces for a language
    Namespaces(NamespacesArgs),

    /// Fetch translations and print them as JSON
    Load(LoadArgs),

    /// Refresh the local catalog once
    Refresh(RefreshArgs),

    /// Refresh the local catalog on a schedule until interrupted
    Watch(WatchArgs),

    /// Translate a key from the local catalog
    Translate(TranslateArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let output = output::Output::new(cli.verbose, cli.json);

    let config_path = cli.config.as_deref();
    let ctx = context::Context::load(config_path, output)?;

    let result = match cli.command {
        Commands::Health => commands::health::run(&ctx).await,
        Commands::Languages => commands::languages::run(&ctx).await,
        Commands::Namespaces(args) => commands::languages::run_namespaces(args, &ctx).await,
        Commands::Load(args) => commands::load::run(args, &ctx).await,
        Commands::Refresh(args) => commands::refresh::run(args, &ctx).await,
        Commands::Watch(args) => commands::refresh::run_watch(args, &ctx).await,
        Commands::Translate(args) => commands::translate::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
