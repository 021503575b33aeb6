//! Configuration management commands.

use std::fs;

use anyhow::{Context as _, Result};
use dialoguer::Confirm;
use i18n_core::{ClientConfig, Credential};

use super::{ConfigArgs, ConfigCommand};
use crate::config::generate_default_config;
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx).await,
        ConfigCommand::Init { force } => init_config(force, ctx).await,
    }
}

async fn show_config(ctx: &Context) -> Result<()> {
    let mut config = ctx.config.clone();
    config.client = redacted(&config.client);

    if ctx.output.is_json() {
        ctx.output.json(&config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("source", &path.display().to_string()),
        None => ctx.output.kv("source", "defaults + environment"),
    }

    let client = &config.client;
    ctx.output.info("");
    ctx.output.info("[client]");
    ctx.output.kv("api_base_url", &client.api_base_url);
    ctx.output.kv("credential", &format!("{} {}", client.credential.kind(), client.credential.secret()));
    ctx.output.kv("default_language", client.default_language());

    let retry = i18n_fetch::RetryPolicy::from_settings(&client.retry);
    ctx.output.info("");
    ctx.output.info("[client.retry]");
    ctx.output.kv("max_retries", &retry.max_retries.to_string());
    ctx.output.kv("base_delay_ms", &retry.base_delay.as_millis().to_string());
    ctx.output.kv("max_delay_ms", &retry.max_delay.as_millis().to_string());
    ctx.output.kv("backoff_multiplier", &retry.backoff_multiplier.to_string());

    ctx.output.info("");
    ctx.output.info("[catalog]");
    ctx.output.kv("dir", &config.catalog.dir);

    ctx.output.info("");
    ctx.output.info("[schedule]");
    ctx.output.kv("every_hours", &config.refresh_schedule().interval_hours().to_string());

    if let Err(e) = ctx.config.client.validate() {
        ctx.output.warn(&e.to_string());
    }

    Ok(())
}

async fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join("i18n.toml");

    if config_path.exists() && !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("{} already exists. Overwrite?", config_path.display()))
            .default(false)
            .interact()?;

        if !confirmed {
            ctx.output.warn("Cancelled");
            return Ok(());
        }
    }

    fs::write(&config_path, generate_default_config())
        .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

    ctx.output.success(&format!("Created: {}", config_path.display()));
    ctx.output.info("Set client.credential.value or I18N_API_KEY before running commands.");

    Ok(())
}

fn redacted(client: &ClientConfig) -> ClientConfig {
    let mut client = client.clone();
    if !client.credential.is_empty() {
        client.credential = match client.credential {
            Credential::Bearer(_) => Credential::bearer("<redacted>"),
            Credential::ApiKey(_) => Credential::api_key("<redacted>"),
        };
    }
    client
}
