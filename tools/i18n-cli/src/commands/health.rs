//! API health probe.

use anyhow::{bail, Result};

use crate::context::Context;
use crate::output::health_badge;

/// Run the health command.
pub async fn run(ctx: &Context) -> Result<()> {
    let fetcher = ctx.fetcher();

    let spinner = ctx.output.spinner("Checking translation API...");
    let healthy = fetcher.health_check().await;
    spinner.finish_and_clear();

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "api_base_url": ctx.config.client.api_base_url,
            "healthy": healthy,
        }));
    } else {
        ctx.output.kv("API", &ctx.config.client.api_base_url);
        ctx.output.kv("Status", &health_badge(healthy));
    }

    if !healthy {
        bail!("Translation API is unhealthy");
    }

    Ok(())
}
