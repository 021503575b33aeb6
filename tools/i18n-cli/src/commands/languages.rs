//! Language and namespace listing.

use anyhow::Result;

use super::NamespacesArgs;
use crate::context::Context;

/// Run the languages command.
pub async fn run(ctx: &Context) -> Result<()> {
    let fetcher = ctx.fetcher();

    let spinner = ctx.output.spinner("Fetching languages...");
    let languages = fetcher.list_languages().await;
    spinner.finish_and_clear();

    if ctx.output.is_json() {
        ctx.output.json(&languages);
        return Ok(());
    }

    ctx.output.header("Languages");
    for language in &languages {
        if language == ctx.config.client.default_language() {
            ctx.output.list_item(&format!("{} (default)", language));
        } else {
            ctx.output.list_item(language);
        }
    }

    Ok(())
}

/// Run the namespaces command.
pub async fn run_namespaces(args: NamespacesArgs, ctx: &Context) -> Result<()> {
    let fetcher = ctx.fetcher();

    let spinner = ctx.output.spinner(&format!("Fetching namespaces for {}...", args.language));
    let namespaces = fetcher.list_namespaces(&args.language).await;
    spinner.finish_and_clear();

    if ctx.output.is_json() {
        ctx.output.json(&namespaces);
        return Ok(());
    }

    ctx.output.header(&format!("Namespaces for {}", args.language));
    if namespaces.is_empty() {
        ctx.output.info("No namespaces found.");
    }
    for namespace in &namespaces {
        ctx.output.list_item(namespace);
    }

    Ok(())
}
