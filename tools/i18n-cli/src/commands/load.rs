//! Fetch translation tables and print them.

use anyhow::{Context as _, Result};

use super::LoadArgs;
use crate::context::Context;

/// Run the load command. Always prints JSON.
pub async fn run(args: LoadArgs, ctx: &Context) -> Result<()> {
    let fetcher = ctx.fetcher();

    match args.language {
        Some(language) => {
            let namespace = args.namespace.as_deref();
            let spinner = ctx.output.spinner("Loading translations...");
            let result = fetcher.load_language_namespace(&language, namespace).await;
            spinner.finish_and_clear();

            let table = result.context("Could not load translations")?;
            ctx.output.debug(&format!("{} entries", table.len()));
            ctx.output.json(&table);
        }
        None => {
            let spinner = ctx.output.spinner("Loading all languages...");
            let result = fetcher.load_all().await;
            spinner.finish_and_clear();

            let set = result.context("Could not load translations")?;
            for (language, table) in &set {
                if table.is_empty() {
                    ctx.output.warn(&format!("No translations loaded for {}", language));
                }
            }
            ctx.output.json(&set);
        }
    }

    Ok(())
}
