//! Catalog refresh commands.

use anyhow::{bail, Context as _, Result};
use i18n_refresh::{run_schedule, RefreshOutcome, RefreshReport, RefreshSchedule};

use super::{RefreshArgs, WatchArgs};
use crate::context::Context;

/// Run the refresh command.
pub async fn run(args: RefreshArgs, ctx: &Context) -> Result<()> {
    let catalog = ctx.catalog(args.out.as_deref())?;
    let coordinator = ctx.coordinator(catalog.clone());

    ctx.output.header("Refreshing translations");
    ctx.output.kv("API", &ctx.config.client.api_base_url);
    ctx.output.kv("Catalog", &catalog.dir().display().to_string());

    let spinner = ctx.output.spinner("Refreshing...");
    let result = coordinator.manual_refresh().await;
    spinner.finish_and_clear();

    match result.context("Refresh failed")? {
        RefreshOutcome::Completed(report) => print_report(&report, ctx),
        RefreshOutcome::Skipped => {
            ctx.output.warn("A refresh is already in progress");
            Ok(())
        }
    }
}

/// Run the watch command.
pub async fn run_watch(args: WatchArgs, ctx: &Context) -> Result<()> {
    let catalog = ctx.catalog(args.out.as_deref())?;
    let coordinator = ctx.coordinator(catalog.clone());
    let schedule = match args.every_hours {
        Some(hours) => RefreshSchedule::every_hours(hours),
        None => ctx.config.refresh_schedule(),
    };

    ctx.output.header("Watching translations");
    ctx.output.kv("Catalog", &catalog.dir().display().to_string());
    ctx.output.kv("Every", &format!("{}h (UTC)", schedule.interval_hours()));

    if args.now {
        match coordinator.manual_refresh().await {
            Ok(RefreshOutcome::Completed(report)) => print_report(&report, ctx)?,
            Ok(RefreshOutcome::Skipped) => {}
            Err(e) => ctx.output.warn(&format!("Initial refresh failed: {}", e)),
        }
    }

    let next = schedule.next_after(chrono::Utc::now());
    ctx.output.info(&format!(
        "Next refresh at {}. Press Ctrl-C to stop.",
        next.format("%Y-%m-%d %H:%M UTC")
    ));

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };
    run_schedule(&coordinator, schedule, shutdown).await;

    ctx.output.success("Stopped");
    Ok(())
}

fn print_report(report: &RefreshReport, ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        let loaded: Vec<String> = report.loaded.iter().map(ToString::to_string).collect();
        let failed: Vec<String> = report.failed.iter().map(ToString::to_string).collect();
        ctx.output.json(&serde_json::json!({ "loaded": loaded, "failed": failed }));
    } else {
        for key in &report.loaded {
            ctx.output.success(&format!("Loaded {}", key));
        }
        for key in &report.failed {
            ctx.output.warn(&format!("Failed {}", key));
        }
        ctx.output.info(&format!("Refresh complete: {}", report));
    }

    if report.loaded.is_empty() && !report.failed.is_empty() {
        bail!("No translations could be loaded");
    }

    Ok(())
}
