//! Translation lookup against the local catalog.

use anyhow::Result;

use super::TranslateArgs;
use crate::context::Context;

/// Run the translate command.
///
/// Missing translations print the key itself.
pub async fn run(args: TranslateArgs, ctx: &Context) -> Result<()> {
    let catalog = ctx.catalog(args.out.as_deref())?;
    if catalog.keys().is_empty() {
        ctx.output.warn(&format!(
            "No translations in {}. Run `i18n refresh` first.",
            catalog.dir().display()
        ));
    }
    let coordinator = ctx.coordinator(catalog);
    let language = args
        .lang
        .as_deref()
        .unwrap_or_else(|| ctx.config.client.default_language());

    let text = coordinator.get_translation(&args.key, Some(language));
    if text == args.key {
        ctx.output.debug(&format!("No translation for '{}' in {}", args.key, language));
    }

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "key": args.key,
            "language": language,
            "text": text,
        }));
    } else {
        println!("{}", text);
    }

    Ok(())
}
