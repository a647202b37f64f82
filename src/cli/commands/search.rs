//! search command - Quick-search the repository

use anyhow::{Context as _, Result};

use crate::cli::Context;
use crate::ui::output;

/// Search the repository and print the hits.
pub async fn search(
    ctx: &Context,
    query: &str,
    max_results: u32,
    object_type: Option<&str>,
    package: Option<&str>,
) -> Result<()> {
    let (_locator, client) = super::build_client(ctx);

    let results = client
        .search(query, max_results, object_type, package)
        .await
        .with_context(|| format!("Search for '{}' failed", query))?;

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.objects.is_empty() {
        output::print(format!("no objects match '{}'", query), ctx.verbosity);
        return Ok(());
    }

    for obj in &results.objects {
        let line = if obj.description.is_empty() {
            format!("{:<12} {:<32} {}", obj.object_type, obj.name, obj.uri)
        } else {
            format!(
                "{:<12} {:<32} {}  ({})",
                obj.object_type, obj.name, obj.uri, obj.description
            )
        };
        output::print(line, ctx.verbosity);
    }
    output::debug(
        format!("{} hit(s) for '{}'", results.objects.len(), query),
        ctx.verbosity,
    );

    Ok(())
}
