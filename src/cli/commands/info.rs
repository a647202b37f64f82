//! info command - Show metadata of an object by URI

use anyhow::{Context as _, Result};

use crate::cli::Context;
use crate::ui::output;

/// Show all metadata attributes of an object.
pub async fn info(ctx: &Context, uri: &str) -> Result<()> {
    let (_locator, client) = super::build_client(ctx);

    let info = client
        .object_info(uri)
        .await
        .with_context(|| format!("Failed to read {}", uri))?;

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    output::print(format!("uri: {}", info.uri), ctx.verbosity);
    for (key, value) in &info.attributes {
        output::print(format!("  {:<28} {}", key, value), ctx.verbosity);
    }

    Ok(())
}
