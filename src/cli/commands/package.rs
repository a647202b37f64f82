//! package command - Show package metadata and contents

use anyhow::{Context as _, Result};

use crate::cli::Context;
use crate::ui::output;

/// Show a package's metadata and direct contents.
pub async fn package(ctx: &Context, name: &str) -> Result<()> {
    let (_locator, client) = super::build_client(ctx);

    let info = client
        .get_package(name)
        .await
        .with_context(|| format!("Failed to read package {}", name.to_uppercase()))?;

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    output::print(format!("package:     {}", info.name), ctx.verbosity);
    if !info.description.is_empty() {
        output::print(format!("description: {}", info.description), ctx.verbosity);
    }
    output::print(format!("objects:     {}", info.objects.len()), ctx.verbosity);
    for obj in &info.objects {
        output::print(
            format!("  {:<12} {}", obj.object_type, obj.name),
            ctx.verbosity,
        );
    }

    Ok(())
}
