//! source command - Read an object's main source

use anyhow::{Context as _, Result};

use crate::adt::ObjectKind;
use crate::cli::Context;

/// Print the main source (or table definition) of an object to stdout.
pub async fn source(ctx: &Context, kind: &str, name: &str, group: Option<&str>) -> Result<()> {
    let kind: ObjectKind = kind.parse()?;
    let (_locator, client) = super::build_client(ctx);

    let body = client
        .read_source(kind, name, group)
        .await
        .with_context(|| format!("Failed to read {} {}", kind, name.to_uppercase()))?;

    // Source goes to stdout verbatim so it can be piped into a file.
    println!("{}", body);
    Ok(())
}
