//! class / program / function commands - Create-or-update handlers

use anyhow::{Context as _, Result};

use crate::adt::{ObjectDescriptor, UpsertOutcome};
use crate::cli::args::UpsertArgs;
use crate::cli::Context;
use crate::ui::output;

/// Create or update a class.
pub async fn class(ctx: &Context, name: &str, args: &UpsertArgs) -> Result<()> {
    let desc = descriptor(name, args)?;
    let (_locator, client) = super::build_client(ctx);

    let outcome = client
        .create_or_update_class(&desc)
        .await
        .with_context(|| format!("Failed to create or update class {}", name.to_uppercase()))?;
    report(ctx, "class", &outcome)
}

/// Create or update a program.
pub async fn program(ctx: &Context, name: &str, args: &UpsertArgs) -> Result<()> {
    let desc = descriptor(name, args)?;
    let (_locator, client) = super::build_client(ctx);

    let outcome = client
        .create_or_update_program(&desc)
        .await
        .with_context(|| format!("Failed to create or update program {}", name.to_uppercase()))?;
    report(ctx, "program", &outcome)
}

/// Create or update a function module, ensuring its group first.
pub async fn function(
    ctx: &Context,
    name: &str,
    group: Option<&str>,
    args: &UpsertArgs,
) -> Result<()> {
    let desc = descriptor(name, args)?;
    let (_locator, client) = super::build_client(ctx);

    let outcome = client
        .create_or_update_function_module(&desc, group)
        .await
        .with_context(|| {
            format!(
                "Failed to create or update function module {}",
                name.to_uppercase()
            )
        })?;
    report(ctx, "function module", &outcome)
}

/// Build the object descriptor, reading source from a file when asked.
fn descriptor(name: &str, args: &UpsertArgs) -> Result<ObjectDescriptor> {
    let source = match (&args.file, &args.source) {
        (Some(path), _) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read source file '{}'", path.display()))?,
        ),
        (None, Some(text)) => Some(text.clone()),
        (None, None) => None,
    };

    Ok(ObjectDescriptor {
        name: name.to_string(),
        description: args.description.clone(),
        package: args.package.clone(),
        transport: args.transport.clone(),
        source,
    })
}

/// Report an upsert outcome, human or JSON.
fn report(ctx: &Context, noun: &str, outcome: &UpsertOutcome) -> Result<()> {
    if ctx.json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
        return Ok(());
    }

    let mut line = format!("{} {} {}", noun, outcome.name, outcome.action);
    if let Some(group) = &outcome.group {
        line.push_str(&format!(" (group {})", group));
    }
    if outcome.source_written {
        line.push_str(", source written and activated");
    }
    output::print(line, ctx.verbosity);
    output::debug(
        format!(
            "package {}, transport {}",
            outcome.package,
            outcome.transport.as_deref().unwrap_or("none")
        ),
        ctx.verbosity,
    );

    Ok(())
}
