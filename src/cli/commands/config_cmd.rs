//! config command - Get, set, or list configuration values

use anyhow::{Context as _, Result};

use crate::cli::Context;
use crate::core::config::Config;
use crate::ui::output;

/// Get a configuration value.
pub fn get(ctx: &Context, key: &str) -> Result<()> {
    let value = Config::get_key(&ctx.config.file, key)
        .with_context(|| format!("Failed to read config key '{}'", key))?;

    // Key exists but has no value: exit silently.
    if let Some(value) = value {
        println!("{}", value);
    }
    Ok(())
}

/// Set a configuration value in the canonical config file.
pub fn set(ctx: &Context, key: &str, value: &str) -> Result<()> {
    let mut file = ctx.config.file.clone();
    Config::set_key(&mut file, key, value)
        .with_context(|| format!("Failed to set config key '{}'", key))?;

    let path = Config::write(&file).context("Failed to write config file")?;
    output::print(
        format!("{} = {} ({})", key, value, path.display()),
        ctx.verbosity,
    );
    Ok(())
}

/// List all configuration values.
pub fn list(ctx: &Context) -> Result<()> {
    for key in Config::known_keys() {
        let value = Config::get_key(&ctx.config.file, key)
            .with_context(|| format!("Failed to read config key '{}'", key))?;
        match value {
            Some(v) => output::print(format!("{} = {}", key, v), ctx.verbosity),
            None => output::print(format!("{} = (default)", key), ctx.verbosity),
        }
    }
    if let Some(path) = ctx.config.loaded_from() {
        output::debug(format!("loaded from {}", path.display()), ctx.verbosity);
    }
    Ok(())
}
