//! cli
//!
//! Command-line interface layer for abaplink.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Delegate to command handlers
//! - Does NOT talk the repository protocol directly
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap and dispatches to
//! handlers that drive [`crate::adt::AdtClient`] over the bridge
//! transport. Handlers are async; dispatch owns the tokio runtime.

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use anyhow::{Context as _, Result};

use crate::core::config::Config;
use crate::ui::output::Verbosity;

/// Shared handler context built from global flags and configuration.
#[derive(Debug)]
pub struct Context {
    /// Loaded configuration (defaults when no file was found).
    pub config: Config,
    /// Output verbosity from `--quiet`/`--debug`.
    pub verbosity: Verbosity,
    /// Machine-readable output requested.
    pub json: bool,
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let config = Config::load().context("Failed to load configuration")?;
    let ctx = Context {
        config,
        verbosity: Verbosity::from_flags(cli.quiet, cli.debug),
        json: cli.json,
    };

    commands::dispatch(cli.command, &ctx)
}
