//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Validates command-specific arguments
//! 2. Drives the [`crate::adt::AdtClient`] over the bridge transport
//! 3. Formats and displays output (human or `--json`)
//!
//! # Async Commands
//!
//! Every command that talks to the repository is async because the
//! transport is. Dispatch owns a tokio runtime and blocks on the
//! handler; `config` and `completion` are purely local and run sync.

mod check;
mod completion;
mod config_cmd;
mod info;
mod package;
mod search;
mod source;
mod upsert_cmd;

// Re-export command functions for testing and direct invocation
pub use check::check;
pub use completion::completion;
pub use config_cmd::{get as config_get, list as config_list, set as config_set};
pub use info::info;
pub use package::package;
pub use search::search;
pub use source::source;
pub use upsert_cmd::{class, function, program};

use std::sync::Arc;

use anyhow::{Context as _, Result};

use crate::adt::AdtClient;
use crate::bridge::{BridgeLocator, HttpBridge};
use crate::cli::args::{Command, ConfigAction};
use crate::cli::Context;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        // Local commands need no runtime and no bridge.
        Command::Config { action } => match action {
            ConfigAction::Get { key } => config_cmd::get(ctx, &key),
            ConfigAction::Set { key, value } => config_cmd::set(ctx, &key, &value),
            ConfigAction::List => config_cmd::list(ctx),
        },
        Command::Completion { shell } => completion::completion(shell),

        network_command => {
            let rt = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .context("Failed to start async runtime")?;

            rt.block_on(async {
                match network_command {
                    Command::Check => check::check(ctx).await,
                    Command::Search {
                        query,
                        max_results,
                        object_type,
                        package,
                    } => {
                        search::search(
                            ctx,
                            &query,
                            max_results,
                            object_type.as_deref(),
                            package.as_deref(),
                        )
                        .await
                    }
                    Command::Source { kind, name, group } => {
                        source::source(ctx, &kind, &name, group.as_deref()).await
                    }
                    Command::Package { name } => package::package(ctx, &name).await,
                    Command::Info { uri } => info::info(ctx, &uri).await,
                    Command::Class { name, upsert } => {
                        upsert_cmd::class(ctx, &name, &upsert).await
                    }
                    Command::Program { name, upsert } => {
                        upsert_cmd::program(ctx, &name, &upsert).await
                    }
                    Command::Function {
                        name,
                        group,
                        upsert,
                    } => upsert_cmd::function(ctx, &name, group.as_deref(), &upsert).await,
                    // Handled in the outer match.
                    Command::Config { .. } | Command::Completion { .. } => unreachable!(),
                }
            })
        }
    }
}

/// Build the locator and client a network-facing handler needs.
pub(crate) fn build_client(ctx: &Context) -> (Arc<BridgeLocator>, AdtClient) {
    let locator = Arc::new(BridgeLocator::new(ctx.config.bridge_url()));
    let bridge = Arc::new(HttpBridge::new(locator.clone()));
    let client = AdtClient::from_config(bridge, &ctx.config);
    (locator, client)
}
