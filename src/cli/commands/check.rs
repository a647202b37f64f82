//! check command - Verify bridge and remote-system connectivity

use anyhow::Result;

use crate::cli::Context;
use crate::ui::output;

/// Check connectivity: bridge discovery plus a discovery-document fetch.
pub async fn check(ctx: &Context) -> Result<()> {
    let (locator, client) = super::build_client(ctx);

    let bridge_url = locator.resolve().await.map(|e| e.base_url.clone());
    let status = client.check_connection(bridge_url).await;

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    match (&status.connected, &status.bridge_url) {
        (true, Some(url)) => {
            output::print(format!("bridge:  {}", url), ctx.verbosity);
            output::print("remote:  reachable", ctx.verbosity);
        }
        _ => {
            output::print("remote:  not reachable", ctx.verbosity);
            output::print(format!("detail:  {}", status.detail), ctx.verbosity);
            anyhow::bail!("connectivity check failed");
        }
    }

    Ok(())
}
