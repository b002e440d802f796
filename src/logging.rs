// ABOUTME: Tracing subscriber setup for the mdimg binary
// ABOUTME: Logs to stdout, filtered by RUST_LOG or the --verbose flag

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber. `RUST_LOG` overrides `verbose`.
pub fn init_tracing(verbose: bool) -> Result<()> {
    let default_directive = if verbose { "mdimg=debug" } else { "mdimg=info" };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
