//! Entry point for tack, a terminal assistant with file and shell tools.
//!
//! This binary loads environment variables, installs the tracing subscriber,
//! parses CLI arguments via [`cli`], and dispatches to the chosen subcommand.

use anyhow::Result;
use tack::cli;
use tack::constants::{DEFAULT_LOG_FILTER, LOG_ENV_VAR};
use tracing_subscriber::EnvFilter;

/// Runs the tack CLI.
///
/// Loads `.env` files (silently ignored if absent). Logs go to stderr,
/// filtered by `TACK_LOG` (e.g. `TACK_LOG=tack=debug`).
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::parse();
    cli::run(cli).await
}
