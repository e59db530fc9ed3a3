//! nufetch CLI binary.
//!
//! Initializes logging via `tracing`, parses arguments with `clap`, loads the
//! global configuration, and dispatches to the command handlers.

mod cli;
mod commands;

use miette::Result;
use tracing_subscriber::EnvFilter;

/// Log filter used with `--verbose` when `RUST_LOG` is not set.
const VERBOSE_FILTER: &str = "warn,nufetch_resolver=debug,nufetch_nuget=debug,nufetch_ops=debug";

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::parse();

    let default_filter = if args.verbose { VERBOSE_FILTER } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    commands::dispatch(args).await
}
