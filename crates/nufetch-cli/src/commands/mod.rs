//! Command dispatch and handler modules.

mod fetch;
mod resolve;

use miette::Result;
use nufetch_core::config::GlobalConfig;
use nufetch_ops::PackageRequest;

use crate::cli::{Cli, Command, PackageArgs};

/// Route a parsed CLI invocation to the appropriate command handler.
pub async fn dispatch(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => GlobalConfig::load_from(path)?,
        None => GlobalConfig::load()?,
    };
    tracing::debug!("{} configured sources", config.sources.len());

    match cli.command {
        Command::Resolve {
            packages,
            tree,
            depth,
            why,
        } => resolve::exec(&config, request(packages), tree, depth, why).await,
        Command::Fetch {
            packages,
            output,
            force,
            jobs,
        } => fetch::exec(&config, request(packages), output, force, jobs).await,
    }
}

fn request(args: PackageArgs) -> PackageRequest {
    PackageRequest {
        roots: args.packages,
        sources: args.sources,
        framework: args.framework,
    }
}
