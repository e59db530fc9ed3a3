//! CLI argument definitions for nufetch.
//!
//! Uses `clap` derive macros to define the command surface. Each command
//! corresponds to a handler in the [`super::commands`] module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "nufetch",
    version,
    about = "Resolve NuGet packages and download their artifacts",
    long_about = "nufetch resolves a set of NuGet packages, each optionally pinned to a version, \
                  to one consistent version per package across the whole dependency graph, \
                  and downloads every resolved package as a .nupkg file."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Use this config file instead of ~/.nufetch/config.toml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Packages to resolve and where to find them.
#[derive(Args, Debug)]
pub struct PackageArgs {
    /// Packages as `id` or `id:version`
    #[arg(required = true, value_name = "PACKAGE")]
    pub packages: Vec<String>,

    /// Package source: a configured source name, flat container URL, or local directory (repeatable)
    #[arg(short, long = "source", value_name = "SOURCE")]
    pub sources: Vec<String>,

    /// Only follow dependencies declared for this target framework (e.g. net8.0)
    #[arg(short, long, value_name = "TFM")]
    pub framework: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve packages and print one version per package
    Resolve {
        #[command(flatten)]
        packages: PackageArgs,
        /// Print the dependency tree
        #[arg(long)]
        tree: bool,
        /// Maximum tree depth
        #[arg(long, requires = "tree")]
        depth: Option<usize>,
        /// Show how a package is reached from the requested packages
        #[arg(long, value_name = "PACKAGE", conflicts_with = "tree")]
        why: Option<String>,
    },

    /// Resolve packages and download every resolved .nupkg
    Fetch {
        #[command(flatten)]
        packages: PackageArgs,
        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
        /// Re-download packages that already exist in the output directory
        #[arg(long)]
        force: bool,
        /// Number of concurrent downloads
        #[arg(short, long)]
        jobs: Option<usize>,
    },
}

pub fn parse() -> Cli {
    Cli::parse()
}
