//! Operation: resolve root packages and print the result.

use std::fmt::Write as _;

use nufetch_core::config::GlobalConfig;
use nufetch_resolver::Resolution;
use nufetch_util::progress::status;

use crate::{build_provider, resolve_request, PackageRequest};

/// Options for `nufetch resolve`.
#[derive(Debug, Default)]
pub struct ResolveOptions {
    /// Print the dependency tree instead of the flat package list.
    pub tree: bool,
    /// Maximum tree depth to display.
    pub depth: Option<usize>,
    /// Show how a package is reached from the roots.
    pub why: Option<String>,
}

/// Resolve `request` and print packages, a tree, or a path to stdout.
pub async fn resolve(
    config: &GlobalConfig,
    request: &PackageRequest,
    opts: &ResolveOptions,
) -> miette::Result<()> {
    let provider = build_provider(config, request)?;
    let resolution = resolve_request(&provider, request).await?;
    print!("{}", render(&resolution, opts));
    status("Resolved", &format!("{} packages", resolution.resolved().len()));
    Ok(())
}

/// Text printed for a resolution under `opts`.
pub fn render(resolution: &Resolution, opts: &ResolveOptions) -> String {
    let mut out = String::new();

    if let Some(target) = &opts.why {
        let graph = resolution.graph();
        match graph.find_path(target) {
            Some(path) => {
                let _ = writeln!(out, "Path to {target}:");
                for (i, node) in path.iter().enumerate() {
                    let _ = writeln!(out, "{}{node}", "  ".repeat(i));
                }
            }
            None => {
                let _ = writeln!(out, "Package '{target}' is not in the resolved set.");
            }
        }
        return out;
    }

    if opts.tree {
        return resolution.graph().print_tree(opts.depth);
    }

    for package in resolution.packages() {
        let _ = writeln!(out, "{} {}", package.id, package.version);
    }
    out
}
