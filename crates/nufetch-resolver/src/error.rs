use miette::Diagnostic;
use thiserror::Error;

use crate::conflict::ConflictReport;
use crate::version::{NuGetVersion, VersionRange};

/// Fatal resolution failures. Any of these aborts the whole run.
#[derive(Debug, Error, Diagnostic)]
pub enum ResolveError {
    /// A root or transitive package has no listed versions.
    #[error("No versions of `{id}` were found in any package source")]
    #[diagnostic(
        code(nufetch::resolve::registry_empty),
        help("Check the package id and the configured sources")
    )]
    RegistryEmpty { id: String },

    /// A requested version string could not be parsed.
    #[error("`{constraint}` is not a valid version for `{id}`: {reason}")]
    #[diagnostic(code(nufetch::resolve::invalid_pin))]
    InvalidPin {
        id: String,
        constraint: String,
        reason: String,
    },

    /// A requested version parses but is not published.
    #[error(
        "Version {version} of `{id}` was not found; available versions: {}",
        join_versions(.available)
    )]
    #[diagnostic(code(nufetch::resolve::pin_not_found))]
    PinNotFound {
        id: String,
        version: NuGetVersion,
        available: Vec<NuGetVersion>,
    },

    /// A declared dependency range matches none of the dependency's versions.
    #[error(
        "No version of `{dependency}` satisfies {range} required by {parent} {parent_version}; available versions: {}",
        join_versions(.available)
    )]
    #[diagnostic(code(nufetch::resolve::no_range_match))]
    NoRangeMatch {
        dependency: String,
        range: VersionRange,
        parent: String,
        parent_version: NuGetVersion,
        available: Vec<NuGetVersion>,
    },

    /// Reconciliation found package ids with no version satisfying every requirement.
    #[error("{report}")]
    #[diagnostic(
        code(nufetch::resolve::version_conflict),
        help("Pin a compatible version of the listed packages, or drop the conflicting root")
    )]
    VersionConflict { report: ConflictReport },
}

fn join_versions(versions: &[NuGetVersion]) -> String {
    if versions.is_empty() {
        return "none".to_string();
    }
    versions
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
