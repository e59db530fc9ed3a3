pub mod ops_fetch;
pub mod ops_resolve;

use nufetch_core::config::GlobalConfig;
use nufetch_core::dependency::RootSpec;
use nufetch_nuget::provider::NuGetProvider;
use nufetch_nuget::repository::PackageSource;
use nufetch_resolver::{Resolution, Resolver};
use nufetch_util::errors::NufetchError;

/// What to resolve and where to look, as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct PackageRequest {
    /// Root packages as `id` or `id:version`.
    pub roots: Vec<String>,
    /// Source names from the config, URLs, or local directories. Empty means
    /// the configured sources.
    pub sources: Vec<String>,
    /// Target framework override for nuspec dependency groups.
    pub framework: Option<String>,
}

/// Parse root arguments, rejecting an empty list.
pub fn parse_roots(args: &[String]) -> miette::Result<Vec<RootSpec>> {
    if args.is_empty() {
        return Err(NufetchError::Input {
            message: "no packages given".to_string(),
        }
        .into());
    }
    args.iter()
        .map(|arg| RootSpec::parse(arg).map_err(miette::Report::from))
        .collect()
}

/// Sources to consult: the `--source` values if any, else the config.
///
/// A `--source` value naming a configured source uses that entry, credentials
/// included.
pub fn package_sources(config: &GlobalConfig, requested: &[String]) -> Vec<PackageSource> {
    if requested.is_empty() {
        return config
            .effective_sources()
            .iter()
            .map(|(name, entry)| PackageSource::from_entry(name, entry))
            .collect();
    }
    requested
        .iter()
        .map(|value| match config.sources.get(value) {
            Some(entry) => PackageSource::from_entry(value, entry),
            None => PackageSource::from_url(value, value),
        })
        .collect()
}

/// Build a provider for `request`, with command-line values taking precedence.
pub fn build_provider(config: &GlobalConfig, request: &PackageRequest) -> miette::Result<NuGetProvider> {
    let sources = package_sources(config, &request.sources);
    for source in &sources {
        let auth = if source.has_auth() { ", authenticated" } else { "" };
        tracing::debug!("source {source}{auth}");
    }
    let framework = request
        .framework
        .clone()
        .or_else(|| config.resolve.target_framework.clone());
    let provider = NuGetProvider::new(sources, framework)?;
    if let Some(framework) = provider.target_framework() {
        tracing::debug!("using dependency groups for {framework}");
    }
    Ok(provider)
}

/// Resolve the request's roots with a spinner on stderr.
pub async fn resolve_request(
    provider: &NuGetProvider,
    request: &PackageRequest,
) -> miette::Result<Resolution> {
    let roots = parse_roots(&request.roots)?;
    let sp = nufetch_util::progress::spinner("Resolving packages...");
    let result = Resolver::new(provider).resolve(&roots).await;
    sp.finish_and_clear();
    result
}
