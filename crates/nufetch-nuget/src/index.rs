//! Flat container `index.json` parsing for version discovery.

use nufetch_resolver::NuGetVersion;
use nufetch_util::errors::NufetchError;
use serde::Deserialize;

/// Package-level version listing: `{"versions": ["1.0.0", "1.1.0-beta"]}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VersionIndex {
    #[serde(default)]
    pub versions: Vec<String>,
}

/// Parse an `index.json` document into versions.
///
/// Entries that are not valid versions are skipped with a warning.
pub fn parse_index(id: &str, json: &str) -> miette::Result<Vec<NuGetVersion>> {
    let index: VersionIndex = serde_json::from_str(json).map_err(|e| NufetchError::Metadata {
        message: format!("Failed to parse version index for {id}: {e}"),
    })?;

    let mut versions = Vec::with_capacity(index.versions.len());
    for raw in &index.versions {
        match NuGetVersion::parse(raw) {
            Ok(v) => versions.push(v),
            Err(e) => tracing::warn!("{id}: skipping unparseable version in index: {e}"),
        }
    }
    Ok(versions)
}
