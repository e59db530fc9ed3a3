//! The package metadata contract consumed by the resolver.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use async_trait::async_trait;
use nufetch_util::errors::NufetchError;

use crate::package::{id_key, DependencyDecl};
use crate::version::NuGetVersion;

/// Source of package versions and declared dependencies.
///
/// Both operations may fail on network or registry errors; the resolver treats
/// any failure as fatal and never retries.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// All published versions of `id`. Empty means the package does not exist.
    async fn list_versions(&self, id: &str) -> miette::Result<Vec<NuGetVersion>>;

    /// Dependencies declared by one version of a package.
    async fn list_dependencies(
        &self,
        id: &str,
        version: &NuGetVersion,
    ) -> miette::Result<Vec<DependencyDecl>>;
}

#[async_trait]
impl<P> MetadataProvider for &P
where
    P: MetadataProvider + ?Sized,
{
    async fn list_versions(&self, id: &str) -> miette::Result<Vec<NuGetVersion>> {
        (**self).list_versions(id).await
    }

    async fn list_dependencies(
        &self,
        id: &str,
        version: &NuGetVersion,
    ) -> miette::Result<Vec<DependencyDecl>> {
        (**self).list_dependencies(id, version).await
    }
}

/// An in-memory provider, for tests and fixed fixtures.
#[derive(Debug, Default, Clone)]
pub struct OfflineProvider {
    versions: BTreeMap<String, BTreeSet<NuGetVersion>>,
    dependencies: HashMap<(String, NuGetVersion), Vec<DependencyDecl>>,
}

impl OfflineProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a package version and the dependencies it declares.
    pub fn add_dependencies<I>(&mut self, id: &str, version: NuGetVersion, dependencies: I)
    where
        I: IntoIterator<Item = DependencyDecl>,
    {
        let key = id_key(id);
        self.versions
            .entry(key.clone())
            .or_default()
            .insert(version.clone());
        self.dependencies
            .insert((key, version), dependencies.into_iter().collect());
    }

    /// Register a package version without dependencies.
    pub fn add_version(&mut self, id: &str, version: NuGetVersion) {
        self.add_dependencies(id, version, Vec::new());
    }
}

#[async_trait]
impl MetadataProvider for OfflineProvider {
    async fn list_versions(&self, id: &str) -> miette::Result<Vec<NuGetVersion>> {
        Ok(self
            .versions
            .get(&id_key(id))
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn list_dependencies(
        &self,
        id: &str,
        version: &NuGetVersion,
    ) -> miette::Result<Vec<DependencyDecl>> {
        self.dependencies
            .get(&(id_key(id), version.clone()))
            .cloned()
            .ok_or_else(|| {
                NufetchError::Metadata {
                    message: format!("no metadata for {id} {version}"),
                }
                .into()
            })
    }
}
