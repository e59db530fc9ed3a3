//! Package identities, declared dependencies, and the final resolved set.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::version::{NuGetVersion, VersionRange};

/// Case-insensitive lookup key for a package id.
pub fn id_key(id: &str) -> String {
    id.to_ascii_lowercase()
}

/// A fully resolved, concrete package reference.
///
/// Ids compare case-insensitively, the way the registry treats them.
#[derive(Debug, Clone)]
pub struct PackageIdentity {
    pub id: String,
    pub version: NuGetVersion,
}

impl PackageIdentity {
    pub fn new(id: impl Into<String>, version: NuGetVersion) -> Self {
        Self {
            id: id.into(),
            version,
        }
    }

    /// Lowercase id, used for grouping and map keys.
    pub fn key(&self) -> String {
        id_key(&self.id)
    }

    /// File name of the package artifact: `{id}.{version}.nupkg`, lowercased.
    pub fn artifact_file_name(&self) -> String {
        format!(
            "{}.{}.nupkg",
            id_key(&self.id),
            self.version.normalized().to_ascii_lowercase()
        )
    }
}

impl PartialEq for PackageIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.id.eq_ignore_ascii_case(&other.id) && self.version == other.version
    }
}

impl Eq for PackageIdentity {}

impl Hash for PackageIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
        self.version.hash(state);
    }
}

impl fmt::Display for PackageIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.id, self.version)
    }
}

/// A raw requirement read from a package version's manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyDecl {
    pub id: String,
    pub range: VersionRange,
}

impl DependencyDecl {
    pub fn new(id: impl Into<String>, range: VersionRange) -> Self {
        Self {
            id: id.into(),
            range,
        }
    }
}

impl fmt::Display for DependencyDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.id, self.range)
    }
}

/// One concrete version per package id: the output of resolution.
///
/// Keys are lowercase ids; iteration follows key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedSet {
    packages: BTreeMap<String, PackageIdentity>,
}

impl ResolvedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the version chosen for a package, replacing any earlier choice.
    pub fn insert(&mut self, identity: PackageIdentity) {
        self.packages.insert(identity.key(), identity);
    }

    pub fn get(&self, id: &str) -> Option<&NuGetVersion> {
        self.packages.get(&id_key(id)).map(|p| &p.version)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.packages.contains_key(&id_key(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &PackageIdentity> {
        self.packages.values()
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

impl IntoIterator for ResolvedSet {
    type Item = PackageIdentity;
    type IntoIter = std::collections::btree_map::IntoValues<String, PackageIdentity>;

    fn into_iter(self) -> Self::IntoIter {
        self.packages.into_values()
    }
}
