//! Output directory of downloaded `.nupkg` files.

use std::path::{Path, PathBuf};

use nufetch_resolver::PackageIdentity;
use nufetch_util::errors::NufetchError;
use nufetch_util::fs::write_atomic;

/// Flat directory of package artifacts named `{id}.{version}.nupkg`, lowercased.
#[derive(Debug, Clone)]
pub struct PackageStore {
    root: PathBuf,
}

impl PackageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory of this store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Target path for a package's artifact.
    pub fn path_for(&self, package: &PackageIdentity) -> PathBuf {
        self.root.join(package.artifact_file_name())
    }

    /// Whether the artifact for this package is already present.
    pub fn contains(&self, package: &PackageIdentity) -> bool {
        self.path_for(package).is_file()
    }

    /// Write artifact bytes, replacing any existing file.
    pub fn put(&self, package: &PackageIdentity, data: &[u8]) -> miette::Result<PathBuf> {
        let path = self.path_for(package);
        write_atomic(&path, data).map_err(NufetchError::Io)?;
        Ok(path)
    }
}
