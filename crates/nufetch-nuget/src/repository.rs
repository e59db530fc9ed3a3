//! Package source abstraction: flat container layout, remote and local sources.

use std::fmt;
use std::path::PathBuf;

use nufetch_core::config::SourceEntry;
use nufetch_resolver::package::id_key;
use nufetch_resolver::NuGetVersion;
use nufetch_util::fs::expand_home;

/// Where a source's flat container lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    /// An HTTP(S) base URL, without a trailing slash.
    Remote(String),
    /// A directory laid out like a flat container.
    Local(PathBuf),
}

/// A configured package source with optional credentials.
#[derive(Debug, Clone)]
pub struct PackageSource {
    pub name: String,
    pub location: SourceLocation,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl PackageSource {
    /// Build a source from a name and a config `SourceEntry`.
    pub fn from_entry(name: &str, entry: &SourceEntry) -> Self {
        let mut source = Self::from_url(name, entry.url());
        if let SourceEntry::Detailed {
            username, password, ..
        } = entry
        {
            source.username = username.clone();
            source.password = password.clone();
        }
        source
    }

    /// Build an anonymous source. Anything that is not an `http(s)://` URL is
    /// treated as a local directory; a `file://` prefix is accepted.
    pub fn from_url(name: &str, url: &str) -> Self {
        let url = url.trim();
        let location = if url.starts_with("http://") || url.starts_with("https://") {
            SourceLocation::Remote(url.trim_end_matches('/').to_string())
        } else {
            let path = url.strip_prefix("file://").unwrap_or(url);
            SourceLocation::Local(expand_home(path))
        };
        Self {
            name: name.to_string(),
            location,
            username: None,
            password: None,
        }
    }

    /// Relative path of the version index for a package.
    ///
    /// `Newtonsoft.Json` becomes `newtonsoft.json/index.json`.
    pub fn index_path(id: &str) -> String {
        format!("{}/index.json", id_key(id))
    }

    /// Relative path of the nuspec for one package version.
    pub fn nuspec_path(id: &str, version: &NuGetVersion) -> String {
        let id = id_key(id);
        format!("{id}/{}/{id}.nuspec", version_segment(version))
    }

    /// Relative path of the `.nupkg` for one package version.
    pub fn package_path(id: &str, version: &NuGetVersion) -> String {
        let id = id_key(id);
        let version = version_segment(version);
        format!("{id}/{version}/{id}.{version}.nupkg")
    }

    /// Whether this source has authentication configured.
    pub fn has_auth(&self) -> bool {
        self.username.is_some() || self.password.is_some()
    }
}

impl fmt::Display for PackageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            SourceLocation::Remote(url) => write!(f, "{} ({url})", self.name),
            SourceLocation::Local(path) => write!(f, "{} ({})", self.name, path.display()),
        }
    }
}

fn version_segment(version: &NuGetVersion) -> String {
    version.normalized().to_ascii_lowercase()
}
