use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use nufetch_util::errors::NufetchError;

use crate::DEFAULT_SOURCE_URL;

/// Global user configuration loaded from `~/.nufetch/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Package sources by name, consulted in name order.
    #[serde(default)]
    pub sources: BTreeMap<String, SourceEntry>,

    #[serde(default)]
    pub fetch: FetchConfig,

    #[serde(default)]
    pub resolve: ResolveConfig,
}

/// A package source: either a bare URL/path or a detailed table with credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourceEntry {
    Url(String),
    Detailed {
        url: String,
        #[serde(default)]
        username: Option<String>,
        #[serde(default)]
        password: Option<String>,
    },
}

impl SourceEntry {
    pub fn url(&self) -> &str {
        match self {
            SourceEntry::Url(url) => url,
            SourceEntry::Detailed { url, .. } => url,
        }
    }
}

/// Artifact download settings from `[fetch]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default = "default_jobs")]
    pub jobs: usize,
    #[serde(default)]
    pub overwrite: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            jobs: default_jobs(),
            overwrite: false,
        }
    }
}

fn default_output() -> String {
    "packages".to_string()
}

fn default_jobs() -> usize {
    8
}

/// Resolution settings from `[resolve]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolveConfig {
    /// Only read nuspec dependency groups for this target framework.
    #[serde(default, rename = "target-framework")]
    pub target_framework: Option<String>,
}

impl GlobalConfig {
    /// Load the global configuration from the default path, or return defaults if the file doesn't exist.
    pub fn load() -> miette::Result<Self> {
        let path = Self::default_path();
        if path.is_file() {
            Self::load_from(&path)
        } else {
            tracing::debug!("no config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load the configuration from an explicit file, which must exist.
    pub fn load_from(path: &Path) -> miette::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| NufetchError::Config {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        Self::parse(&content).map_err(|e| {
            NufetchError::Config {
                message: format!("Failed to parse {}: {e}", path.display()),
            }
            .into()
        })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Returns the default path to the global config file.
    pub fn default_path() -> PathBuf {
        dirs_path().join("config.toml")
    }

    /// Configured sources in order, falling back to nuget.org when none are set.
    pub fn effective_sources(&self) -> Vec<(String, SourceEntry)> {
        if self.sources.is_empty() {
            return vec![(
                "nuget.org".to_string(),
                SourceEntry::Url(DEFAULT_SOURCE_URL.to_string()),
            )];
        }
        self.sources
            .iter()
            .map(|(name, entry)| (name.clone(), entry.clone()))
            .collect()
    }
}

/// Returns the nufetch data directory: `$NUFETCH_HOME`, or `~/.nufetch/`.
pub fn dirs_path() -> PathBuf {
    if let Ok(home) = std::env::var("NUFETCH_HOME") {
        if !home.is_empty() {
            return PathBuf::from(home);
        }
    }
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    Path::new(&home).join(".nufetch")
}
