use std::fmt;
use std::str::FromStr;

use nufetch_util::errors::NufetchError;

/// A package explicitly requested by the user, optionally pinned to a version.
///
/// The version string is kept verbatim; it is only parsed and validated
/// against the registry during resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootSpec {
    pub id: String,
    pub version: Option<String>,
}

impl RootSpec {
    pub fn new(id: impl Into<String>, version: Option<&str>) -> Self {
        Self {
            id: id.into(),
            version: version.map(str::to_string),
        }
    }

    /// Parse `"id"` or `"id:version"`.
    ///
    /// An empty version after the separator means "no constraint".
    pub fn parse(s: &str) -> Result<Self, NufetchError> {
        let s = s.trim();
        let (id, version) = match s.split_once(':') {
            Some((id, version)) => (id.trim(), Some(version.trim())),
            None => (s, None),
        };
        if id.is_empty() {
            return Err(NufetchError::Input {
                message: format!("missing package id in `{s}`"),
            });
        }
        if let Some(v) = version {
            if v.contains(':') {
                return Err(NufetchError::Input {
                    message: format!("too many `:` separators in `{s}`"),
                });
            }
        }
        Ok(Self {
            id: id.to_string(),
            version: version.filter(|v| !v.is_empty()).map(str::to_string),
        })
    }

    pub fn is_pinned(&self) -> bool {
        self.version.is_some()
    }
}

impl FromStr for RootSpec {
    type Err = NufetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RootSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(v) => write!(f, "{}:{}", self.id, v),
            None => f.write_str(&self.id),
        }
    }
}
