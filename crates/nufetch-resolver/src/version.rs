//! NuGet version parsing, comparison, and range matching.
//!
//! NuGet versions extend SemVer 2.0:
//! - Up to four numeric parts (`major.minor.patch.revision`); missing parts are `0`
//! - An optional `-` prerelease label made of `.`-separated identifiers
//! - An optional `+` build metadata suffix that never affects ordering
//! - A version with a prerelease label sorts before the same version without one

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use thiserror::Error;

/// Error returned when a version or range string is malformed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid version `{input}`: {reason}")]
pub struct VersionParseError {
    pub input: String,
    pub reason: String,
}

impl VersionParseError {
    fn new(input: &str, reason: impl Into<String>) -> Self {
        Self {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// A parsed NuGet version.
#[derive(Debug, Clone)]
pub struct NuGetVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub revision: u64,
    release: Vec<String>,
    metadata: Option<String>,
}

impl NuGetVersion {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            revision: 0,
            release: Vec::new(),
            metadata: None,
        }
    }

    pub fn parse(input: &str) -> Result<Self, VersionParseError> {
        let s = input.trim();
        if s.is_empty() {
            return Err(VersionParseError::new(input, "empty version"));
        }

        let (rest, metadata) = match s.split_once('+') {
            Some((rest, meta)) => {
                if meta.is_empty() || !meta.split('.').all(is_identifier) {
                    return Err(VersionParseError::new(input, "malformed build metadata"));
                }
                (rest, Some(meta.to_string()))
            }
            None => (s, None),
        };

        let (numbers, release) = match rest.split_once('-') {
            Some((numbers, label)) => {
                let parts: Vec<&str> = label.split('.').collect();
                if !parts.iter().all(|p| is_identifier(p)) {
                    return Err(VersionParseError::new(input, "malformed prerelease label"));
                }
                (numbers, parts.into_iter().map(str::to_string).collect())
            }
            None => (rest, Vec::new()),
        };

        let mut parts = [0u64; 4];
        let segments: Vec<&str> = numbers.split('.').collect();
        if segments.len() > 4 {
            return Err(VersionParseError::new(input, "more than four numeric parts"));
        }
        for (slot, segment) in parts.iter_mut().zip(&segments) {
            if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
                return Err(VersionParseError::new(
                    input,
                    format!("`{segment}` is not a number"),
                ));
            }
            *slot = segment
                .parse()
                .map_err(|_| VersionParseError::new(input, format!("`{segment}` is too large")))?;
        }

        Ok(Self {
            major: parts[0],
            minor: parts[1],
            patch: parts[2],
            revision: parts[3],
            release,
            metadata,
        })
    }

    pub fn is_prerelease(&self) -> bool {
        !self.release.is_empty()
    }

    /// Normalized form without build metadata, as used in package paths.
    ///
    /// `1.0` becomes `1.0.0`; a zero revision is dropped.
    pub fn normalized(&self) -> String {
        let mut s = format!("{}.{}.{}", self.major, self.minor, self.patch);
        if self.revision != 0 {
            s.push_str(&format!(".{}", self.revision));
        }
        if !self.release.is_empty() {
            s.push('-');
            s.push_str(&self.release.join("."));
        }
        s
    }
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

impl fmt::Display for NuGetVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.normalized())?;
        if let Some(meta) = &self.metadata {
            write!(f, "+{meta}")?;
        }
        Ok(())
    }
}

impl std::str::FromStr for NuGetVersion {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl PartialEq for NuGetVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for NuGetVersion {}

impl Hash for NuGetVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.major, self.minor, self.patch, self.revision).hash(state);
        self.release.len().hash(state);
        for label in &self.release {
            match label.parse::<u64>() {
                Ok(n) => n.hash(state),
                Err(_) => label.to_ascii_lowercase().hash(state),
            }
        }
    }
}

impl Ord for NuGetVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch, self.revision)
            .cmp(&(other.major, other.minor, other.patch, other.revision))
            .then_with(|| compare_release(&self.release, &other.release))
    }
}

impl PartialOrd for NuGetVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn compare_release(a: &[String], b: &[String]) -> Ordering {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        (false, false) => {}
    }
    for (x, y) in a.iter().zip(b) {
        let ord = compare_label(x, y);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.len().cmp(&b.len())
}

fn compare_label(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.to_ascii_lowercase().cmp(&b.to_ascii_lowercase()),
    }
}

/// One side of a [`VersionRange`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bound {
    pub version: NuGetVersion,
    pub inclusive: bool,
}

impl Bound {
    pub fn inclusive(version: NuGetVersion) -> Self {
        Self {
            version,
            inclusive: true,
        }
    }

    pub fn exclusive(version: NuGetVersion) -> Self {
        Self {
            version,
            inclusive: false,
        }
    }
}

/// A NuGet version range expression.
///
/// Supports: `1.0` (at least 1.0), `[1.0]` (exact), `[1.0,2.0)`, `(1.0,)`,
/// `(,2.0]`. An empty string means any version.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VersionRange {
    pub lower: Option<Bound>,
    pub upper: Option<Bound>,
}

impl VersionRange {
    /// The unbounded range.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn exact(version: NuGetVersion) -> Self {
        Self {
            lower: Some(Bound::inclusive(version.clone())),
            upper: Some(Bound::inclusive(version)),
        }
    }

    pub fn at_least(version: NuGetVersion) -> Self {
        Self {
            lower: Some(Bound::inclusive(version)),
            upper: None,
        }
    }

    /// Parse a NuGet range string.
    pub fn parse(spec: &str) -> Result<Self, VersionParseError> {
        let s = spec.trim();
        if s.is_empty() {
            return Ok(Self::any());
        }
        if !s.starts_with('[') && !s.starts_with('(') {
            return NuGetVersion::parse(s).map(Self::at_least);
        }
        if s.len() < 2 || !(s.ends_with(']') || s.ends_with(')')) {
            return Err(VersionParseError::new(spec, "unterminated range"));
        }

        let open_inclusive = s.starts_with('[');
        let close_inclusive = s.ends_with(']');
        let inner = &s[1..s.len() - 1];

        let range = match inner.split_once(',') {
            Some((lower, upper)) => {
                let lower = lower.trim();
                let upper = upper.trim();
                if upper.contains(',') {
                    return Err(VersionParseError::new(spec, "too many `,` in range"));
                }
                Self {
                    lower: parse_bound(spec, lower, open_inclusive)?,
                    upper: parse_bound(spec, upper, close_inclusive)?,
                }
            }
            None => {
                // [1.0] is the only single-version bracket form
                if !(open_inclusive && close_inclusive) {
                    return Err(VersionParseError::new(
                        spec,
                        "a single version in brackets must use `[` and `]`",
                    ));
                }
                let v = NuGetVersion::parse(inner)
                    .map_err(|e| VersionParseError::new(spec, e.reason))?;
                Self::exact(v)
            }
        };

        if let (Some(lower), Some(upper)) = (&range.lower, &range.upper) {
            match lower.version.cmp(&upper.version) {
                Ordering::Greater => {
                    return Err(VersionParseError::new(spec, "lower bound exceeds upper bound"));
                }
                Ordering::Equal if !(lower.inclusive && upper.inclusive) => {
                    return Err(VersionParseError::new(spec, "range is empty"));
                }
                _ => {}
            }
        }
        Ok(range)
    }

    pub fn is_exact(&self) -> bool {
        match (&self.lower, &self.upper) {
            (Some(l), Some(u)) => l.inclusive && u.inclusive && l.version == u.version,
            _ => false,
        }
    }

    /// Check if a version satisfies this range.
    pub fn satisfies(&self, version: &NuGetVersion) -> bool {
        if let Some(ref lower) = self.lower {
            let cmp = version.cmp(&lower.version);
            if lower.inclusive {
                if cmp == Ordering::Less {
                    return false;
                }
            } else if cmp != Ordering::Greater {
                return false;
            }
        }
        if let Some(ref upper) = self.upper {
            let cmp = version.cmp(&upper.version);
            if upper.inclusive {
                if cmp == Ordering::Greater {
                    return false;
                }
            } else if cmp != Ordering::Less {
                return false;
            }
        }
        true
    }

    /// The lowest candidate that satisfies this range.
    pub fn best_match<'a, I>(&self, candidates: I) -> Option<&'a NuGetVersion>
    where
        I: IntoIterator<Item = &'a NuGetVersion>,
    {
        candidates.into_iter().filter(|v| self.satisfies(v)).min()
    }
}

fn parse_bound(
    spec: &str,
    text: &str,
    inclusive: bool,
) -> Result<Option<Bound>, VersionParseError> {
    if text.is_empty() {
        return Ok(None);
    }
    let version =
        NuGetVersion::parse(text).map_err(|e| VersionParseError::new(spec, e.reason))?;
    Ok(Some(Bound { version, inclusive }))
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_exact() {
            if let Some(lower) = &self.lower {
                return write!(f, "[{}]", lower.version);
            }
        }
        match &self.lower {
            Some(b) => write!(f, "{}{}", if b.inclusive { "[" } else { "(" }, b.version)?,
            None => f.write_str("(")?,
        }
        f.write_str(", ")?;
        match &self.upper {
            Some(b) => write!(f, "{}{}", b.version, if b.inclusive { "]" } else { ")" }),
            None => f.write_str(")"),
        }
    }
}
