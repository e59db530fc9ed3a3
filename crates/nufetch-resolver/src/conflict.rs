//! Version conflict collection and reporting.

use std::fmt;

use crate::package::PackageIdentity;
use crate::version::{NuGetVersion, VersionRange};

/// A report of every package id that could not be reconciled.
#[derive(Debug, Clone, Default)]
pub struct ConflictReport {
    pub conflicts: Vec<PackageConflict>,
}

/// A package id for which no single version satisfies all requirements.
#[derive(Debug, Clone)]
pub struct PackageConflict {
    pub id: String,
    pub requirements: Vec<Requirement>,
    /// Distinct versions that were tried, ascending.
    pub candidates: Vec<NuGetVersion>,
}

/// A requirement edge against a package, and who declared it.
///
/// `required_by` is `None` for a root package pinned by the user.
#[derive(Debug, Clone)]
pub struct Requirement {
    pub range: VersionRange,
    pub required_by: Option<PackageIdentity>,
}

impl ConflictReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, conflict: PackageConflict) {
        self.conflicts.push(conflict);
    }

    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conflicts.len()
    }

    /// Ids of all conflicting packages, in discovery order.
    pub fn ids(&self) -> Vec<&str> {
        self.conflicts.iter().map(|c| c.id.as_str()).collect()
    }
}

impl fmt::Display for ConflictReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.conflicts.is_empty() {
            return write!(f, "No version conflicts.");
        }
        write!(f, "Version conflicts ({}): {}", self.len(), self.ids().join(", "))?;
        for c in &self.conflicts {
            write!(f, "\n  {c}")?;
        }
        Ok(())
    }
}

impl fmt::Display for PackageConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let candidates: Vec<String> = self.candidates.iter().map(|v| v.to_string()).collect();
        write!(f, "{}: no version in {{{}}} satisfies", self.id, candidates.join(", "))?;
        for req in &self.requirements {
            write!(f, "\n    {req}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.required_by {
            Some(parent) => write!(f, "{} (required by {parent})", self.range),
            None => write!(f, "{} (requested)", self.range),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> NuGetVersion {
        NuGetVersion::parse(s).unwrap()
    }

    #[test]
    fn empty_report() {
        let report = ConflictReport::new();
        assert!(report.is_empty());
        assert_eq!(report.len(), 0);
        assert_eq!(report.to_string(), "No version conflicts.");
    }

    #[test]
    fn report_with_conflicts() {
        let mut report = ConflictReport::new();
        report.add(PackageConflict {
            id: "Lib".to_string(),
            requirements: vec![
                Requirement {
                    range: VersionRange::exact(v("1.0")),
                    required_by: None,
                },
                Requirement {
                    range: VersionRange::at_least(v("2.0")),
                    required_by: Some(PackageIdentity::new("App", v("3.0"))),
                },
            ],
            candidates: vec![v("1.0"), v("2.0")],
        });
        assert!(!report.is_empty());
        assert_eq!(report.ids(), ["Lib"]);
        let s = report.to_string();
        assert!(s.contains("Version conflicts (1): Lib"), "got: {s}");
        assert!(s.contains("no version in {1.0.0, 2.0.0} satisfies"), "got: {s}");
        assert!(s.contains("[1.0.0] (requested)"), "got: {s}");
        assert!(s.contains("[2.0.0, ) (required by App 3.0.0)"), "got: {s}");
    }
}
