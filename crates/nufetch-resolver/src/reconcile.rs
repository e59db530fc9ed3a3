//! Flattening the requirement forest and choosing one version per package.

use std::collections::HashMap;

use crate::builder::DependencyNode;
use crate::conflict::{ConflictReport, PackageConflict, Requirement};
use crate::error::ResolveError;
use crate::package::{PackageIdentity, ResolvedSet};
use crate::version::{NuGetVersion, VersionRange};

/// One requirement edge from the flattened forest.
#[derive(Debug, Clone)]
pub struct RequirementEdge {
    /// The package at the provisional version chosen while building.
    pub identity: PackageIdentity,
    pub requirement: VersionRange,
    /// The package that declared this edge; `None` for roots.
    pub required_by: Option<PackageIdentity>,
}

/// Flatten every tree pre-order, roots included.
pub fn flatten(forest: &[DependencyNode]) -> Vec<RequirementEdge> {
    let mut edges = Vec::new();
    for root in forest {
        root.walk(&mut |node, parent| {
            edges.push(RequirementEdge {
                identity: node.identity.clone(),
                requirement: node.requirement.clone(),
                required_by: parent.map(|p| p.identity.clone()),
            });
        });
    }
    edges
}

/// Group edges by package id (case-insensitive), in order of first appearance.
pub fn group_by_id(edges: &[RequirementEdge]) -> Vec<Vec<&RequirementEdge>> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Vec<&RequirementEdge>> = Vec::new();
    for edge in edges {
        let slot = *index.entry(edge.identity.key()).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(edge);
    }
    groups
}

/// Pick one version per package id satisfying every edge recorded against it.
///
/// Candidates are the provisional versions present in the group, tried in
/// ascending order so the lowest applicable version wins. Every conflicting id
/// is collected before failing.
pub fn reconcile(edges: &[RequirementEdge]) -> Result<ResolvedSet, ResolveError> {
    let mut resolved = ResolvedSet::new();
    let mut report = ConflictReport::new();

    for group in group_by_id(edges) {
        let first = &group[0].identity;

        if group.iter().all(|e| e.identity.version == first.version) {
            resolved.insert(first.clone());
            continue;
        }

        let mut candidates: Vec<&NuGetVersion> =
            group.iter().map(|e| &e.identity.version).collect();
        candidates.sort();
        candidates.dedup();

        let chosen = candidates
            .iter()
            .find(|candidate| group.iter().all(|e| e.requirement.satisfies(candidate)));

        match chosen {
            Some(version) => {
                tracing::debug!(
                    "{}: {} requirements reconciled to {version}",
                    first.id,
                    group.len()
                );
                resolved.insert(PackageIdentity::new(first.id.clone(), (*version).clone()));
            }
            None => report.add(PackageConflict {
                id: first.id.clone(),
                requirements: group
                    .iter()
                    .map(|e| Requirement {
                        range: e.requirement.clone(),
                        required_by: e.required_by.clone(),
                    })
                    .collect(),
                candidates: candidates.iter().map(|v| (*v).clone()).collect(),
            }),
        }
    }

    if report.is_empty() {
        Ok(resolved)
    } else {
        Err(ResolveError::VersionConflict { report })
    }
}
