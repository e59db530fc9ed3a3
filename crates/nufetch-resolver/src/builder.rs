//! Requirement-tree construction.
//!
//! Every root is resolved to a concrete version, then each declared dependency
//! is resolved provisionally to the lowest version its range allows and
//! expanded recursively. Provisional versions are only used to descend; the
//! reconciliation pass decides the final version of every package.

use std::collections::HashSet;

use futures_util::future::{try_join_all, BoxFuture, FutureExt};
use nufetch_core::dependency::RootSpec;

use crate::cache::MemoizedProvider;
use crate::error::ResolveError;
use crate::package::{id_key, DependencyDecl, PackageIdentity};
use crate::provider::MetadataProvider;
use crate::version::{NuGetVersion, VersionRange};

/// A package in a requirement tree, together with the range it was required at.
///
/// Roots carry an exact range pinned to their resolved version.
#[derive(Debug, Clone)]
pub struct DependencyNode {
    pub identity: PackageIdentity,
    pub requirement: VersionRange,
    pub children: Vec<DependencyNode>,
}

impl DependencyNode {
    /// Number of nodes in this subtree, including `self`.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(DependencyNode::size).sum::<usize>()
    }

    /// Pre-order traversal of this subtree with each node's parent.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a DependencyNode, Option<&'a DependencyNode>)) {
        self.walk_from(None, visit);
    }

    fn walk_from<'a>(
        &'a self,
        parent: Option<&'a DependencyNode>,
        visit: &mut impl FnMut(&'a DependencyNode, Option<&'a DependencyNode>),
    ) {
        visit(self, parent);
        for child in &self.children {
            child.walk_from(Some(self), visit);
        }
    }
}

/// Highest stable version, or the highest prerelease when nothing stable exists.
pub fn select_default_version(versions: &[NuGetVersion]) -> Option<&NuGetVersion> {
    versions
        .iter()
        .filter(|v| !v.is_prerelease())
        .max()
        .or_else(|| versions.iter().max())
}

/// Builds one requirement tree per root against a memoized provider.
pub struct GraphBuilder<'a, P> {
    provider: &'a MemoizedProvider<P>,
    root_ids: HashSet<String>,
}

impl<'a, P: MetadataProvider> GraphBuilder<'a, P> {
    pub fn new(provider: &'a MemoizedProvider<P>) -> Self {
        Self {
            provider,
            root_ids: HashSet::new(),
        }
    }

    /// Build the forest for `roots`, in input order.
    pub async fn build(mut self, roots: &[RootSpec]) -> miette::Result<Vec<DependencyNode>> {
        self.root_ids = roots.iter().map(|r| id_key(&r.id)).collect();

        let mut forest = Vec::with_capacity(roots.len());
        for spec in roots {
            let identity = self.resolve_root(spec).await?;
            tracing::debug!("root {identity}");
            let children = self.resolve_subtree(&identity, &self.root_ids).await?;
            forest.push(DependencyNode {
                requirement: VersionRange::exact(identity.version.clone()),
                identity,
                children,
            });
        }
        Ok(forest)
    }

    async fn resolve_root(&self, spec: &RootSpec) -> miette::Result<PackageIdentity> {
        let versions = self.provider.versions(&spec.id).await?;
        if versions.is_empty() {
            return Err(ResolveError::RegistryEmpty {
                id: spec.id.clone(),
            }
            .into());
        }

        let version = match &spec.version {
            Some(constraint) => {
                let wanted =
                    NuGetVersion::parse(constraint).map_err(|e| ResolveError::InvalidPin {
                        id: spec.id.clone(),
                        constraint: constraint.clone(),
                        reason: e.reason,
                    })?;
                match versions.iter().find(|v| **v == wanted) {
                    Some(found) => found.clone(),
                    None => {
                        return Err(ResolveError::PinNotFound {
                            id: spec.id.clone(),
                            version: wanted,
                            available: versions.to_vec(),
                        }
                        .into());
                    }
                }
            }
            None => select_default_version(&versions)
                .cloned()
                .ok_or_else(|| ResolveError::RegistryEmpty {
                    id: spec.id.clone(),
                })?,
        };

        Ok(PackageIdentity::new(spec.id.clone(), version))
    }

    /// Resolve the declared dependencies of `parent`, concurrently, keeping
    /// declaration order.
    ///
    /// `direct` holds the root ids and the direct requirements of every level
    /// above `parent`, including `parent` and its siblings. Those packages are
    /// expanded at a shallower level, so they are kept as leaves here.
    fn resolve_subtree<'b>(
        &'b self,
        parent: &'b PackageIdentity,
        direct: &'b HashSet<String>,
    ) -> BoxFuture<'b, miette::Result<Vec<DependencyNode>>> {
        async move {
            let declared = self
                .provider
                .dependencies(&parent.id, &parent.version)
                .await?;
            let mut below = direct.clone();
            below.extend(declared.iter().map(|decl| id_key(&decl.id)));

            let pending = declared
                .iter()
                .map(|decl| self.resolve_dependency(parent, decl, direct, &below));
            try_join_all(pending).await
        }
        .boxed()
    }

    fn resolve_dependency<'b>(
        &'b self,
        parent: &'b PackageIdentity,
        decl: &'b DependencyDecl,
        direct: &'b HashSet<String>,
        below: &'b HashSet<String>,
    ) -> BoxFuture<'b, miette::Result<DependencyNode>> {
        async move {
            let versions = self.provider.versions(&decl.id).await?;
            if versions.is_empty() {
                return Err(ResolveError::RegistryEmpty {
                    id: decl.id.clone(),
                }
                .into());
            }
            let chosen = decl.range.best_match(versions.iter()).cloned().ok_or_else(|| {
                ResolveError::NoRangeMatch {
                    dependency: decl.id.clone(),
                    range: decl.range.clone(),
                    parent: parent.id.clone(),
                    parent_version: parent.version.clone(),
                    available: versions.to_vec(),
                }
            })?;

            let identity = PackageIdentity::new(decl.id.clone(), chosen);

            // Keep the edge so reconciliation still checks this range.
            if direct.contains(&identity.key()) {
                tracing::debug!("{identity} via {parent}: required above, not descending");
                return Ok(DependencyNode {
                    identity,
                    requirement: decl.range.clone(),
                    children: Vec::new(),
                });
            }

            tracing::debug!("{identity} via {parent} ({})", decl.range);
            let children = self.resolve_subtree(&identity, below).await?;
            Ok(DependencyNode {
                identity,
                requirement: decl.range.clone(),
                children,
            })
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> NuGetVersion {
        NuGetVersion::parse(s).unwrap()
    }

    #[test]
    fn default_version_prefers_stable() {
        let versions = vec![v("1.0.0"), v("1.1.0-beta"), v("0.9.0")];
        assert_eq!(select_default_version(&versions), Some(&v("1.0.0")));
    }

    #[test]
    fn default_version_falls_back_to_prerelease() {
        let versions = vec![v("1.0.0-alpha"), v("1.0.0-beta")];
        assert_eq!(select_default_version(&versions), Some(&v("1.0.0-beta")));
        assert_eq!(select_default_version(&[]), None);
    }

    #[test]
    fn node_size_and_walk_order() {
        let leaf = |id: &str| DependencyNode {
            identity: PackageIdentity::new(id, v("1.0")),
            requirement: VersionRange::any(),
            children: vec![],
        };
        let root = DependencyNode {
            identity: PackageIdentity::new("A", v("1.0")),
            requirement: VersionRange::exact(v("1.0")),
            children: vec![
                DependencyNode {
                    children: vec![leaf("C")],
                    ..leaf("B")
                },
                leaf("D"),
            ],
        };
        assert_eq!(root.size(), 4);

        let mut seen = Vec::new();
        root.walk(&mut |node, parent| {
            seen.push((
                node.identity.id.clone(),
                parent.map(|p| p.identity.id.clone()),
            ));
        });
        let expected = [
            ("A", None),
            ("B", Some("A")),
            ("C", Some("B")),
            ("D", Some("A")),
        ];
        assert_eq!(seen.len(), expected.len());
        for ((id, parent), (eid, eparent)) in seen.iter().zip(expected) {
            assert_eq!(id, eid);
            assert_eq!(parent.as_deref(), eparent);
        }
    }
}
