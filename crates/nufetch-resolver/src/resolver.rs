//! Resolution entry point: build the requirement forest, then reconcile it.

use std::time::Instant;

use nufetch_core::dependency::RootSpec;

use crate::builder::{DependencyNode, GraphBuilder};
use crate::cache::MemoizedProvider;
use crate::graph::ResolvedGraph;
use crate::package::{PackageIdentity, ResolvedSet};
use crate::provider::MetadataProvider;
use crate::reconcile::{flatten, reconcile};

/// The output of dependency resolution.
#[derive(Debug, Clone)]
pub struct Resolution {
    forest: Vec<DependencyNode>,
    resolved: ResolvedSet,
}

impl Resolution {
    /// One package per id, ordered by lowercase id.
    pub fn packages(&self) -> impl Iterator<Item = &PackageIdentity> {
        self.resolved.iter()
    }

    pub fn resolved(&self) -> &ResolvedSet {
        &self.resolved
    }

    /// Requirement trees at their provisional versions, one per root.
    pub fn forest(&self) -> &[DependencyNode] {
        &self.forest
    }

    /// The forest collapsed onto the resolved versions.
    pub fn graph(&self) -> ResolvedGraph {
        ResolvedGraph::from_forest(&self.forest, &self.resolved)
    }

    pub fn into_resolved(self) -> ResolvedSet {
        self.resolved
    }
}

/// Resolves root package requests against a [`MetadataProvider`].
///
/// Each call to [`Resolver::resolve`] uses a fresh metadata cache, so repeated
/// runs observe registry changes.
pub struct Resolver<P> {
    provider: P,
}

impl<P: MetadataProvider> Resolver<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Resolve `roots` to exactly one version per package id.
    ///
    /// The result depends only on the roots and the registry contents, not on
    /// the order in which concurrent lookups complete.
    pub async fn resolve(&self, roots: &[RootSpec]) -> miette::Result<Resolution> {
        let start = Instant::now();
        let memo = MemoizedProvider::new(&self.provider);

        let forest = GraphBuilder::new(&memo).build(roots).await?;
        let edges = flatten(&forest);
        tracing::debug!(
            "{} requirement edges across {} roots",
            edges.len(),
            forest.len()
        );

        let resolved = reconcile(&edges)?;
        tracing::info!(
            "resolved {} packages in {:.2?} ({} version listings)",
            resolved.len(),
            start.elapsed(),
            memo.cached_listings()
        );

        Ok(Resolution { forest, resolved })
    }
}
