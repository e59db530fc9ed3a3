//! Resolved dependency graph for display and "why is this here" queries.

use std::collections::HashMap;
use std::fmt::Write as _;

use petgraph::algo::astar;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::builder::DependencyNode;
use crate::package::{id_key, PackageIdentity, ResolvedSet};
use crate::version::VersionRange;

/// The requirement forest collapsed onto resolved versions, backed by petgraph.
///
/// Each package id appears once, at its reconciled version. Edges carry the
/// range the dependent declared; the first declaration between two packages wins.
pub struct ResolvedGraph {
    graph: DiGraph<PackageIdentity, VersionRange>,
    index: HashMap<String, NodeIndex>,
    roots: Vec<NodeIndex>,
}

/// One pending line of [`ResolvedGraph::print_tree`].
struct TreeLine<'a> {
    node: NodeIndex,
    requirement: &'a VersionRange,
    prefix: String,
    last: bool,
    /// Nodes from the root down to this line's parent.
    ancestors: Vec<NodeIndex>,
}

impl ResolvedGraph {
    /// Build the graph from requirement trees and the versions chosen for them.
    pub fn from_forest(forest: &[DependencyNode], resolved: &ResolvedSet) -> Self {
        let mut g = Self {
            graph: DiGraph::new(),
            index: HashMap::new(),
            roots: Vec::new(),
        };
        for tree in forest {
            let root = g.intern(&tree.identity, resolved);
            if !g.roots.contains(&root) {
                g.roots.push(root);
            }
            tree.walk(&mut |node, parent| {
                if let Some(parent) = parent {
                    let from = g.intern(&parent.identity, resolved);
                    let to = g.intern(&node.identity, resolved);
                    if g.graph.find_edge(from, to).is_none() {
                        g.graph.add_edge(from, to, node.requirement.clone());
                    }
                }
            });
        }
        g
    }

    /// Node for `identity`'s id, created at the resolved version on first use.
    fn intern(&mut self, identity: &PackageIdentity, resolved: &ResolvedSet) -> NodeIndex {
        let key = identity.key();
        if let Some(&idx) = self.index.get(&key) {
            return idx;
        }
        let version = resolved.get(&identity.id).unwrap_or(&identity.version);
        let idx = self
            .graph
            .add_node(PackageIdentity::new(identity.id.clone(), version.clone()));
        self.index.insert(key, idx);
        idx
    }

    /// The resolved package with this id (case-insensitive).
    pub fn find(&self, id: &str) -> Option<&PackageIdentity> {
        self.index.get(&id_key(id)).map(|&idx| &self.graph[idx])
    }

    /// Dependencies of `idx` with their requirements, sorted by id.
    fn children(&self, idx: NodeIndex) -> Vec<(NodeIndex, &VersionRange)> {
        let mut out: Vec<_> = self
            .graph
            .edges(idx)
            .map(|e| (e.target(), e.weight()))
            .collect();
        out.sort_by_key(|(child, _)| self.graph[*child].key());
        out
    }

    /// Render every root and its dependencies as a tree.
    ///
    /// A package that depends back on one of its ancestors is printed but not
    /// expanded again.
    pub fn print_tree(&self, max_depth: Option<usize>) -> String {
        let mut out = String::new();
        for &root in &self.roots {
            let _ = writeln!(out, "{}", self.graph[root]);
            let mut stack = self.lines_below(root, "", Vec::new());

            while let Some(line) = stack.pop() {
                let connector = if line.last { "└── " } else { "├── " };
                let _ = writeln!(
                    out,
                    "{}{connector}{} ({})",
                    line.prefix, self.graph[line.node], line.requirement
                );

                let depth = line.ancestors.len();
                let cyclic = line.ancestors.contains(&line.node);
                if cyclic || max_depth.is_some_and(|max| depth >= max) {
                    continue;
                }
                let indent = if line.last { "    " } else { "│   " };
                let prefix = format!("{}{indent}", line.prefix);
                stack.extend(self.lines_below(line.node, &prefix, line.ancestors));
            }
        }
        out
    }

    /// Lines for the children of `node`, reversed so they pop in order.
    fn lines_below(
        &self,
        node: NodeIndex,
        prefix: &str,
        mut ancestors: Vec<NodeIndex>,
    ) -> Vec<TreeLine<'_>> {
        ancestors.push(node);
        let children = self.children(node);
        let count = children.len();
        children
            .into_iter()
            .enumerate()
            .rev()
            .map(|(i, (child, requirement))| TreeLine {
                node: child,
                requirement,
                prefix: prefix.to_string(),
                last: i + 1 == count,
                ancestors: ancestors.clone(),
            })
            .collect()
    }

    /// Shortest chain of dependencies from a root to the given package.
    ///
    /// Among equally short chains, the one from the earliest root is returned.
    pub fn find_path(&self, id: &str) -> Option<Vec<&PackageIdentity>> {
        let target = *self.index.get(&id_key(id))?;
        let (_, path) = self
            .roots
            .iter()
            .filter_map(|&root| astar(&self.graph, root, |n| n == target, |_| 1usize, |_| 0))
            .min_by_key(|(hops, _)| *hops)?;
        Some(path.into_iter().map(|idx| &self.graph[idx]).collect())
    }
}
