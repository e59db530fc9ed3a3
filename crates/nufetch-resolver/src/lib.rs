//! Dependency resolution engine: requirement-tree construction against a
//! metadata provider, lowest-applicable version reconciliation, and conflict
//! reporting.

pub mod builder;
pub mod cache;
pub mod conflict;
pub mod error;
pub mod graph;
pub mod package;
pub mod provider;
pub mod reconcile;
pub mod resolver;
pub mod version;

pub use error::ResolveError;
pub use package::{DependencyDecl, PackageIdentity, ResolvedSet};
pub use provider::{MetadataProvider, OfflineProvider};
pub use resolver::{Resolution, Resolver};
pub use version::{NuGetVersion, VersionRange};
