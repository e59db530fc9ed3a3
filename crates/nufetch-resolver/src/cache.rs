//! Resolution session cache for avoiding redundant metadata lookups.
//!
//! The same package is revisited from many branches of the graph, so each
//! `list_versions(id)` and `list_dependencies(id, version)` answer is fetched
//! once per run. Concurrent first requests for a key wait on the single
//! in-flight fetch. A failed fetch leaves the slot empty; since every failure
//! aborts the run, it is never retried in practice.
//!
//! At most [`MAX_CONCURRENT_FETCHES`] calls reach the inner provider at once.
//! Callers waiting on another caller's fetch hold no permit.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{OnceCell, Semaphore, SemaphorePermit};

use crate::package::{id_key, DependencyDecl};
use crate::provider::MetadataProvider;
use crate::version::NuGetVersion;

/// Maximum number of concurrent metadata requests per resolution.
pub const MAX_CONCURRENT_FETCHES: usize = 8;

type Slot<T> = Arc<OnceCell<Arc<[T]>>>;

/// Per-run memoizing wrapper around a [`MetadataProvider`].
pub struct MemoizedProvider<P> {
    inner: P,
    permits: Semaphore,
    versions: Mutex<HashMap<String, Slot<NuGetVersion>>>,
    dependencies: Mutex<HashMap<(String, NuGetVersion), Slot<DependencyDecl>>>,
}

impl<P: MetadataProvider> MemoizedProvider<P> {
    pub fn new(inner: P) -> Self {
        Self::with_limit(inner, MAX_CONCURRENT_FETCHES)
    }

    /// Wrap `inner`, allowing at most `limit` lookups in flight.
    pub fn with_limit(inner: P, limit: usize) -> Self {
        Self {
            inner,
            permits: Semaphore::new(limit.max(1)),
            versions: Mutex::new(HashMap::new()),
            dependencies: Mutex::new(HashMap::new()),
        }
    }

    /// All versions of `id`, sorted ascending without duplicates.
    pub async fn versions(&self, id: &str) -> miette::Result<Arc<[NuGetVersion]>> {
        let slot = slot_for(&self.versions, id_key(id));
        let list = slot
            .get_or_try_init(|| async {
                let _permit = self.acquire().await?;
                let mut versions = self.inner.list_versions(id).await?;
                versions.sort();
                versions.dedup();
                tracing::debug!("{id}: {} versions listed", versions.len());
                Ok::<_, miette::Report>(Arc::from(versions))
            })
            .await?;
        Ok(Arc::clone(list))
    }

    /// Declared dependencies of `id` at `version`, collapsed to one range per id.
    pub async fn dependencies(
        &self,
        id: &str,
        version: &NuGetVersion,
    ) -> miette::Result<Arc<[DependencyDecl]>> {
        let slot = slot_for(&self.dependencies, (id_key(id), version.clone()));
        let list = slot
            .get_or_try_init(|| async {
                let _permit = self.acquire().await?;
                let declared = self.inner.list_dependencies(id, version).await?;
                let distinct = collapse_distinct(id, version, declared);
                tracing::debug!("{id} {version}: {} dependencies", distinct.len());
                Ok::<_, miette::Report>(Arc::from(distinct))
            })
            .await?;
        Ok(Arc::clone(list))
    }

    async fn acquire(&self) -> miette::Result<SemaphorePermit<'_>> {
        self.permits
            .acquire()
            .await
            .map_err(|e| miette::miette!("metadata request queue closed: {e}"))
    }

    /// Number of distinct version listings fetched so far.
    pub fn cached_listings(&self) -> usize {
        self.versions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|slot| slot.initialized())
            .count()
    }
}

fn slot_for<K, T>(map: &Mutex<HashMap<K, Slot<T>>>, key: K) -> Slot<T>
where
    K: std::hash::Hash + Eq,
{
    let mut map = map.lock().unwrap_or_else(PoisonError::into_inner);
    Arc::clone(map.entry(key).or_default())
}

/// Drop repeated declarations of the same dependency.
///
/// Packages declare dependencies per target framework, so the same id usually
/// appears once per group. Exact repeats are dropped silently; the same id with
/// a different range is a metadata defect and the first declaration wins.
fn collapse_distinct(
    id: &str,
    version: &NuGetVersion,
    declared: Vec<DependencyDecl>,
) -> Vec<DependencyDecl> {
    let mut distinct: Vec<DependencyDecl> = Vec::with_capacity(declared.len());
    for decl in declared {
        match distinct.iter().find(|d| d.id.eq_ignore_ascii_case(&decl.id)) {
            Some(existing) if existing.range == decl.range => {}
            Some(existing) => {
                tracing::warn!(
                    "{id} {version} declares {} twice ({} and {}); using {}",
                    decl.id,
                    existing.range,
                    decl.range,
                    existing.range
                );
            }
            None => distinct.push(decl),
        }
    }
    distinct
}
