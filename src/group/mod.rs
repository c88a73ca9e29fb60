//! Cache groups: named namespaces tying a cache, a loader and peers
//! together.
//!
//! - [`Group`]: the coordination object callers invoke; resolves a lookup
//!   through the local cache, then the owning peer, then the loader
//! - [`registry`]: process-wide name-to-group lookup

pub mod registry;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::cache::guarded::GuardedCache;
use crate::cache::view::ByteView;
use crate::peers::PeerPicker;

/// Produces the value for a key when no cache can serve it.
///
/// Loaders are assumed idempotent: concurrent misses on one key may each
/// invoke the loader, and the last completed load wins the cached slot.
#[async_trait]
pub trait Loader: Send + Sync {
    async fn load(&self, key: &str) -> anyhow::Result<Vec<u8>>;
}

/// Adapts a plain closure into a [`Loader`].
pub struct LoaderFn<F>(pub F);

#[async_trait]
impl<F> Loader for LoaderFn<F>
where
    F: Fn(&str) -> anyhow::Result<Vec<u8>> + Send + Sync,
{
    async fn load(&self, key: &str) -> anyhow::Result<Vec<u8>> {
        (self.0)(key)
    }
}

#[derive(Error, Debug)]
pub enum GroupError {
    /// Empty keys are rejected before any lookup.
    #[error("key must not be empty")]
    EmptyKey,

    /// The loader could not produce a value; its message is surfaced
    /// verbatim.
    #[error("{0}")]
    Loader(anyhow::Error),
}

/// Point-in-time counters for one group.
#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    pub gets: u64,
    pub cache_hits: u64,
    pub peer_loads: u64,
    pub peer_errors: u64,
    pub loader_loads: u64,
    pub loader_errors: u64,
}

/// Counters bumped along each resolution path.
#[derive(Debug, Default)]
struct GroupStats {
    gets: AtomicU64,
    cache_hits: AtomicU64,
    peer_loads: AtomicU64,
    peer_errors: AtomicU64,
    loader_loads: AtomicU64,
    loader_errors: AtomicU64,
}

impl GroupStats {
    fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            gets: self.gets.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            peer_loads: self.peer_loads.load(Ordering::Relaxed),
            peer_errors: self.peer_errors.load(Ordering::Relaxed),
            loader_loads: self.loader_loads.load(Ordering::Relaxed),
            loader_errors: self.loader_errors.load(Ordering::Relaxed),
        }
    }
}

/// A named cache namespace.
///
/// Values this node loads itself are cached locally: for keys the ring
/// assigns to this node, that cache is the copy the rest of the cluster
/// queries. Values served by a remote peer are returned without being
/// cached here, since the owning node already holds them.
pub struct Group {
    name: String,
    cache: GuardedCache,
    loader: Arc<dyn Loader>,
    peers: RwLock<Option<Arc<dyn PeerPicker>>>,
    stats: GroupStats,
}

impl std::fmt::Debug for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Group").field("name", &self.name).finish()
    }
}

impl Group {
    pub(crate) fn new(name: impl Into<String>, capacity_bytes: i64, loader: Arc<dyn Loader>) -> Self {
        let name = name.into();
        let evicted_from = name.clone();
        let cache = GuardedCache::with_evict_hook(
            capacity_bytes,
            Box::new(move |key, value| {
                debug!(group = %evicted_from, key, bytes = value.len(), "evicted entry");
            }),
        );
        Self {
            name,
            cache,
            loader,
            peers: RwLock::new(None),
            stats: GroupStats::default(),
        }
    }

    /// The group's registry name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current counter values.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Number of entries currently cached on this node.
    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }

    /// Route lookups for keys this node does not own through `picker`.
    pub fn set_peer_picker(&self, picker: Arc<dyn PeerPicker>) {
        *self.peers.write() = Some(picker);
    }

    /// Resolve `key` to its value.
    ///
    /// Fails only for an empty key or when the loader itself fails;
    /// remote trouble never surfaces here.
    pub async fn get(&self, key: &str) -> Result<ByteView, GroupError> {
        if key.is_empty() {
            return Err(GroupError::EmptyKey);
        }
        self.stats.gets.fetch_add(1, Ordering::Relaxed);

        if let Some(view) = self.cache.get(key) {
            self.stats.cache_hits.fetch_add(1, Ordering::Relaxed);
            debug!(group = %self.name, key, "cache hit");
            return Ok(view);
        }

        self.load(key).await
    }

    /// Miss path: the owning peer first, the loader as source of truth.
    async fn load(&self, key: &str) -> Result<ByteView, GroupError> {
        let picker = self.peers.read().clone();
        if let Some(picker) = picker {
            if let Some(peer) = picker.pick_peer(key) {
                match peer.fetch(&self.name, key).await {
                    Ok(bytes) => {
                        self.stats.peer_loads.fetch_add(1, Ordering::Relaxed);
                        debug!(group = %self.name, key, bytes = bytes.len(), "served by peer");
                        // The owner caches this key; a second copy here
                        // could go stale.
                        return Ok(ByteView::from(bytes));
                    }
                    Err(err) => {
                        self.stats.peer_errors.fetch_add(1, Ordering::Relaxed);
                        warn!(
                            group = %self.name,
                            key,
                            error = %err,
                            "peer fetch failed, falling back to loader"
                        );
                    }
                }
            }
        }

        let bytes = self.loader.load(key).await.map_err(|err| {
            self.stats.loader_errors.fetch_add(1, Ordering::Relaxed);
            GroupError::Loader(err)
        })?;
        self.stats.loader_loads.fetch_add(1, Ordering::Relaxed);

        let view = ByteView::from(bytes);
        self.populate_cache(key, view.clone());
        Ok(view)
    }

    fn populate_cache(&self, key: &str, value: ByteView) {
        self.cache.insert(key, value);
    }
}
