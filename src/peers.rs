//! Capabilities for locating and querying peer nodes.
//!
//! Groups depend on these traits rather than on the HTTP transport
//! directly, so tests (and future transports) can substitute their own
//! implementations.

use std::sync::Arc;

use async_trait::async_trait;

/// Fetches a (group, key) value from one specific remote node.
#[async_trait]
pub trait PeerFetcher: Send + Sync {
    /// The raw bytes for `key` in `group`, as served by the peer.
    async fn fetch(&self, group: &str, key: &str) -> anyhow::Result<Vec<u8>>;
}

/// Maps a key to the peer that owns it.
pub trait PeerPicker: Send + Sync {
    /// A fetcher for the owning node, or `None` when the local node owns
    /// the key (or no peers are configured).
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerFetcher>>;
}
