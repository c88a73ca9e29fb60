//! Peer routing: consistent-hash selection over the configured node set.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use reqwest::Client;
use tracing::info;

use crate::peers::{PeerFetcher, PeerPicker};
use crate::ring::Ring;
use crate::transport::client::HttpFetcher;

/// Routes keys to the nodes that own them.
///
/// Holds the ring plus one fetcher per remote peer. Reconfiguration
/// builds a fresh ring and fetcher table off to the side and publishes
/// them in a single swap, so lookups never observe a half-updated view.
pub struct HttpPool {
    self_addr: String,
    replicas: usize,
    client: Client,
    routes: RwLock<Routes>,
}

struct Routes {
    ring: Ring,
    fetchers: HashMap<String, Arc<HttpFetcher>>,
}

impl HttpPool {
    /// `self_addr` is this node's own base address exactly as it appears
    /// in the peer list, e.g. `http://10.0.0.1:8001`.
    ///
    /// Every peer fetch is bounded by `fetch_timeout`; expiry counts as a
    /// remote failure like any other.
    pub fn new(
        self_addr: impl Into<String>,
        replicas: usize,
        fetch_timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(fetch_timeout).build()?;
        Ok(Self {
            self_addr: self_addr.into(),
            replicas,
            client,
            routes: RwLock::new(Routes {
                ring: Ring::empty(replicas),
                fetchers: HashMap::new(),
            }),
        })
    }

    /// Replace the node set wholesale.
    ///
    /// The list must include this node's own address so the ring can
    /// assign keys to it; no fetcher is built for self.
    pub fn set_peers<I, S>(&self, peers: I) -> anyhow::Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let peers: Vec<String> = peers.into_iter().map(Into::into).collect();
        let ring = Ring::new(self.replicas, peers.iter().cloned());

        let mut fetchers = HashMap::new();
        for peer in &peers {
            if *peer == self.self_addr {
                continue;
            }
            fetchers.insert(
                peer.clone(),
                Arc::new(HttpFetcher::new(peer, self.client.clone())?),
            );
        }

        info!(
            nodes = peers.len(),
            remote = fetchers.len(),
            "peer set configured"
        );
        *self.routes.write() = Routes { ring, fetchers };
        Ok(())
    }
}

impl PeerPicker for HttpPool {
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerFetcher>> {
        let routes = self.routes.read();
        let node = routes.ring.pick_node(key)?;
        if node == self.self_addr {
            return None;
        }
        routes
            .fetchers
            .get(node)
            .map(|fetcher| fetcher.clone() as Arc<dyn PeerFetcher>)
    }
}
