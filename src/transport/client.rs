//! Client half of the peer transport.

use async_trait::async_trait;
use reqwest::{Client, Url};

use crate::peers::PeerFetcher;
use crate::transport::BASE_PATH;

/// Fetches values from one remote node.
///
/// Stateless apart from the shared HTTP client; connection reuse is the
/// client's business, not a per-peer resource held here.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    base: Url,
    client: Client,
}

impl HttpFetcher {
    /// `addr` is the peer's base address, e.g. `http://10.0.0.2:8001`.
    pub fn new(addr: &str, client: Client) -> anyhow::Result<Self> {
        let base = Url::parse(addr)?;
        Ok(Self { base, client })
    }

    /// The request URL for (group, key). Both are pushed as single path
    /// segments, so a `/` inside the key is percent-encoded and survives
    /// the round trip intact.
    fn url_for(&self, group: &str, key: &str) -> anyhow::Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("peer address cannot be a base: {}", self.base))?
            .pop_if_empty()
            .push(BASE_PATH.trim_start_matches('/'))
            .push(group)
            .push(key);
        Ok(url)
    }
}

#[async_trait]
impl PeerFetcher for HttpFetcher {
    async fn fetch(&self, group: &str, key: &str) -> anyhow::Result<Vec<u8>> {
        let url = self.url_for(group, key)?;
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            anyhow::bail!("peer {} returned {}", self.base, response.status());
        }
        Ok(response.bytes().await?.to_vec())
    }
}
