//! peercache node binary.
//!
//! Wires flags and config into a running node: one cache group backed by
//! a toy in-process store, the peer transport for the rest of the
//! cluster, and the front-facing read API, all served from one listener.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use peercache::api::{self, ApiState};
use peercache::config::{Cli, Config};
use peercache::group::registry::GroupRegistry;
use peercache::group::LoaderFn;
use peercache::transport::{self, pool::HttpPool};

/// Toy backing store standing in for a real database.
fn sample_store() -> HashMap<&'static str, &'static str> {
    HashMap::from([("Tom", "630"), ("Jack", "589"), ("Sam", "567")])
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments.
    let cli = Cli::parse();

    // Initialize tracing/logging.
    let filter = if cli.verbose {
        "peercache=debug,tower_http=debug"
    } else {
        "peercache=info,tower_http=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with_target(true)
        .init();

    info!("peercache v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration; the CLI may override the addresses so several
    // nodes can share one config file.
    let mut config = Config::load(&cli.config)?;
    if let Some(listen) = cli.listen {
        config.server.listen = listen;
    }
    if let Some(self_addr) = cli.self_addr {
        config.cluster.self_addr = self_addr;
    }

    info!(
        listen = %config.server.listen,
        self_addr = %config.cluster.self_addr,
        peers = config.cluster.peers.len(),
        capacity_bytes = config.cache.capacity_bytes,
        "Configuration loaded"
    );

    // Register the cache group over the toy store.
    let registry = Arc::new(GroupRegistry::new());
    let store = sample_store();
    let group = registry.new_group(
        "scores",
        config.cache.capacity_bytes,
        Arc::new(LoaderFn(move |key: &str| {
            info!(key, "slow store lookup");
            store
                .get(key)
                .map(|value| value.as_bytes().to_vec())
                .ok_or_else(|| anyhow::anyhow!("{key} not exist"))
        })),
    )?;

    // Wire the group to the rest of the cluster.
    let pool = Arc::new(HttpPool::new(
        config.cluster.self_addr.clone(),
        config.cluster.replicas,
        Duration::from_secs(config.cluster.fetch_timeout_secs),
    )?);
    pool.set_peers(config.cluster.peers.iter().cloned())?;
    group.set_peer_picker(pool);

    // Peer transport and front API share the listener.
    let api_state = Arc::new(ApiState {
        registry: registry.clone(),
        group_name: group.name().to_string(),
        start_time: Instant::now(),
    });

    let app = transport::server::build_router(registry)
        .merge(api::build_router(api_state))
        .layer(TraceLayer::new_for_http());

    let listen_addr = config.server.listen.clone();
    info!(addr = %listen_addr, "Starting server");

    let listener = TcpListener::bind(&listen_addr).await?;
    info!("Listening on {listen_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
