//! Runtime configuration for peercache.
//!
//! Configuration is loaded from a JSON file or constructed
//! programmatically. All knobs (listen address, cache budget, cluster
//! membership, peer fetch behavior) live here.

use std::path::PathBuf;

use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::ring::DEFAULT_REPLICAS;

/// Command-line arguments.
#[derive(Parser, Debug, Clone)]
#[command(name = "peercache", about = "Clustered read-through cache node")]
pub struct Cli {
    /// Path to configuration file (JSON).
    #[arg(short, long, default_value = "config.json")]
    pub config: PathBuf,

    /// Override the configured listen address (e.g. "127.0.0.1:8002").
    #[arg(long)]
    pub listen: Option<String>,

    /// Override this node's advertised address (e.g. "http://127.0.0.1:8002").
    #[arg(long)]
    pub self_addr: Option<String>,

    /// Enable verbose logging.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,

    /// Cache sizing.
    pub cache: CacheConfig,

    /// Cluster membership and peer fetch behavior.
    pub cluster: ClusterConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            cache: CacheConfig::default(),
            cluster: ClusterConfig::default(),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address (e.g. "127.0.0.1:8001").
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:8001".to_string(),
        }
    }
}

/// Cache sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Byte budget per group; zero or below disables eviction.
    pub capacity_bytes: i64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity_bytes: 2 << 10,
        }
    }
}

/// Cluster membership and peer fetch behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// This node's advertised base address, exactly as listed in `peers`.
    pub self_addr: String,

    /// Every node in the cluster, this one included. Fixed at startup.
    pub peers: Vec<String>,

    /// Hash positions per node on the ring.
    pub replicas: usize,

    /// Peer fetch timeout in seconds; expiry counts as a remote failure.
    pub fetch_timeout_secs: u64,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            self_addr: "http://127.0.0.1:8001".to_string(),
            peers: vec!["http://127.0.0.1:8001".to_string()],
            replicas: DEFAULT_REPLICAS,
            fetch_timeout_secs: 2,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file, falling back to defaults when
    /// the file does not exist.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        if path.exists() {
            let data = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&data)?;
            Ok(config)
        } else {
            tracing::warn!("Config file not found at {:?}, using defaults", path);
            Ok(Config::default())
        }
    }
}
