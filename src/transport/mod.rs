//! HTTP peer transport.
//!
//! Moves (group, key) values between nodes under a fixed path convention:
//! - [`server`]: the route every node exposes for peer lookups
//! - [`client`]: fetches a value from one specific remote node
//! - [`pool`]: consistent-hash routing over the configured peer set

pub mod client;
pub mod pool;
pub mod server;

/// Path prefix reserved for node-to-node traffic.
pub const BASE_PATH: &str = "/_peercache";
