//! peercache: a clustered read-through cache.
//!
//! Each node caches a disjoint slice of the keyspace under a byte budget;
//! any node can answer any key by serving it locally, asking the owning
//! peer, or falling back to the group's loader:
//!
//! ```text
//! Group::get(key)
//!   ├─ local LRU cache ──── hit ───────────────► ByteView
//!   ├─ ring says a peer owns it ── peer fetch ─► ByteView (not re-cached)
//!   └─ loader ──── success ── cached locally ──► ByteView
//! ```
//!
//! - [`cache`]: byte-budgeted LRU storage and the views it hands out
//! - [`group`]: named cache namespaces and the resolution policy
//! - [`ring`]: consistent-hash key-to-node mapping
//! - [`transport`]: HTTP client/server moving values between nodes
//! - [`peers`]: capabilities wiring groups to the transport
//! - [`api`]: front-facing read endpoint and monitoring routes

pub mod api;
pub mod cache;
pub mod config;
pub mod group;
pub mod peers;
pub mod ring;
pub mod transport;
