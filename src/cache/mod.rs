//! Node-local cache storage.
//!
//! This module contains the core cache data structures:
//! - [`view`]: immutable byte snapshots handed to callers
//! - [`lru`]: byte-budgeted LRU store (single-threaded core)
//! - [`guarded`]: the lock that makes it safe to share

pub mod guarded;
pub mod lru;
pub mod view;
