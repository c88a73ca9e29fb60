//! Concurrency-safe wrapper around [`LruCache`].

use parking_lot::Mutex;

use crate::cache::lru::{EvictHook, LruCache};
use crate::cache::view::ByteView;

/// Serializes every operation on an inner [`LruCache`].
///
/// There is no reader/writer split to exploit: a lookup promotes the entry
/// in the recency order, so every access mutates the structure. Each
/// operation holds the lock for its full O(1) duration and never across
/// I/O. The inner cache is built lazily on the first insert, letting a
/// group be declared with a capacity before any traffic arrives.
pub struct GuardedCache {
    capacity: i64,
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    cache: Option<LruCache>,
    // Handed to the LruCache when it is first built.
    evict_hook: Option<EvictHook>,
}

impl GuardedCache {
    /// A guarded cache with the given byte budget.
    pub fn new(capacity: i64) -> Self {
        Self {
            capacity,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Like [`new`](Self::new), with an eviction hook for observability.
    pub fn with_evict_hook(capacity: i64, hook: EvictHook) -> Self {
        Self {
            capacity,
            inner: Mutex::new(Inner {
                cache: None,
                evict_hook: Some(hook),
            }),
        }
    }

    /// Look up a key, promoting it on hit.
    pub fn get(&self, key: &str) -> Option<ByteView> {
        let mut inner = self.inner.lock();
        inner.cache.as_mut()?.get(key)
    }

    /// Insert or replace a value, evicting as needed.
    pub fn insert(&self, key: &str, value: ByteView) {
        let mut inner = self.inner.lock();
        if inner.cache.is_none() {
            let cache = match inner.evict_hook.take() {
                Some(hook) => LruCache::with_evict_hook(self.capacity, hook),
                None => LruCache::new(self.capacity),
            };
            inner.cache = Some(cache);
        }
        if let Some(cache) = inner.cache.as_mut() {
            cache.insert(key, value);
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.inner.lock().cache.as_ref().map_or(0, LruCache::len)
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_lazy_construction() {
        let cache = GuardedCache::new(64);
        // No traffic yet: nothing is built, lookups simply miss.
        assert!(cache.get("k").is_none());
        assert_eq!(cache.len(), 0);

        cache.insert("k", ByteView::from("v"));
        assert_eq!(cache.get("k").unwrap().to_vec(), b"v");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_budget_enforced_through_the_guard() {
        let cache = GuardedCache::new(8);
        cache.insert("k1", ByteView::from("v1"));
        cache.insert("k2", ByteView::from("v2"));
        cache.insert("k3", ByteView::from("v3"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_concurrent_access() {
        let cache = Arc::new(GuardedCache::new(0));

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cache = cache.clone();
                thread::spawn(move || {
                    for i in 0..100 {
                        let key = format!("key-{t}-{i}");
                        cache.insert(&key, ByteView::from(vec![t as u8; 16]));
                        assert!(cache.get(&key).is_some());
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.len(), 800);
    }
}
