//! Read-through TTL cache shared by the adapters.

use std::time::{Duration, Instant};

use dashmap::DashMap;

/// One cached lookup. `value` is `None` for a cached "not found".
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub value: Option<V>,
    pub fetched_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() < ttl
    }
}

/// Concurrent map from lookup key to [`CacheEntry`], with a fixed TTL.
///
/// Thread-safe via `DashMap`; expired entries are evicted lazily on read.
#[derive(Debug)]
pub struct TtlCache<V> {
    entries: DashMap<String, CacheEntry<V>>,
    ttl: Duration,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// `Some(Some(v))` for a cached value, `Some(None)` for a cached miss,
    /// `None` when nothing fresh is cached.
    pub fn get(&self, key: &str) -> Option<Option<V>> {
        let fresh = self.entries.get(key).and_then(|entry| {
            entry.is_fresh(self.ttl).then(|| entry.value.clone())
        });
        if fresh.is_none() {
            self.entries.remove_if(key, |_, entry| !entry.is_fresh(self.ttl));
        }
        fresh
    }

    pub fn insert(&self, key: impl Into<String>, value: Option<V>) {
        self.entries.insert(
            key.into(),
            CacheEntry {
                value,
                fetched_at: Instant::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Remove expired entries eagerly.
    pub fn purge_expired(&self) {
        self.entries.retain(|_, entry| entry.is_fresh(self.ttl));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caches_values_and_misses() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("a", Some(1));
        cache.insert("b", None);
        assert_eq!(cache.get("a"), Some(Some(1)));
        assert_eq!(cache.get("b"), Some(None));
        assert_eq!(cache.get("c"), None);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn zero_ttl_never_serves() {
        let cache = TtlCache::new(Duration::ZERO);
        cache.insert("a", Some(1));
        assert_eq!(cache.get("a"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn purge_and_clear() {
        let cache: TtlCache<u8> = TtlCache::new(Duration::ZERO);
        cache.insert("a", Some(1));
        cache.insert("b", Some(2));
        cache.purge_expired();
        assert!(cache.is_empty());

        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("a", Some(1));
        cache.clear();
        assert!(cache.is_empty());
    }
}
