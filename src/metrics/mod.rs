//! Cache Metrics System
//!
//! Every cache keeps a small set of counters that a caller can read back as a
//! `BTreeMap<String, f64>` through the [`CacheMetrics`] trait. A `BTreeMap` is
//! used so metrics always come out in the same order, which keeps benchmark
//! comparisons and test assertions reproducible.
//!
//! Counters are updated under whatever exclusive access the cache already
//! holds (`&mut self`, or the facade's lock), so they are plain integers.

use std::collections::BTreeMap;

pub mod lfu;
pub mod lru;

pub use lfu::LfuCacheMetrics;
pub use lru::LruCacheMetrics;

/// Common metrics tracked by all cache algorithms
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CoreCacheMetrics {
    /// Total number of lookups (`get`/`get_mut`) made to the cache
    pub requests: u64,

    /// Number of lookups that found their key
    pub cache_hits: u64,

    /// Number of new keys inserted
    pub insertions: u64,

    /// Number of `put` calls that overwrote an existing key
    pub updates: u64,

    /// Number of entries evicted to make room for a new key
    pub evictions: u64,

    /// Number of entries removed explicitly
    pub removals: u64,
}

impl CoreCacheMetrics {
    /// Creates zeroed metrics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a lookup that found its key.
    #[inline]
    pub fn record_hit(&mut self) {
        self.requests += 1;
        self.cache_hits += 1;
    }

    /// Records a lookup that found nothing.
    #[inline]
    pub fn record_miss(&mut self) {
        self.requests += 1;
    }

    /// Records a new key being stored.
    #[inline]
    pub fn record_insertion(&mut self) {
        self.insertions += 1;
    }

    /// Records an existing key's value being replaced.
    #[inline]
    pub fn record_update(&mut self) {
        self.updates += 1;
    }

    /// Records a capacity eviction.
    #[inline]
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// Records an explicit removal.
    #[inline]
    pub fn record_removal(&mut self) {
        self.removals += 1;
    }

    /// Number of lookups that missed.
    #[inline]
    pub fn cache_misses(&self) -> u64 {
        self.requests - self.cache_hits
    }

    /// Fraction of lookups that hit, between 0.0 and 1.0 (0.0 with no lookups).
    pub fn hit_rate(&self) -> f64 {
        if self.requests > 0 {
            self.cache_hits as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Fraction of lookups that missed, between 0.0 and 1.0 (0.0 with no lookups).
    pub fn miss_rate(&self) -> f64 {
        if self.requests > 0 {
            self.cache_misses() as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Converts core metrics to a BTreeMap for reporting.
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = BTreeMap::new();

        metrics.insert("cache_hits".to_string(), self.cache_hits as f64);
        metrics.insert("cache_misses".to_string(), self.cache_misses() as f64);
        metrics.insert("evictions".to_string(), self.evictions as f64);
        metrics.insert("insertions".to_string(), self.insertions as f64);
        metrics.insert("removals".to_string(), self.removals as f64);
        metrics.insert("requests".to_string(), self.requests as f64);
        metrics.insert("updates".to_string(), self.updates as f64);

        metrics.insert("hit_rate".to_string(), self.hit_rate());
        metrics.insert("miss_rate".to_string(), self.miss_rate());

        if self.requests > 0 {
            metrics.insert(
                "eviction_rate".to_string(),
                self.evictions as f64 / self.requests as f64,
            );
        }

        metrics
    }
}

/// Uniform read access to a cache's metrics.
///
/// Lets a benchmark harness collect and compare hit rates across policies
/// without knowing which policy it is holding.
pub trait CacheMetrics {
    /// Returns all metrics as key-value pairs in deterministic order.
    fn metrics(&self) -> BTreeMap<String, f64>;

    /// Algorithm name for identification ("LRU" or "LFU").
    fn algorithm_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rates_with_no_requests() {
        let metrics = CoreCacheMetrics::new();
        assert_eq!(metrics.hit_rate(), 0.0);
        assert_eq!(metrics.miss_rate(), 0.0);
        assert!(!metrics.to_btreemap().contains_key("eviction_rate"));
    }

    #[test]
    fn test_hit_and_miss_accounting() {
        let mut metrics = CoreCacheMetrics::new();
        metrics.record_hit();
        metrics.record_hit();
        metrics.record_hit();
        metrics.record_miss();
        metrics.record_eviction();

        assert_eq!(metrics.requests, 4);
        assert_eq!(metrics.cache_misses(), 1);
        assert_eq!(metrics.hit_rate(), 0.75);
        assert_eq!(metrics.miss_rate(), 0.25);

        let map = metrics.to_btreemap();
        assert_eq!(map.get("cache_hits"), Some(&3.0));
        assert_eq!(map.get("eviction_rate"), Some(&0.25));
    }

    #[test]
    fn test_btreemap_order_is_stable() {
        let keys: Vec<_> = CoreCacheMetrics::new().to_btreemap().into_keys().collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }
}
