//! LRU Cache Metrics
//!
//! Metrics specific to the LRU (Least Recently Used) cache algorithm.

use super::{CacheMetrics, CoreCacheMetrics};
use std::collections::BTreeMap;

/// LRU-specific metrics (extends CoreCacheMetrics)
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LruCacheMetrics {
    /// Core metrics common to all cache algorithms
    pub core: CoreCacheMetrics,

    /// Number of hits or overwrites that moved an entry to the most recently used end
    pub recency_promotions: u64,
}

impl LruCacheMetrics {
    /// Creates zeroed LRU metrics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an entry being moved to the most recently used end.
    #[inline]
    pub fn record_promotion(&mut self) {
        self.recency_promotions += 1;
    }

    /// Converts LRU metrics to a BTreeMap for reporting.
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = self.core.to_btreemap();
        metrics.insert(
            "recency_promotions".to_string(),
            self.recency_promotions as f64,
        );
        metrics
    }
}

impl CacheMetrics for LruCacheMetrics {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        "LRU"
    }
}
