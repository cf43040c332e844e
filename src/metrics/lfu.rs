//! LFU Cache Metrics
//!
//! Metrics specific to the LFU cache with aging: how often frequencies were
//! bumped, how often the aging pass ran, and the current frequency spread.

use super::{CacheMetrics, CoreCacheMetrics};
use std::collections::BTreeMap;

/// LFU-specific metrics (extends CoreCacheMetrics)
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LfuCacheMetrics {
    /// Core metrics common to all cache algorithms
    pub core: CoreCacheMetrics,

    /// Total number of frequency increments (every hit and overwrite bumps one)
    pub frequency_increments: u64,

    /// Number of aging passes run
    pub aging_passes: u64,

    /// Total number of entries whose frequency was lowered by aging
    pub entries_decayed: u64,

    /// Current minimum frequency in the cache (0 when empty)
    pub min_frequency: u64,

    /// Highest frequency reached since the last aging pass
    pub max_frequency: u64,

    /// Number of frequency buckets currently in use
    pub active_frequency_levels: u64,
}

impl LfuCacheMetrics {
    /// Creates zeroed LFU metrics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a frequency bump to `new_frequency`.
    #[inline]
    pub fn record_frequency_increment(&mut self, new_frequency: u64) {
        self.frequency_increments += 1;
        if new_frequency > self.max_frequency {
            self.max_frequency = new_frequency;
        }
    }

    /// Records one aging pass that lowered `decayed` entries.
    #[inline]
    pub fn record_aging(&mut self, decayed: u64, max_frequency: u64) {
        self.aging_passes += 1;
        self.entries_decayed += decayed;
        self.max_frequency = max_frequency;
    }

    /// Refreshes the bucket summary after a structural change.
    #[inline]
    pub fn update_frequency_levels(&mut self, min_frequency: Option<u64>, levels: usize) {
        self.min_frequency = min_frequency.unwrap_or(0);
        self.active_frequency_levels = levels as u64;
    }

    /// Zeroes the frequency gauges after the cache was emptied.
    ///
    /// Counters such as `aging_passes` keep their totals.
    #[inline]
    pub fn reset_frequency_levels(&mut self) {
        self.min_frequency = 0;
        self.max_frequency = 0;
        self.active_frequency_levels = 0;
    }

    /// Average number of increments per hit, or 0.0 with no hits.
    pub fn increments_per_hit(&self) -> f64 {
        if self.core.cache_hits > 0 {
            self.frequency_increments as f64 / self.core.cache_hits as f64
        } else {
            0.0
        }
    }

    /// Converts LFU metrics to a BTreeMap for reporting.
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = self.core.to_btreemap();

        metrics.insert(
            "active_frequency_levels".to_string(),
            self.active_frequency_levels as f64,
        );
        metrics.insert("aging_passes".to_string(), self.aging_passes as f64);
        metrics.insert("entries_decayed".to_string(), self.entries_decayed as f64);
        metrics.insert(
            "frequency_increments".to_string(),
            self.frequency_increments as f64,
        );
        metrics.insert(
            "increments_per_hit".to_string(),
            self.increments_per_hit(),
        );
        metrics.insert("max_frequency".to_string(), self.max_frequency as f64);
        metrics.insert("min_frequency".to_string(), self.min_frequency as f64);

        metrics
    }
}

impl CacheMetrics for LfuCacheMetrics {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        "LFU"
    }
}
