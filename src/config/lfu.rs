//! Configuration for the Least Frequently Used cache with aging.
//!
//! Besides the capacity, an LFU cache takes an `aging_threshold`: whenever the
//! average access frequency of the live entries rises above it, every
//! frequency is reduced so that entries which were hot long ago cannot crowd
//! out entries that are hot now.
//!
//! Aging is disabled by picking a threshold the average can never exceed,
//! which is what [`LfuCacheConfig::without_aging`] does. The two
//! configurations share one code path.
//!
//! # Examples
//!
//! ```
//! use agecache::config::LfuCacheConfig;
//! use agecache::LfuCache;
//!
//! // Decay once the average frequency goes above 8
//! let config = LfuCacheConfig {
//!     capacity: 100,
//!     aging_threshold: 8,
//! };
//! let cache: LfuCache<String, i32> = LfuCache::init(config, None).unwrap();
//! assert_eq!(cache.aging_threshold(), 8);
//!
//! // Plain LFU
//! let config = LfuCacheConfig::without_aging(100);
//! assert_eq!(config.aging_threshold, u64::MAX);
//! ```

use crate::error::{ConfigurationError, Result};
use core::fmt;

/// Aging threshold used by [`LfuCacheConfig::new`].
pub const DEFAULT_AGING_THRESHOLD: u64 = 10;

/// Configuration for an LFU cache with aging.
///
/// # Fields
///
/// - `capacity`: Maximum number of entries held before eviction begins. Must be
///   at least 1.
/// - `aging_threshold`: Average-frequency trip point for an aging pass. Must be
///   at least 1; `u64::MAX` disables aging.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct LfuCacheConfig {
    /// Maximum number of key-value pairs the cache can hold
    pub capacity: usize,
    /// Aging runs when the average frequency exceeds this value
    pub aging_threshold: u64,
}

impl LfuCacheConfig {
    /// Creates a config with [`DEFAULT_AGING_THRESHOLD`].
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            aging_threshold: DEFAULT_AGING_THRESHOLD,
        }
    }

    /// Creates a config whose aging threshold can never be reached.
    #[must_use]
    pub fn without_aging(capacity: usize) -> Self {
        Self {
            capacity,
            aging_threshold: u64::MAX,
        }
    }

    /// Sets the aging threshold.
    #[must_use]
    pub fn with_aging_threshold(mut self, aging_threshold: u64) -> Self {
        self.aging_threshold = aging_threshold;
        self
    }

    /// Returns `true` unless aging has been disabled with `u64::MAX`.
    #[inline]
    pub fn aging_enabled(&self) -> bool {
        self.aging_threshold != u64::MAX
    }

    /// Checks that both the capacity and the aging threshold are at least 1.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(ConfigurationError::ZeroCapacity);
        }
        if self.aging_threshold == 0 {
            return Err(ConfigurationError::ZeroAgingThreshold);
        }
        Ok(())
    }
}

impl fmt::Debug for LfuCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LfuCacheConfig")
            .field("capacity", &self.capacity)
            .field("aging_threshold", &self.aging_threshold)
            .finish()
    }
}
