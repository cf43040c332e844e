//! Cache Configuration Module
//!
//! Configuration structs have public fields for simple instantiation and a
//! `validate()` method that the cache constructors call before building
//! anything.
//!
//! | Config | Cache | Description |
//! |--------|-------|-------------|
//! | `LruCacheConfig` | [`LruCache`](crate::LruCache) | Least Recently Used |
//! | `LfuCacheConfig` | [`LfuCache`](crate::LfuCache) | Least Frequently Used with aging |
//! | `CacheConfig` | [`ConcurrentCache`](crate::ConcurrentCache) | Either of the above, chosen at runtime |
//!
//! # Examples
//!
//! ```
//! use agecache::config::{CacheConfig, LfuCacheConfig};
//! use agecache::ConcurrentCache;
//!
//! let config = CacheConfig::Lfu(LfuCacheConfig::new(1000).with_aging_threshold(16));
//! let cache: ConcurrentCache<String, i32> = ConcurrentCache::init(config, None).unwrap();
//! assert_eq!(cache.capacity(), 1000);
//! ```

pub mod lfu;
pub mod lru;

pub use lfu::{LfuCacheConfig, DEFAULT_AGING_THRESHOLD};
pub use lru::LruCacheConfig;

use crate::error::Result;

/// Eviction policy selection for [`ConcurrentCache`](crate::ConcurrentCache).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheConfig {
    /// Least Recently Used
    Lru(LruCacheConfig),
    /// Least Frequently Used with aging
    Lfu(LfuCacheConfig),
}

impl CacheConfig {
    /// Returns the configured capacity.
    pub fn capacity(&self) -> usize {
        match self {
            CacheConfig::Lru(config) => config.capacity,
            CacheConfig::Lfu(config) => config.capacity,
        }
    }

    /// Validates the wrapped config.
    pub fn validate(&self) -> Result<()> {
        match self {
            CacheConfig::Lru(config) => config.validate(),
            CacheConfig::Lfu(config) => config.validate(),
        }
    }
}

impl From<LruCacheConfig> for CacheConfig {
    fn from(config: LruCacheConfig) -> Self {
        CacheConfig::Lru(config)
    }
}

impl From<LfuCacheConfig> for CacheConfig {
    fn from(config: LfuCacheConfig) -> Self {
        CacheConfig::Lfu(config)
    }
}
