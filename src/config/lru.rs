//! Configuration for the Least Recently Used (LRU) cache.
//!
//! # Examples
//!
//! ```
//! use agecache::config::LruCacheConfig;
//! use agecache::LruCache;
//!
//! let config = LruCacheConfig { capacity: 1000 };
//! let cache: LruCache<String, i32> = LruCache::init(config, None).unwrap();
//! assert_eq!(cache.cap(), 1000);
//! ```

use crate::error::{ConfigurationError, Result};
use core::fmt;

/// Configuration for an LRU (Least Recently Used) cache.
///
/// # Fields
///
/// - `capacity`: Maximum number of entries held before eviction begins. Must be
///   at least 1.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct LruCacheConfig {
    /// Maximum number of key-value pairs the cache can hold
    pub capacity: usize,
}

impl LruCacheConfig {
    /// Creates a config with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Checks that the capacity is at least 1.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(ConfigurationError::ZeroCapacity);
        }
        Ok(())
    }
}

impl fmt::Debug for LruCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCacheConfig")
            .field("capacity", &self.capacity)
            .finish()
    }
}
