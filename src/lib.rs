#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! # Code Reference
//!
//! ## Algorithm Selection Guide
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                  Which eviction policy should I use?                 │
//! ├──────────────────────────────────────────────────────────────────────┤
//! │                                                                      │
//! │  ┌─────────────────┐                                                 │
//! │  │ Recency-based?  │──Yes──▶ ┌──────────┐                            │
//! │  │ (recent = hot)  │         │   LRU    │                            │
//! │  └────────┬────────┘         └──────────┘                            │
//! │          No                                                          │
//! │           ▼                                                          │
//! │  ┌─────────────────┐                                                 │
//! │  │ Frequency-based?│──Yes──▶ Does popularity drift over time?        │
//! │  │ (popular = hot) │              │                                  │
//! │  └─────────────────┘         Yes  │  No                              │
//! │                               ▼   ▼                                  │
//! │              ┌──────────────────┐ ┌──────────────────────────┐       │
//! │              │ LFU (aging on)   │ │ LFU (threshold u64::MAX) │       │
//! │              └──────────────────┘ └──────────────────────────┘       │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Reference
//!
//! | Type | Description | Thread-safe |
//! |------|-------------|-------------|
//! | [`LruCache`] | Least Recently Used | No |
//! | [`LfuCache`] | Least Frequently Used with aging | No |
//! | [`ConcurrentCache`] | Either policy behind one lock | Yes |
//!
//! | Policy | Get | Put | Remove | Notes |
//! |--------|-----|-----|--------|-------|
//! | LRU    | O(1)| O(1)| O(1)   | |
//! | LFU    | O(log F) | O(log F) | O(log F) | F = distinct frequencies; aging pass is O(n) |
//!
//! ## Code Examples
//!
//! ### LRU (Least Recently Used)
//!
//! ```rust
//! use agecache::LruCache;
//! use agecache::config::LruCacheConfig;
//!
//! let mut cache = LruCache::init(LruCacheConfig { capacity: 2 }, None).unwrap();
//! cache.put("a", 1);
//! cache.put("b", 2);
//! cache.get(&"a");      // "a" is now most recently used
//! cache.put("c", 3);    // Evicts "b"
//! assert!(cache.get(&"b").is_none());
//! ```
//!
//! ### LFU with aging
//!
//! ```rust
//! use agecache::LfuCache;
//! use agecache::config::LfuCacheConfig;
//!
//! let config = LfuCacheConfig { capacity: 2, aging_threshold: 10 };
//! let mut cache = LfuCache::init(config, None).unwrap();
//! cache.put("rare", 1);
//! cache.put("popular", 2);
//! for _ in 0..5 {
//!     cache.get(&"popular");
//! }
//! cache.put("new", 3);  // Evicts "rare" (frequency 1)
//! assert!(cache.get(&"popular").is_some());
//! ```
//!
//! ### Metrics
//!
//! ```rust
//! use agecache::LruCache;
//! use agecache::metrics::CacheMetrics;
//!
//! let mut cache = LruCache::new(10).unwrap();
//! cache.put(1, "one");
//! cache.get(&1);
//! cache.get(&2);
//!
//! let metrics = cache.metrics();
//! assert_eq!(metrics.get("hit_rate"), Some(&0.5));
//! assert_eq!(cache.algorithm_name(), "LRU");
//! ```
//!
//! ## Modules
//!
//! - [`lru`]: Least Recently Used cache implementation
//! - [`lfu`]: Least Frequently Used cache with aging
//! - [`policy`]: The get/put contract both policies implement
//! - [`concurrent`]: Thread-safe facade
//! - [`config`]: Configuration structures
//! - [`error`]: Construction errors
//! - [`metrics`]: Metrics collection for cache performance monitoring

/// Slot table that owns every list node.
pub(crate) mod arena;

/// Sentinel-bounded doubly linked list over the node arena.
///
/// Internal infrastructure; use the cache types instead.
pub(crate) mod list;

/// Frequency-tracked cache entry.
pub mod entry;

/// Construction errors.
pub mod error;

/// Cache configuration structures.
///
/// Provides configuration structures for every cache type.
pub mod config;

/// Least Recently Used (LRU) cache implementation.
///
/// Provides a fixed-size cache that evicts the least recently used items when
/// the capacity is reached.
pub mod lru;

/// Least Frequently Used (LFU) cache implementation with aging.
///
/// Provides a fixed-size cache that evicts the least frequently used items
/// when capacity is reached, and periodically decays frequencies so that
/// formerly hot items do not stay forever.
pub mod lfu;

/// The eviction-policy trait and policy identifiers.
pub mod policy;

/// Cache metrics system.
///
/// Each cache tracks hit, miss, and eviction counters plus policy-specific
/// ones, and reports them through a common interface.
pub mod metrics;

/// Thread-safe cache facade.
///
/// Wraps either policy behind a single `parking_lot::Mutex`.
pub mod concurrent;

pub use concurrent::ConcurrentCache;
pub use config::CacheConfig;
pub use entry::CacheEntry;
pub use error::ConfigurationError;
pub use lfu::LfuCache;
pub use lru::LruCache;
pub use policy::{CachePolicy, PolicyKind};
