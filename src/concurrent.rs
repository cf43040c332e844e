//! Thread-safe cache facade.
//!
//! [`ConcurrentCache`] wraps one eviction engine, chosen at construction, in a
//! single `parking_lot::Mutex`. Every public call takes the lock for its whole
//! duration, so a lookup and the structural update it causes are one atomic
//! step.
//!
//! ## Why Mutex Instead of RwLock?
//!
//! Both policies mutate state on every hit: LRU moves the entry to the most
//! recently used end, LFU moves it to the next frequency bucket and may run an
//! aging pass. A read lock would never be enough, so `get` takes the same
//! exclusive lock as `put`.
//!
//! The lock is held for one list splice per call. An LFU hit that trips the
//! aging threshold also walks every entry once (O(capacity)) while holding it;
//! callers should expect that as an occasional latency spike.
//!
//! # Example
//!
//! ```
//! use agecache::concurrent::ConcurrentCache;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let cache = Arc::new(ConcurrentCache::lfu(1000, 10).unwrap());
//!
//! let handles: Vec<_> = (0..4)
//!     .map(|t| {
//!         let cache = Arc::clone(&cache);
//!         thread::spawn(move || {
//!             for i in 0..100 {
//!                 cache.put(t * 1000 + i, i);
//!                 cache.get(&(t * 1000 + i));
//!             }
//!         })
//!     })
//!     .collect();
//!
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! assert_eq!(cache.len(), 400);
//! ```

use crate::config::{CacheConfig, LfuCacheConfig, LruCacheConfig};
use crate::error::Result;
use crate::lfu::LfuSegment;
use crate::lru::LruSegment;
use crate::metrics::CacheMetrics;
use crate::policy::PolicyKind;
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use parking_lot::Mutex;
use std::collections::BTreeMap;

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;

/// The engine a facade runs, fixed at construction.
#[derive(Debug)]
enum Engine<K, V, S> {
    Lru(LruSegment<K, V, S>),
    Lfu(LfuSegment<K, V, S>),
}

/// A fixed-capacity cache that can be shared between threads.
///
/// All methods take `&self`; wrap the cache in an `Arc` to share it.
/// Values are returned by clone from [`get`](Self::get), or borrowed for the
/// duration of a closure with [`get_with`](Self::get_with).
#[derive(Debug)]
pub struct ConcurrentCache<K, V, S = DefaultHashBuilder> {
    engine: Mutex<Engine<K, V, S>>,
    policy: PolicyKind,
    capacity: usize,
}

impl<K: Hash + Eq, V> ConcurrentCache<K, V, DefaultHashBuilder> {
    /// Creates a cache from a configuration with an optional hasher.
    ///
    /// The variant of `config` picks the policy. If `hasher` is `None`, the
    /// default hash builder is used.
    ///
    /// # Example
    ///
    /// ```
    /// use agecache::concurrent::ConcurrentCache;
    /// use agecache::config::{CacheConfig, LfuCacheConfig};
    /// use agecache::policy::PolicyKind;
    ///
    /// let config = CacheConfig::Lfu(LfuCacheConfig::without_aging(64));
    /// let cache: ConcurrentCache<u64, String> = ConcurrentCache::init(config, None).unwrap();
    /// assert_eq!(cache.policy(), PolicyKind::Lfu);
    /// assert_eq!(cache.aging_threshold(), Some(u64::MAX));
    /// ```
    pub fn init(config: CacheConfig, hasher: Option<DefaultHashBuilder>) -> Result<Self> {
        Self::init_with_hasher(config, hasher.unwrap_or_default())
    }

    /// Creates an LRU cache holding at most `capacity` entries.
    pub fn lru(capacity: usize) -> Result<Self> {
        Self::init(CacheConfig::Lru(LruCacheConfig::new(capacity)), None)
    }

    /// Creates an LFU cache that ages once the average frequency exceeds
    /// `aging_threshold`.
    pub fn lfu(capacity: usize, aging_threshold: u64) -> Result<Self> {
        let config = LfuCacheConfig {
            capacity,
            aging_threshold,
        };
        Self::init(CacheConfig::Lfu(config), None)
    }

    /// Creates a plain LFU cache that never ages.
    pub fn lfu_without_aging(capacity: usize) -> Result<Self> {
        Self::init(CacheConfig::Lfu(LfuCacheConfig::without_aging(capacity)), None)
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> ConcurrentCache<K, V, S> {
    /// Creates a cache from a configuration with a custom hash builder.
    ///
    /// Use this for deterministic hashing or DoS-resistant hashers.
    pub fn init_with_hasher(config: CacheConfig, hash_builder: S) -> Result<Self> {
        let capacity = config.capacity();
        let (engine, policy) = match config {
            CacheConfig::Lru(config) => (
                Engine::Lru(LruSegment::init(config, hash_builder)?),
                PolicyKind::Lru,
            ),
            CacheConfig::Lfu(config) => (
                Engine::Lfu(LfuSegment::init(config, hash_builder)?),
                PolicyKind::Lfu,
            ),
        };
        Ok(Self {
            engine: Mutex::new(engine),
            policy,
            capacity,
        })
    }

    /// Returns the policy this cache was built with.
    #[inline]
    pub fn policy(&self) -> PolicyKind {
        self.policy
    }

    /// Returns the maximum number of entries.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the LFU aging threshold, or `None` for an LRU cache.
    pub fn aging_threshold(&self) -> Option<u64> {
        match &*self.engine.lock() {
            Engine::Lru(_) => None,
            Engine::Lfu(segment) => Some(segment.aging_threshold()),
        }
    }

    /// Returns the number of cached entries.
    ///
    /// Other threads may change this as soon as the lock is released.
    pub fn len(&self) -> usize {
        match &*self.engine.lock() {
            Engine::Lru(segment) => segment.len(),
            Engine::Lfu(segment) => segment.len(),
        }
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        match &*self.engine.lock() {
            Engine::Lru(segment) => segment.is_empty(),
            Engine::Lfu(segment) => segment.is_empty(),
        }
    }

    /// Retrieves a value from the cache.
    ///
    /// Returns a **clone** of the value so the lock is not held by the caller.
    /// For operations that don't need ownership, use
    /// [`get_with()`](Self::get_with) instead.
    ///
    /// A hit updates recency (LRU) or frequency (LFU), and may trigger an
    /// aging pass. `None` means the key was not cached.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Clone,
    {
        self.get_with(key, V::clone)
    }

    /// Retrieves a value and applies a function to it while holding the lock.
    ///
    /// Avoids cloning when only part of the value is needed. The lock is
    /// released after `f` returns, so `f` must not call back into this cache.
    ///
    /// # Example
    ///
    /// ```
    /// use agecache::concurrent::ConcurrentCache;
    ///
    /// let cache = ConcurrentCache::lru(8).unwrap();
    /// cache.put("greeting", String::from("hello"));
    /// assert_eq!(cache.get_with("greeting", |s| s.len()), Some(5));
    /// ```
    pub fn get_with<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        F: FnOnce(&V) -> R,
    {
        match &mut *self.engine.lock() {
            Engine::Lru(segment) => segment.get(key).map(f),
            Engine::Lfu(segment) => segment.get(key).map(f),
        }
    }

    /// Retrieves a mutable reference and applies a function to it.
    ///
    /// Counts as an access, exactly like [`get`](Self::get).
    pub fn get_mut_with<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        F: FnOnce(&mut V) -> R,
    {
        match &mut *self.engine.lock() {
            Engine::Lru(segment) => segment.get_mut(key).map(f),
            Engine::Lfu(segment) => segment.get_mut(key).map(f),
        }
    }

    /// Checks whether `key` is cached.
    ///
    /// Does not count as an access and never changes eviction order.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match &*self.engine.lock() {
            Engine::Lru(segment) => segment.contains(key),
            Engine::Lfu(segment) => segment.contains(key),
        }
    }

    /// Returns the access frequency of `key`, or `None` if it is not cached
    /// or this is an LRU cache.
    pub fn frequency<Q>(&self, key: &Q) -> Option<u64>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match &*self.engine.lock() {
            Engine::Lru(_) => None,
            Engine::Lfu(segment) => segment.frequency(key),
        }
    }

    /// Removes a key from the cache and returns its value.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match &mut *self.engine.lock() {
            Engine::Lru(segment) => segment.remove(key),
            Engine::Lfu(segment) => segment.remove(key),
        }
    }

    /// Removes all entries.
    pub fn clear(&self) {
        match &mut *self.engine.lock() {
            Engine::Lru(segment) => segment.clear(),
            Engine::Lfu(segment) => segment.clear(),
        }
    }

    /// Panics if the engine's internal structures disagree.
    #[doc(hidden)]
    pub fn debug_validate_invariants(&self) {
        match &*self.engine.lock() {
            Engine::Lru(segment) => segment.debug_validate_invariants(),
            Engine::Lfu(segment) => segment.debug_validate_invariants(),
        }
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> ConcurrentCache<K, V, S> {
    /// Inserts or overwrites a key.
    ///
    /// Returns the entry evicted to make room, if a new key found the cache
    /// full. Overwriting an existing key returns `None`.
    pub fn put(&self, key: K, value: V) -> Option<(K, V)> {
        match &mut *self.engine.lock() {
            Engine::Lru(segment) => segment.put(key, value),
            Engine::Lfu(segment) => segment.put(key, value),
        }
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> CacheMetrics for ConcurrentCache<K, V, S> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        match &*self.engine.lock() {
            Engine::Lru(segment) => segment.metrics().metrics(),
            Engine::Lfu(segment) => segment.metrics().metrics(),
        }
    }

    fn algorithm_name(&self) -> &'static str {
        match self.policy {
            PolicyKind::Lru => "LRU",
            PolicyKind::Lfu => "LFU",
        }
    }
}
