//! Least Recently Used (LRU) Cache Implementation
//!
//! This module provides a fixed-capacity LRU cache with O(1) get, put and
//! remove. LRU keeps entries in order of last use and evicts the one that has
//! gone untouched the longest, which works well for workloads with temporal
//! locality.
//!
//! # Algorithm
//!
//! All entries sit on one list inside a [`NodeArena`](crate::arena::NodeArena).
//! The node next to the head sentinel is the least recently used entry and the
//! node next to the tail sentinel is the most recently used one:
//!
//! ```text
//!   head ──► [LRU] ◄──► ... ◄──► [MRU] ◄── tail
//! ```
//!
//! - `get` on a hit unlinks the node and relinks it in front of the tail.
//! - `put` on an existing key replaces the value and does the same move.
//! - `put` on a new key at capacity first evicts the node after the head.
//!
//! A hash map from key to [`NodeId`] gives O(1) lookup.
//!
//! # Performance Characteristics
//!
//! - Get: O(1)
//! - Put: O(1)
//! - Remove: O(1)
//!
//! # Thread Safety
//!
//! `LruCache` is not thread-safe. Use
//! [`ConcurrentCache`](crate::concurrent::ConcurrentCache) to share a cache
//! between threads.

use crate::arena::{NodeArena, NodeId, PREALLOCATION_LIMIT};
use crate::config::LruCacheConfig;
use crate::error::Result;
use crate::list::List;
use crate::metrics::{CacheMetrics, LruCacheMetrics};
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use std::collections::BTreeMap;
use tracing::{debug, trace, warn};

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;
#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;
#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

/// Internal LRU segment containing the actual cache algorithm.
///
/// Shared between [`LruCache`] and the locked facade in
/// [`concurrent`](crate::concurrent); every piece of LRU bookkeeping lives here.
pub(crate) struct LruSegment<K, V, S = DefaultHashBuilder> {
    config: LruCacheConfig,
    arena: NodeArena<(K, V)>,
    list: List,
    map: HashMap<K, NodeId, S>,
    metrics: LruCacheMetrics,
}

impl<K: Hash + Eq, V, S: BuildHasher> LruSegment<K, V, S> {
    pub(crate) fn init(config: LruCacheConfig, hash_builder: S) -> Result<Self> {
        config.validate().map_err(|err| {
            warn!(policy = "LRU", capacity = config.capacity, %err, "rejected cache configuration");
            err
        })?;

        // Two extra slots for the sentinels.
        let mut arena = NodeArena::with_capacity(config.capacity.saturating_add(2));
        let list = List::new(&mut arena);
        debug!(policy = "LRU", capacity = config.capacity, "created cache");

        Ok(LruSegment {
            config,
            arena,
            list,
            map: HashMap::with_capacity_and_hasher(
                config.capacity.min(PREALLOCATION_LIMIT),
                hash_builder,
            ),
            metrics: LruCacheMetrics::new(),
        })
    }

    #[inline]
    pub(crate) fn cap(&self) -> usize {
        self.config.capacity
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    #[inline]
    pub(crate) fn metrics(&self) -> &LruCacheMetrics {
        &self.metrics
    }

    /// Looks up `key` and marks the entry as most recently used.
    fn touch<Q>(&mut self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let Some(id) = self.map.get(key).copied() else {
            self.metrics.core.record_miss();
            return None;
        };
        self.list.move_to_back(&mut self.arena, id);
        self.metrics.core.record_hit();
        self.metrics.record_promotion();
        Some(id)
    }

    pub(crate) fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let id = self.touch(key)?;
        self.arena.get(id).map(|(_, v)| v)
    }

    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let id = self.touch(key)?;
        self.arena.get_mut(id).map(|(_, v)| v)
    }

    pub(crate) fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let id = self.map.get(key)?;
        self.arena.get(*id).map(|(_, v)| v)
    }

    pub(crate) fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.contains_key(key)
    }

    pub(crate) fn put(&mut self, key: K, value: V) -> Option<(K, V)>
    where
        K: Clone,
    {
        if let Some(id) = self.map.get(&key).copied() {
            if let Some(slot) = self.arena.get_mut(id) {
                slot.1 = value;
            }
            self.list.move_to_back(&mut self.arena, id);
            self.metrics.core.record_update();
            self.metrics.record_promotion();
            return None;
        }

        let evicted = if self.map.len() >= self.config.capacity {
            self.evict()
        } else {
            None
        };

        let id = self.arena.insert((key.clone(), value));
        self.list.push_back(&mut self.arena, id);
        self.map.insert(key, id);
        self.metrics.core.record_insertion();

        evicted
    }

    /// Removes the least recently used entry.
    fn evict(&mut self) -> Option<(K, V)> {
        let id = self.list.front(&self.arena)?;
        self.list.detach(&mut self.arena, id);
        let (key, value) = self.arena.remove(id)?;
        self.map.remove(&key);
        self.metrics.core.record_eviction();
        trace!(policy = "LRU", len = self.map.len(), "evicted least recently used entry");
        Some((key, value))
    }

    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let id = self.map.remove(key)?;
        self.list.detach(&mut self.arena, id);
        let (_, value) = self.arena.remove(id)?;
        self.metrics.core.record_removal();
        Some(value)
    }

    pub(crate) fn clear(&mut self) {
        self.map.clear();
        self.arena.clear();
        self.list = List::new(&mut self.arena);
    }

    /// Keys from least to most recently used.
    #[cfg(test)]
    pub(crate) fn keys_in_order(&self) -> Vec<&K> {
        self.list
            .iter(&self.arena)
            .filter_map(|id| self.arena.get(id).map(|(k, _)| k))
            .collect()
    }

    pub(crate) fn debug_validate_invariants(&self) {
        let ids = self.list.debug_validate(&self.arena);
        assert_eq!(ids.len(), self.map.len(), "list and index disagree on size");
        assert_eq!(self.arena.len(), self.map.len(), "arena holds stray nodes");
        assert!(self.map.len() <= self.config.capacity, "over capacity");
        for (key, &id) in self.map.iter() {
            match self.arena.get(id) {
                Some((stored, _)) => assert!(stored == key, "index points at another key"),
                None => panic!("index points at a free slot"),
            }
        }
    }
}

impl<K, V, S> core::fmt::Debug for LruSegment<K, V, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LruSegment")
            .field("capacity", &self.config.capacity)
            .field("len", &self.map.len())
            .finish()
    }
}

/// A fixed-capacity Least Recently Used cache.
///
/// When the cache is full, inserting a new key evicts the entry that was
/// least recently read or written.
///
/// # Examples
///
/// ```
/// use agecache::LruCache;
///
/// let mut cache = LruCache::new(2).unwrap();
/// cache.put("apple", 1);
/// cache.put("banana", 2);
///
/// // Reading "apple" makes "banana" the least recently used entry.
/// assert_eq!(cache.get(&"apple"), Some(&1));
/// assert_eq!(cache.put("cherry", 3), Some(("banana", 2)));
///
/// assert!(!cache.contains(&"banana"));
/// assert_eq!(cache.len(), 2);
/// ```
#[derive(Debug)]
pub struct LruCache<K, V, S = DefaultHashBuilder> {
    segment: LruSegment<K, V, S>,
}

impl<K: Hash + Eq, V> LruCache<K, V, DefaultHashBuilder> {
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// Returns [`ConfigurationError::ZeroCapacity`](crate::error::ConfigurationError::ZeroCapacity)
    /// when `capacity` is 0.
    pub fn new(capacity: usize) -> Result<Self> {
        Self::init(LruCacheConfig::new(capacity), None)
    }

    /// Creates a cache from a configuration with an optional hasher.
    ///
    /// If `hasher` is `None`, the default hash builder is used.
    ///
    /// # Examples
    ///
    /// ```
    /// use agecache::config::LruCacheConfig;
    /// use agecache::LruCache;
    ///
    /// let mut cache: LruCache<String, u32> =
    ///     LruCache::init(LruCacheConfig { capacity: 100 }, None).unwrap();
    /// cache.put("a".to_string(), 1);
    /// assert_eq!(cache.get("a"), Some(&1));
    /// ```
    pub fn init(config: LruCacheConfig, hasher: Option<DefaultHashBuilder>) -> Result<Self> {
        Self::init_with_hasher(config, hasher.unwrap_or_default())
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> LruCache<K, V, S> {
    /// Creates a cache from a configuration with a custom hash builder.
    pub fn init_with_hasher(config: LruCacheConfig, hash_builder: S) -> Result<Self> {
        Ok(Self {
            segment: LruSegment::init(config, hash_builder)?,
        })
    }

    /// Returns the maximum number of entries the cache holds.
    #[inline]
    pub fn cap(&self) -> usize {
        self.segment.cap()
    }

    /// Returns the number of entries currently cached.
    #[inline]
    pub fn len(&self) -> usize {
        self.segment.len()
    }

    /// Returns `true` if the cache holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segment.is_empty()
    }

    /// Returns the value for `key` and marks it as most recently used.
    ///
    /// A miss leaves the cache untouched apart from the miss counter.
    #[inline]
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.get(key)
    }

    /// Like [`get`](Self::get), but returns a mutable reference.
    #[inline]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.get_mut(key)
    }

    /// Returns the value for `key` without changing its recency.
    #[inline]
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.peek(key)
    }

    /// Returns `true` if `key` is cached, without changing its recency.
    #[inline]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.contains(key)
    }

    /// Removes `key` and returns its value.
    #[inline]
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.remove(key)
    }

    /// Removes every entry. Metrics are kept.
    #[inline]
    pub fn clear(&mut self) {
        self.segment.clear()
    }

    /// Panics if the list, the index and the arena disagree.
    #[doc(hidden)]
    pub fn debug_validate_invariants(&self) {
        self.segment.debug_validate_invariants()
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> LruCache<K, V, S> {
    /// Inserts or overwrites `key`.
    ///
    /// Returns the evicted entry when a new key pushed the cache over capacity.
    /// Overwriting an existing key never evicts and returns `None`.
    #[inline]
    pub fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        self.segment.put(key, value)
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> CacheMetrics for LruCache<K, V, S> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.segment.metrics().metrics()
    }

    fn algorithm_name(&self) -> &'static str {
        self.segment.metrics().algorithm_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigurationError;

    fn keys<K: Hash + Eq + Clone, V>(cache: &LruCache<K, V>) -> Vec<K> {
        cache.segment.keys_in_order().into_iter().cloned().collect()
    }

    #[test]
    fn test_lru_get_put() {
        let mut cache = LruCache::new(2).unwrap();
        assert_eq!(cache.put("apple", 1), None);
        assert_eq!(cache.put("banana", 2), None);
        assert_eq!(cache.get(&"apple"), Some(&1));
        assert_eq!(cache.get(&"banana"), Some(&2));
        assert_eq!(cache.get(&"cherry"), None);

        // Overwrite: nothing evicted.
        assert_eq!(cache.put("apple", 3), None);
        assert_eq!(cache.get(&"apple"), Some(&3));

        assert_eq!(cache.put("cherry", 4), Some(("banana", 2)));
        assert_eq!(cache.get(&"banana"), None);
        assert_eq!(cache.get(&"apple"), Some(&3));
        assert_eq!(cache.get(&"cherry"), Some(&4));
        cache.debug_validate_invariants();
    }

    #[test]
    fn test_lru_recency_order() {
        let mut cache = LruCache::new(3).unwrap();
        cache.put(1, "a");
        cache.put(2, "b");
        cache.put(3, "c");
        assert_eq!(keys(&cache), vec![1, 2, 3]);

        cache.get(&1);
        assert_eq!(keys(&cache), vec![2, 3, 1]);

        cache.put(2, "bb");
        assert_eq!(keys(&cache), vec![3, 1, 2]);
        cache.debug_validate_invariants();
    }

    #[test]
    fn test_lru_get_mut() {
        let mut cache = LruCache::new(2).unwrap();
        cache.put("apple", 1);
        cache.put("banana", 2);
        if let Some(v) = cache.get_mut(&"apple") {
            *v = 3;
        }
        assert_eq!(cache.get(&"apple"), Some(&3));
        cache.put("cherry", 4);
        assert_eq!(cache.get(&"banana"), None);
        assert_eq!(cache.get(&"apple"), Some(&3));
        assert_eq!(cache.get(&"cherry"), Some(&4));
    }

    #[test]
    fn test_lru_peek_does_not_promote() {
        let mut cache = LruCache::new(2).unwrap();
        cache.put("apple", 1);
        cache.put("banana", 2);
        assert_eq!(cache.peek(&"apple"), Some(&1));
        assert!(cache.contains(&"apple"));

        // "apple" is still the least recently used entry.
        assert_eq!(cache.put("cherry", 3), Some(("apple", 1)));
    }

    #[test]
    fn test_lru_remove() {
        let mut cache = LruCache::new(2).unwrap();
        cache.put("apple", 1);
        cache.put("banana", 2);
        assert_eq!(cache.remove(&"apple"), Some(1));
        assert_eq!(cache.get(&"apple"), None);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.remove(&"cherry"), None);

        assert_eq!(cache.put("cherry", 3), None);
        assert_eq!(cache.get(&"banana"), Some(&2));
        assert_eq!(cache.get(&"cherry"), Some(&3));
        cache.debug_validate_invariants();
    }

    #[test]
    fn test_lru_clear() {
        let mut cache = LruCache::new(2).unwrap();
        cache.put("apple", 1);
        cache.put("banana", 2);
        cache.clear();
        assert_eq!(cache.len(), 0);
        assert!(cache.is_empty());
        cache.debug_validate_invariants();

        cache.put("cherry", 3);
        assert_eq!(cache.get(&"cherry"), Some(&3));
        cache.debug_validate_invariants();
    }

    #[test]
    fn test_lru_capacity_one() {
        let mut cache = LruCache::new(1).unwrap();
        cache.put(1, 10);
        assert_eq!(cache.put(2, 20), Some((1, 10)));
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.get(&2), Some(&20));
    }

    #[test]
    fn test_lru_string_keys_borrowed_lookup() {
        let mut cache = LruCache::new(2).unwrap();
        cache.put(String::from("apple"), 1);
        cache.put(String::from("banana"), 2);
        assert_eq!(cache.get("apple"), Some(&1));
        assert_eq!(cache.remove("banana"), Some(2));
    }

    #[test]
    fn test_lru_zero_capacity_rejected() {
        let err = LruCache::<u32, u32>::new(0).unwrap_err();
        assert_eq!(err, ConfigurationError::ZeroCapacity);
    }

    #[test]
    fn test_lru_metrics() {
        let mut cache = LruCache::new(1).unwrap();
        cache.put(1, 1);
        cache.get(&1);
        cache.get(&2);
        cache.put(1, 2);
        cache.put(3, 3);
        cache.remove(&3);

        let metrics = cache.metrics();
        assert_eq!(metrics.get("requests"), Some(&2.0));
        assert_eq!(metrics.get("cache_hits"), Some(&1.0));
        assert_eq!(metrics.get("insertions"), Some(&2.0));
        assert_eq!(metrics.get("updates"), Some(&1.0));
        assert_eq!(metrics.get("evictions"), Some(&1.0));
        assert_eq!(metrics.get("removals"), Some(&1.0));
        assert_eq!(cache.algorithm_name(), "LRU");
    }

    #[test]
    fn test_lru_slots_are_reused_at_capacity() {
        let mut cache = LruCache::new(4).unwrap();
        for i in 0..1000 {
            cache.put(i, i);
        }
        assert_eq!(cache.len(), 4);
        assert_eq!(keys(&cache), vec![996, 997, 998, 999]);
        cache.debug_validate_invariants();
    }

    #[test]
    fn test_lru_huge_capacity() {
        let mut cache = LruCache::new(usize::MAX).unwrap();
        assert_eq!(cache.cap(), usize::MAX);
        for i in 0..100u32 {
            assert_eq!(cache.put(i, i * 10), None);
        }
        assert_eq!(cache.get(&42), Some(&420));
        assert_eq!(cache.len(), 100);
        cache.debug_validate_invariants();
    }
}
