//! Least Frequently Used Cache with Aging.
//!
//! The LFU cache evicts the entry with the lowest access count. Entries that
//! share a count sit in one frequency bucket, a list ordered by the time they
//! reached that count, so the oldest of the least frequently used entries is
//! always at the front of the lowest bucket.
//!
//! # Algorithm
//!
//! ```text
//!   buckets (BTreeMap<u64, List>)
//!     1 ──► [d] ◄──► [e]          ◄── min_frequency
//!     3 ──► [b]
//!     7 ──► [a] ◄──► [c]
//! ```
//!
//! - A hit unlinks the entry from bucket `f` and appends it to bucket `f + 1`,
//!   creating that bucket if needed. A bucket is dropped the moment it empties.
//! - A new key is appended to bucket 1, which becomes the minimum.
//! - At capacity, the front of the minimum bucket is evicted.
//!
//! # Aging
//!
//! Plain LFU lets a key that was hot long ago sit in the cache forever. To
//! prevent that, the cache keeps the sum and the average of all frequencies.
//! When a hit pushes the average above the configured `aging_threshold`, every
//! frequency above 1 is lowered by `max(1, average / 2)` (never below 1), and
//! the buckets are rebuilt. Relative order between entries is kept or collapsed
//! to a tie; it is never inverted.
//!
//! A threshold of `u64::MAX` is never exceeded, which turns aging off.
//!
//! # Performance Characteristics
//!
//! - Get/Put/Remove: O(log F) where F is the number of distinct frequencies
//! - Aging pass: O(n) over all entries, run only when the threshold is crossed

use crate::arena::{NodeArena, NodeId, PREALLOCATION_LIMIT};
use crate::config::LfuCacheConfig;
use crate::entry::CacheEntry;
use crate::error::Result;
use crate::list::List;
use crate::metrics::{CacheMetrics, LfuCacheMetrics};
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use core::mem;
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

/// Internal LFU segment containing the actual cache algorithm.
///
/// Shared between [`LfuCache`] and the locked facade in
/// [`concurrent`](crate::concurrent).
pub(crate) struct LfuSegment<K, V, S = DefaultHashBuilder> {
    /// Configuration for the LFU cache
    config: LfuCacheConfig,

    /// Owns every entry node and every bucket sentinel
    arena: NodeArena<CacheEntry<K, V>>,

    /// Map from keys to their node
    map: HashMap<K, NodeId, S>,

    /// Non-empty buckets keyed by frequency
    buckets: BTreeMap<u64, List>,

    /// Lowest frequency with a bucket, `None` when empty
    min_frequency: Option<u64>,

    /// Sum of all live frequencies
    total_frequency: u64,

    /// `total_frequency / len`, truncated; 0 when empty
    average_frequency: u64,

    metrics: LfuCacheMetrics,
}

impl<K: Hash + Eq, V, S: BuildHasher> LfuSegment<K, V, S> {
    pub(crate) fn init(config: LfuCacheConfig, hash_builder: S) -> Result<Self> {
        config.validate().map_err(|err| {
            warn!(
                policy = "LFU",
                capacity = config.capacity,
                aging_threshold = config.aging_threshold,
                %err,
                "rejected cache configuration"
            );
            err
        })?;

        debug!(
            policy = "LFU",
            capacity = config.capacity,
            aging_threshold = config.aging_threshold,
            aging = config.aging_enabled(),
            "created cache"
        );

        Ok(LfuSegment {
            config,
            arena: NodeArena::with_capacity(config.capacity),
            map: HashMap::with_capacity_and_hasher(
                config.capacity.min(PREALLOCATION_LIMIT),
                hash_builder,
            ),
            buckets: BTreeMap::new(),
            min_frequency: None,
            total_frequency: 0,
            average_frequency: 0,
            metrics: LfuCacheMetrics::new(),
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
    pub(crate) fn metrics(&self) -> &LfuCacheMetrics {
        &self.metrics
    }

    #[inline]
    pub(crate) fn aging_threshold(&self) -> u64 {
        self.config.aging_threshold
    }

    #[inline]
    pub(crate) fn min_frequency(&self) -> Option<u64> {
        self.min_frequency
    }

    #[inline]
    pub(crate) fn total_frequency(&self) -> u64 {
        self.total_frequency
    }

    #[inline]
    pub(crate) fn average_frequency(&self) -> u64 {
        self.average_frequency
    }

    pub(crate) fn frequency<Q>(&self, key: &Q) -> Option<u64>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let id = self.map.get(key)?;
        self.arena.get(*id).map(CacheEntry::frequency)
    }

    /// Appends `id` to the bucket for `frequency`, creating the bucket if absent.
    fn link(&mut self, frequency: u64, id: NodeId) {
        let arena = &mut self.arena;
        let bucket = self
            .buckets
            .entry(frequency)
            .or_insert_with(|| List::new(arena));
        bucket.push_back(arena, id);
    }

    /// Detaches `id` from the bucket for `frequency`.
    ///
    /// Returns `true` if that left the bucket empty, in which case the bucket
    /// has been dropped.
    fn unlink(&mut self, frequency: u64, id: NodeId) -> bool {
        let Some(bucket) = self.buckets.get_mut(&frequency) else {
            debug_assert!(false, "no bucket for frequency {frequency}");
            return false;
        };
        let detached = bucket.detach(&mut self.arena, id);
        debug_assert!(detached, "node missing from its frequency bucket");

        if !bucket.is_empty(&self.arena) {
            return false;
        }
        if let Some(bucket) = self.buckets.remove(&frequency) {
            bucket.release(&mut self.arena);
        }
        true
    }

    #[inline]
    fn recompute_min_frequency(&mut self) {
        self.min_frequency = self.buckets.keys().next().copied();
    }

    #[inline]
    fn refresh_average(&mut self) {
        self.average_frequency = match self.map.len() as u64 {
            0 => 0,
            len => self.total_frequency / len,
        };
    }

    #[inline]
    fn sync_frequency_levels(&mut self) {
        self.metrics
            .update_frequency_levels(self.min_frequency, self.buckets.len());
    }

    /// Records one access of `id`: moves it up one bucket and ages the cache
    /// if the average frequency crossed the threshold.
    fn bump(&mut self, id: NodeId) {
        let Some(entry) = self.arena.get_mut(id) else {
            debug_assert!(false, "indexed node has no entry");
            return;
        };
        let old = entry.frequency();
        let new = entry.bump();

        let emptied = self.unlink(old, id);
        self.link(new, id);
        if emptied && self.min_frequency == Some(old) {
            self.min_frequency = Some(new);
        }

        self.total_frequency = self.total_frequency.saturating_add(new - old);
        self.refresh_average();
        self.metrics.record_frequency_increment(new);

        if self.average_frequency > self.config.aging_threshold {
            self.age();
        }
        self.sync_frequency_levels();
    }

    /// Lowers every frequency above 1 by `max(1, average / 2)`, floored at 1.
    ///
    /// Buckets are drained in ascending frequency, front to back, into the tail
    /// of their target bucket, so each entry decays once and entries keep their
    /// order.
    fn age(&mut self) {
        let average_before = self.average_frequency;
        let reduce_by = (average_before / 2).max(1);
        let mut decayed = 0u64;

        for (frequency, mut bucket) in mem::take(&mut self.buckets) {
            if frequency == 1 {
                self.buckets.insert(1, bucket);
                continue;
            }
            while let Some(id) = bucket.front(&self.arena) {
                bucket.detach(&mut self.arena, id);
                let Some(entry) = self.arena.get_mut(id) else {
                    debug_assert!(false, "bucket node has no entry");
                    continue;
                };
                let target = entry.decay(reduce_by);
                self.link(target, id);
                decayed += 1;
            }
            bucket.release(&mut self.arena);
        }

        self.recompute_min_frequency();
        self.total_frequency = self
            .buckets
            .iter()
            .map(|(&frequency, bucket)| frequency.saturating_mul(bucket.len() as u64))
            .fold(0, u64::saturating_add);
        self.refresh_average();

        let max_frequency = self.buckets.keys().next_back().copied().unwrap_or(0);
        self.metrics.record_aging(decayed, max_frequency);
        debug!(
            policy = "LFU",
            average_before,
            reduce_by,
            decayed,
            average_after = self.average_frequency,
            buckets = self.buckets.len(),
            "aged frequencies"
        );
    }

    fn touch<Q>(&mut self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let Some(id) = self.map.get(key).copied() else {
            self.metrics.core.record_miss();
            return None;
        };
        self.metrics.core.record_hit();
        self.bump(id);
        Some(id)
    }

    pub(crate) fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let id = self.touch(key)?;
        self.arena.get(id).map(|entry| &entry.value)
    }

    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let id = self.touch(key)?;
        self.arena.get_mut(id).map(|entry| &mut entry.value)
    }

    pub(crate) fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let id = self.map.get(key)?;
        self.arena.get(*id).map(|entry| &entry.value)
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
            if let Some(entry) = self.arena.get_mut(id) {
                entry.value = value;
            }
            self.metrics.core.record_update();
            self.bump(id);
            return None;
        }

        let evicted = if self.map.len() >= self.config.capacity {
            self.evict()
        } else {
            None
        };

        let id = self.arena.insert(CacheEntry::new(key.clone(), value));
        self.link(1, id);
        self.map.insert(key, id);
        self.min_frequency = Some(1);
        self.total_frequency = self.total_frequency.saturating_add(1);
        self.refresh_average();
        self.metrics.core.record_insertion();
        self.sync_frequency_levels();

        evicted
    }

    /// Removes the oldest entry of the lowest frequency bucket.
    fn evict(&mut self) -> Option<(K, V)> {
        let frequency = self.min_frequency?;
        let id = self.buckets.get(&frequency)?.front(&self.arena)?;
        let emptied = self.unlink(frequency, id);
        let entry = self.arena.remove(id)?;
        self.map.remove(&entry.key);

        self.total_frequency = self.total_frequency.saturating_sub(entry.frequency());
        if emptied {
            self.recompute_min_frequency();
        }
        self.metrics.core.record_eviction();
        trace!(
            policy = "LFU",
            frequency,
            len = self.map.len(),
            "evicted least frequently used entry"
        );
        Some((entry.key, entry.value))
    }

    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let id = self.map.remove(key)?;
        let frequency = self.arena.get(id).map(CacheEntry::frequency)?;
        let emptied = self.unlink(frequency, id);
        let entry = self.arena.remove(id)?;

        self.total_frequency = self.total_frequency.saturating_sub(frequency);
        if emptied {
            self.recompute_min_frequency();
        }
        self.refresh_average();
        self.metrics.core.record_removal();
        self.sync_frequency_levels();
        Some(entry.value)
    }

    pub(crate) fn clear(&mut self) {
        self.map.clear();
        self.buckets.clear();
        self.arena.clear();
        self.min_frequency = None;
        self.total_frequency = 0;
        self.average_frequency = 0;
        self.metrics.reset_frequency_levels();
    }

    /// Keys per bucket, lowest frequency first, each bucket front to back.
    #[cfg(test)]
    pub(crate) fn buckets_snapshot(&self) -> Vec<(u64, Vec<&K>)> {
        self.buckets
            .iter()
            .map(|(&frequency, bucket)| {
                let keys = bucket
                    .iter(&self.arena)
                    .filter_map(|id| self.arena.get(id).map(|entry| &entry.key))
                    .collect();
                (frequency, keys)
            })
            .collect()
    }

    pub(crate) fn debug_validate_invariants(&self) {
        let mut members = 0;
        let mut total = 0u64;
        for (&frequency, bucket) in &self.buckets {
            assert!(frequency >= 1, "bucket below frequency 1");
            let ids = bucket.debug_validate(&self.arena);
            assert!(!ids.is_empty(), "empty bucket {frequency} kept");
            for id in ids {
                match self.arena.get(id) {
                    Some(entry) => {
                        assert_eq!(entry.frequency(), frequency, "entry in the wrong bucket");
                        assert!(self.map.get(&entry.key) == Some(&id), "bucket node not indexed");
                    }
                    None => panic!("bucket holds a free slot"),
                }
                members += 1;
                total += frequency;
            }
        }

        assert_eq!(members, self.map.len(), "buckets and index disagree on size");
        assert_eq!(self.arena.len(), self.map.len(), "arena holds stray nodes");
        assert!(self.map.len() <= self.config.capacity, "over capacity");
        assert_eq!(
            self.min_frequency,
            self.buckets.keys().next().copied(),
            "stale minimum frequency"
        );
        assert_eq!(self.total_frequency, total, "stale total frequency");
        let expected_average = if members == 0 { 0 } else { total / members as u64 };
        assert_eq!(self.average_frequency, expected_average, "stale average");
    }
}

impl<K, V, S> core::fmt::Debug for LfuSegment<K, V, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LfuSegment")
            .field("capacity", &self.config.capacity)
            .field("aging_threshold", &self.config.aging_threshold)
            .field("len", &self.map.len())
            .field("min_frequency", &self.min_frequency)
            .field("average_frequency", &self.average_frequency)
            .finish()
    }
}

/// A fixed-capacity Least Frequently Used cache with frequency aging.
///
/// The victim on a full insert is the entry with the lowest access count;
/// among equal counts, the one that reached that count first.
///
/// # Examples
///
/// ```
/// use agecache::LfuCache;
///
/// let mut cache = LfuCache::new(2).unwrap();
/// cache.put(1, "a");
/// cache.put(2, "b");
/// cache.get(&1);
/// cache.get(&1);
///
/// // Key 2 was used once, key 1 three times.
/// assert_eq!(cache.put(3, "c"), Some((2, "b")));
/// assert_eq!(cache.frequency(&1), Some(3));
/// assert_eq!(cache.frequency(&3), Some(1));
/// ```
///
/// Aging keeps frequencies bounded:
///
/// ```
/// use agecache::config::LfuCacheConfig;
/// use agecache::LfuCache;
///
/// let mut cache = LfuCache::init(LfuCacheConfig::new(4).with_aging_threshold(2), None).unwrap();
/// cache.put("hot", ());
/// for _ in 0..100 {
///     cache.get(&"hot");
/// }
/// assert!(cache.frequency(&"hot").unwrap() <= 3);
/// ```
#[derive(Debug)]
pub struct LfuCache<K, V, S = DefaultHashBuilder> {
    segment: LfuSegment<K, V, S>,
}

impl<K: Hash + Eq, V> LfuCache<K, V, DefaultHashBuilder> {
    /// Creates a cache holding at most `capacity` entries, aging at the
    /// default threshold.
    pub fn new(capacity: usize) -> Result<Self> {
        Self::init(LfuCacheConfig::new(capacity), None)
    }

    /// Creates a plain LFU cache that never ages.
    pub fn without_aging(capacity: usize) -> Result<Self> {
        Self::init(LfuCacheConfig::without_aging(capacity), None)
    }

    /// Creates a cache from a configuration with an optional hasher.
    ///
    /// If `hasher` is `None`, the default hash builder is used.
    pub fn init(config: LfuCacheConfig, hasher: Option<DefaultHashBuilder>) -> Result<Self> {
        Self::init_with_hasher(config, hasher.unwrap_or_default())
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> LfuCache<K, V, S> {
    /// Creates a cache from a configuration with a custom hash builder.
    pub fn init_with_hasher(config: LfuCacheConfig, hash_builder: S) -> Result<Self> {
        Ok(Self {
            segment: LfuSegment::init(config, hash_builder)?,
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

    /// Returns the configured aging threshold (`u64::MAX` when aging is off).
    #[inline]
    pub fn aging_threshold(&self) -> u64 {
        self.segment.aging_threshold()
    }

    /// Returns the lowest frequency of any entry, or `None` when empty.
    #[inline]
    pub fn min_frequency(&self) -> Option<u64> {
        self.segment.min_frequency()
    }

    /// Returns the average frequency, truncated; 0 when empty.
    #[inline]
    pub fn average_frequency(&self) -> u64 {
        self.segment.average_frequency()
    }

    /// Returns the sum of every entry's frequency.
    #[inline]
    pub fn total_frequency(&self) -> u64 {
        self.segment.total_frequency()
    }

    /// Returns the access frequency of `key` without touching it.
    #[inline]
    pub fn frequency<Q>(&self, key: &Q) -> Option<u64>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.frequency(key)
    }

    /// Returns the value for `key` and bumps its frequency.
    ///
    /// The bump may trigger an aging pass. A miss only counts toward metrics.
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

    /// Returns the value for `key` without changing its frequency.
    #[inline]
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.peek(key)
    }

    /// Returns `true` if `key` is cached, without changing its frequency.
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

    /// Removes every entry and resets the frequency counters.
    ///
    /// Hit, miss and aging counters are kept; the frequency gauges drop to 0.
    #[inline]
    pub fn clear(&mut self) {
        self.segment.clear()
    }

    /// Panics if the buckets, the index, the arena and the running counters
    /// disagree.
    #[doc(hidden)]
    pub fn debug_validate_invariants(&self) {
        self.segment.debug_validate_invariants()
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> LfuCache<K, V, S> {
    /// Inserts or overwrites `key`.
    ///
    /// Overwriting replaces the value and bumps the frequency like a hit.
    /// A new key starts at frequency 1; if the cache was full, the least
    /// frequently used entry is evicted first and returned.
    #[inline]
    pub fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        self.segment.put(key, value)
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> CacheMetrics for LfuCache<K, V, S> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.segment.metrics().metrics()
    }

    fn algorithm_name(&self) -> &'static str {
        self.segment.metrics().algorithm_name()
    }
}
