//! The eviction-policy contract shared by every cache in this crate.
//!
//! [`CachePolicy`] is the one get/put surface a caller (or a benchmark
//! harness) needs in order to drive a cache without caring which policy it is.
//! Both [`LruCache`] and [`LfuCache`] implement it, and the trait is object
//! safe, so a `Box<dyn CachePolicy<K, V>>` can hold either one.
//!
//! ```
//! use agecache::policy::{CachePolicy, PolicyKind};
//! use agecache::{LfuCache, LruCache};
//!
//! let mut caches: Vec<Box<dyn CachePolicy<u32, &str>>> = vec![
//!     Box::new(LruCache::new(2).unwrap()),
//!     Box::new(LfuCache::without_aging(2).unwrap()),
//! ];
//!
//! for cache in &mut caches {
//!     cache.put(1, "a");
//!     cache.put(2, "b");
//!     cache.get(&1);
//!     cache.put(3, "c");
//!     // Both policies pick key 2 here.
//!     assert!(!cache.contains(&2));
//! }
//! assert_eq!(caches[0].kind(), PolicyKind::Lru);
//! assert_eq!(caches[1].kind(), PolicyKind::Lfu);
//! ```

use crate::lfu::LfuCache;
use crate::lru::LruCache;
use core::fmt;
use core::hash::{BuildHasher, Hash};

/// Which eviction policy a cache runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyKind {
    /// Least Recently Used
    Lru,
    /// Least Frequently Used with aging
    Lfu,
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyKind::Lru => f.write_str("LRU"),
            PolicyKind::Lfu => f.write_str("LFU"),
        }
    }
}

/// Core operations every eviction policy supports.
pub trait CachePolicy<K, V> {
    /// Returns the value for `key`, recording the access with the policy.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Inserts or overwrites `key`, returning the entry evicted to make room.
    fn put(&mut self, key: K, value: V) -> Option<(K, V)>;

    /// Removes `key` and returns its value.
    fn remove(&mut self, key: &K) -> Option<V>;

    /// Returns `true` if `key` is cached. Does not count as an access.
    fn contains(&self, key: &K) -> bool;

    /// Number of cached entries.
    fn len(&self) -> usize;

    /// Returns `true` if nothing is cached.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries.
    fn capacity(&self) -> usize;

    /// Removes every entry.
    fn clear(&mut self);

    /// The policy this cache runs.
    fn kind(&self) -> PolicyKind;
}

impl<K, V, S> CachePolicy<K, V> for LruCache<K, V, S>
where
    K: Hash + Eq + Clone,
    S: BuildHasher,
{
    #[inline]
    fn get(&mut self, key: &K) -> Option<&V> {
        LruCache::get(self, key)
    }

    #[inline]
    fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        LruCache::put(self, key, value)
    }

    #[inline]
    fn remove(&mut self, key: &K) -> Option<V> {
        LruCache::remove(self, key)
    }

    #[inline]
    fn contains(&self, key: &K) -> bool {
        LruCache::contains(self, key)
    }

    #[inline]
    fn len(&self) -> usize {
        LruCache::len(self)
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.cap()
    }

    #[inline]
    fn clear(&mut self) {
        LruCache::clear(self)
    }

    fn kind(&self) -> PolicyKind {
        PolicyKind::Lru
    }
}

impl<K, V, S> CachePolicy<K, V> for LfuCache<K, V, S>
where
    K: Hash + Eq + Clone,
    S: BuildHasher,
{
    #[inline]
    fn get(&mut self, key: &K) -> Option<&V> {
        LfuCache::get(self, key)
    }

    #[inline]
    fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        LfuCache::put(self, key, value)
    }

    #[inline]
    fn remove(&mut self, key: &K) -> Option<V> {
        LfuCache::remove(self, key)
    }

    #[inline]
    fn contains(&self, key: &K) -> bool {
        LfuCache::contains(self, key)
    }

    #[inline]
    fn len(&self) -> usize {
        LfuCache::len(self)
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.cap()
    }

    #[inline]
    fn clear(&mut self) {
        LfuCache::clear(self)
    }

    fn kind(&self) -> PolicyKind {
        PolicyKind::Lfu
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill<C: CachePolicy<u32, u32> + ?Sized>(cache: &mut C, n: u32) {
        for i in 0..n {
            cache.put(i, i * 10);
        }
    }

    #[test]
    fn test_policy_kind_display() {
        assert_eq!(PolicyKind::Lru.to_string(), "LRU");
        assert_eq!(PolicyKind::Lfu.to_string(), "LFU");
    }

    #[test]
    fn test_trait_objects_share_contract() {
        let mut caches: Vec<Box<dyn CachePolicy<u32, u32>>> = vec![
            Box::new(LruCache::new(3).unwrap()),
            Box::new(LfuCache::new(3).unwrap()),
        ];
        for cache in &mut caches {
            assert!(cache.is_empty());
            fill(cache.as_mut(), 5);
            assert_eq!(cache.len(), 3);
            assert_eq!(cache.capacity(), 3);
            assert_eq!(cache.get(&4), Some(&40));
            assert_eq!(cache.remove(&4), Some(40));
            assert!(!cache.contains(&4));
            cache.clear();
            assert!(cache.is_empty());
        }
    }
}
