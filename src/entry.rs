//! Frequency-tracked cache entry.
//!
//! [`CacheEntry`] is the record the LFU cache stores in each list node: the key,
//! the value, and how many times the entry has been touched. The frequency
//! starts at 1 on insertion, grows by one per access, and only ever shrinks
//! during an aging pass, where it is floored at 1.
//!
//! # Examples
//!
//! ```
//! use agecache::CacheEntry;
//!
//! let mut entry = CacheEntry::new("key", "value");
//! assert_eq!(entry.frequency(), 1);
//!
//! entry.bump();
//! entry.bump();
//! assert_eq!(entry.frequency(), 3);
//!
//! // Decay never drops below 1.
//! entry.decay(10);
//! assert_eq!(entry.frequency(), 1);
//! ```

use core::fmt;

/// A key/value pair plus its access frequency.
#[derive(Clone, PartialEq, Eq)]
pub struct CacheEntry<K, V> {
    /// The entry's key; unique within one cache.
    pub key: K,
    /// The cached value.
    pub value: V,
    frequency: u64,
}

impl<K, V> CacheEntry<K, V> {
    /// Creates an entry with frequency 1.
    #[inline]
    pub fn new(key: K, value: V) -> Self {
        CacheEntry {
            key,
            value,
            frequency: 1,
        }
    }

    /// Returns the current access frequency (always at least 1).
    #[inline]
    pub fn frequency(&self) -> u64 {
        self.frequency
    }

    /// Records one access and returns the new frequency.
    #[inline]
    pub fn bump(&mut self) -> u64 {
        self.frequency = self.frequency.saturating_add(1);
        self.frequency
    }

    /// Lowers the frequency by `by`, flooring at 1, and returns the new frequency.
    #[inline]
    pub fn decay(&mut self, by: u64) -> u64 {
        self.frequency = self.frequency.saturating_sub(by).max(1);
        self.frequency
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for CacheEntry<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheEntry")
            .field("key", &self.key)
            .field("value", &self.value)
            .field("frequency", &self.frequency)
            .finish()
    }
}
