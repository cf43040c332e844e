//! Concurrent Cache Correctness Tests
//!
//! These tests validate that the thread-safe facade keeps correct eviction
//! semantics while being accessed from multiple threads.
//!
//! ## Test Strategy
//!
//! - Use small cache sizes for predictable behavior
//! - Verify eviction policies work correctly when driven through the facade
//! - Verify that concurrent operations never break capacity or the internal
//!   list/index invariants
//!
//! ## Segments
//!
//! 1. **Algorithm Correctness**: Verify eviction behavior is correct per policy
//! 2. **Thread Safety Invariants**: Verify cache state consistency under concurrency

use agecache::config::{CacheConfig, LfuCacheConfig};
use agecache::metrics::CacheMetrics;
use agecache::{ConcurrentCache, PolicyKind};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

// ============================================================================
// SEGMENT 1: ALGORITHM CORRECTNESS THROUGH THE FACADE
// ============================================================================

// ----------------------------------------------------------------------------
// LRU
// ----------------------------------------------------------------------------

#[test]
fn test_concurrent_lru_basic_eviction() {
    let cache: ConcurrentCache<i32, i32> = ConcurrentCache::lru(3).unwrap();

    cache.put(1, 10);
    cache.put(2, 20);
    cache.put(3, 30);

    // Key 1 is least recently used
    assert_eq!(cache.put(4, 40), Some((1, 10)));
    assert!(cache.get(&1).is_none(), "Key 1 should be evicted");
    assert_eq!(cache.get(&2), Some(20));
    assert_eq!(cache.get(&3), Some(30));
    assert_eq!(cache.get(&4), Some(40));
}

#[test]
fn test_concurrent_lru_access_prevents_eviction() {
    let cache: ConcurrentCache<i32, i32> = ConcurrentCache::lru(3).unwrap();

    cache.put(1, 10);
    cache.put(2, 20);
    cache.put(3, 30);

    // Access key 1, making key 2 the LRU
    cache.get(&1);

    assert_eq!(cache.put(4, 40), Some((2, 20)));
    assert!(cache.contains(&1), "Key 1 should survive after access");
}

#[test]
fn test_concurrent_contains_is_not_an_access() {
    let cache: ConcurrentCache<i32, i32> = ConcurrentCache::lru(2).unwrap();
    cache.put(1, 10);
    cache.put(2, 20);

    assert!(cache.contains(&1));
    assert_eq!(cache.put(3, 30), Some((1, 10)));
}

// ----------------------------------------------------------------------------
// LFU
// ----------------------------------------------------------------------------

#[test]
fn test_concurrent_lfu_frequency_based_eviction() {
    let cache: ConcurrentCache<i32, i32> = ConcurrentCache::lfu_without_aging(3).unwrap();

    cache.put(1, 10);
    cache.put(2, 20);
    cache.put(3, 30);

    for _ in 0..10 {
        cache.get(&1);
    }
    for _ in 0..3 {
        cache.get(&2);
    }

    // Key 3 has the lowest frequency (1 from put)
    assert_eq!(cache.put(4, 40), Some((3, 30)));
    assert!(cache.contains(&1), "Key 1 should remain (highest freq)");
    assert!(cache.contains(&2), "Key 2 should remain");
    assert_eq!(cache.frequency(&1), Some(11));
    assert_eq!(cache.frequency(&4), Some(1));
}

#[test]
fn test_concurrent_lfu_frequency_accumulation() {
    let cache: Arc<ConcurrentCache<String, i32>> =
        Arc::new(ConcurrentCache::lfu_without_aging(4).unwrap());

    cache.put("hot".to_string(), 1);
    cache.put("warm".to_string(), 2);
    cache.put("cold".to_string(), 3);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let c = Arc::clone(&cache);
            thread::spawn(move || {
                for _ in 0..50 {
                    c.get("hot");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    // Every hit was counted exactly once.
    assert_eq!(cache.frequency("hot"), Some(201));

    for i in 0..4 {
        cache.put(format!("new{i}"), i);
    }
    assert!(
        cache.contains("hot"),
        "Hot key should survive due to high concurrent access frequency"
    );
}

#[test]
fn test_concurrent_lfu_aging_under_threads() {
    let cache: Arc<ConcurrentCache<u32, u32>> = Arc::new(ConcurrentCache::lfu(16, 4).unwrap());
    cache.put(7, 7);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let c = Arc::clone(&cache);
            thread::spawn(move || {
                for _ in 0..1000 {
                    c.get(&7);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    let frequency = cache.frequency(&7).unwrap();
    assert!(frequency <= 5, "aging should bound frequency, got {frequency}");
    assert!(cache.metrics()["aging_passes"] > 0.0);
    cache.debug_validate_invariants();
}

#[test]
fn test_concurrent_init_from_config() {
    let config: CacheConfig = LfuCacheConfig::new(10).with_aging_threshold(3).into();
    let cache: ConcurrentCache<u8, u8> = ConcurrentCache::init(config, None).unwrap();
    assert_eq!(cache.policy(), PolicyKind::Lfu);
    assert_eq!(cache.capacity(), 10);
    assert_eq!(cache.aging_threshold(), Some(3));
    assert!(cache.is_empty());
}

// ============================================================================
// SEGMENT 2: THREAD SAFETY INVARIANTS
// ============================================================================

fn hammer(cache: &Arc<ConcurrentCache<u64, u64>>, threads: u64, ops: u64) {
    let barrier = Arc::new(Barrier::new(threads as usize));
    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let cache = Arc::clone(cache);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..ops {
                    let key = (t * 7919 + i * 31) % 97;
                    match i % 5 {
                        0 => {
                            cache.remove(&key);
                        }
                        1 | 2 => {
                            cache.put(key, i);
                        }
                        _ => {
                            cache.get(&key);
                        }
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("Thread panicked");
    }
}

#[test]
fn test_concurrent_mixed_ops_keep_lru_invariants() {
    let cache = Arc::new(ConcurrentCache::lru(32).unwrap());
    hammer(&cache, 8, 2000);
    assert!(cache.len() <= 32);
    cache.debug_validate_invariants();
}

#[test]
fn test_concurrent_mixed_ops_keep_lfu_invariants() {
    let cache = Arc::new(ConcurrentCache::lfu(32, 3).unwrap());
    hammer(&cache, 8, 2000);
    assert!(cache.len() <= 32);
    cache.debug_validate_invariants();

    let cache = Arc::new(ConcurrentCache::lfu_without_aging(32).unwrap());
    hammer(&cache, 8, 2000);
    assert!(cache.len() <= 32);
    cache.debug_validate_invariants();
}

#[test]
fn test_concurrent_hit_counts_match_metrics() {
    let cache: Arc<ConcurrentCache<u32, u32>> = Arc::new(ConcurrentCache::lru(100).unwrap());
    for i in 0..50 {
        cache.put(i, i);
    }

    let hits = Arc::new(AtomicUsize::new(0));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let hits = Arc::clone(&hits);
            thread::spawn(move || {
                for i in 0..100 {
                    if cache.get(&i).is_some() {
                        hits.fetch_add(1, Ordering::Relaxed);
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    let metrics = cache.metrics();
    assert_eq!(hits.load(Ordering::Relaxed), 200);
    assert_eq!(metrics["cache_hits"], 200.0);
    assert_eq!(metrics["requests"], 400.0);
}

#[test]
fn test_concurrent_clear_while_writing() {
    let cache: Arc<ConcurrentCache<u64, u64>> = Arc::new(ConcurrentCache::lfu(64, 8).unwrap());
    let writer = {
        let cache = Arc::clone(&cache);
        thread::spawn(move || {
            for i in 0..5000 {
                cache.put(i % 200, i);
            }
        })
    };
    for _ in 0..50 {
        cache.clear();
        thread::yield_now();
    }
    writer.join().expect("Thread panicked");

    assert!(cache.len() <= 64);
    cache.debug_validate_invariants();
}
