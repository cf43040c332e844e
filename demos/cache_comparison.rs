//! Replays one hot/cold workload against LRU, plain LFU, and LFU with aging
//! and prints each cache's hit rate.
//!
//! Half-way through, the hot key set moves. Plain LFU keeps the old hot keys
//! because their counts never come down; aging lets them go.
//!
//! Run with `RUST_LOG=agecache=debug` to watch aging passes.

use agecache::config::{CacheConfig, LfuCacheConfig, LruCacheConfig};
use agecache::metrics::CacheMetrics;
use agecache::ConcurrentCache;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

const CAPACITY: usize = 50;
const HOT_KEYS: u64 = 20;
const COLD_KEYS: u64 = 5_000;
const OPERATIONS: usize = 500_000;
const HOT_RATIO: f64 = 0.7;
const PUT_RATIO: f64 = 0.3;

fn workload(seed: u64) -> Vec<(bool, u64)> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..OPERATIONS)
        .map(|op| {
            // The hot set shifts after the first half.
            let hot_base = if op < OPERATIONS / 2 { 0 } else { HOT_KEYS };
            let key = if rng.gen_bool(HOT_RATIO) {
                hot_base + rng.gen_range(0..HOT_KEYS)
            } else {
                2 * HOT_KEYS + rng.gen_range(0..COLD_KEYS)
            };
            (rng.gen_bool(PUT_RATIO), key)
        })
        .collect()
}

fn run(name: &str, config: CacheConfig, ops: &[(bool, u64)]) {
    let cache: ConcurrentCache<u64, String> = match ConcurrentCache::init(config, None) {
        Ok(cache) => cache,
        Err(err) => {
            eprintln!("{name}: {err}");
            return;
        }
    };

    for &(is_put, key) in ops {
        if is_put {
            cache.put(key, format!("value{key}"));
        } else if cache.get(&key).is_none() {
            // Read-through: fill on miss.
            cache.put(key, format!("loaded{key}"));
        }
    }

    let metrics = cache.metrics();
    let get = |key: &str| metrics.get(key).copied().unwrap_or(0.0);
    println!(
        "{name:<14} hit rate {:>6.2}%   hits {:>8}   evictions {:>8}   aging passes {:>6}",
        get("hit_rate") * 100.0,
        get("cache_hits"),
        get("evictions"),
        get("aging_passes"),
    );
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("Cache Policy Comparison");
    println!("=======================");
    println!(
        "capacity {CAPACITY}, {HOT_KEYS} hot keys ({:.0}% of traffic), {COLD_KEYS} cold keys, {OPERATIONS} operations",
        HOT_RATIO * 100.0
    );
    println!("hot set moves half-way through\n");

    let ops = workload(42);

    run("LRU", LruCacheConfig::new(CAPACITY).into(), &ops);
    run(
        "LFU (no aging)",
        LfuCacheConfig::without_aging(CAPACITY).into(),
        &ops,
    );
    run("LFU (aging)", LfuCacheConfig::new(CAPACITY).into(), &ops);
}
