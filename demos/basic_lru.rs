use evictkit::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cache: LruCache<u32, String> = LruCache::new(2);

    cache.set(1, "alpha".to_string());
    cache.set(2, "beta".to_string());

    if let Some(value) = cache.get(&1) {
        println!("hit 1: {value}");
    }

    cache.set(3, "gamma".to_string());
    println!("contains 2? {}", cache.contains(&2));

    let core = cache.into_inner();
    if let Some((key, value)) = core.peek_lru() {
        println!("next victim: {key} => {value}");
    }
}

// Expected output:
// hit 1: alpha
// contains 2? false
// next victim: 1 => alpha
//
// Explanation: capacity=2; after get(&1), key 1 is MRU and key 2 is LRU.
// Setting key 3 evicts key 2, leaving key 1 as the least recently used.
