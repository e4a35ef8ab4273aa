//! Picking a policy at runtime with `CacheBuilder`.
//!
//! Run with: cargo run --example basic_builder

use evictkit::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== CacheBuilder ===\n");

    for name in ["lru", "slru:50", "clock", "fifo"] {
        let policy = match name.parse::<CachePolicy>() {
            Ok(policy) => policy,
            Err(err) => {
                eprintln!("{err}");
                continue;
            },
        };
        let cache = CacheBuilder::new(3).policy(policy).build::<u64, String>();

        cache.set(1, "one".to_string());
        cache.set(2, "two".to_string());
        cache.get(&1);
        cache.set(3, "three".to_string());
        cache.set(4, "four".to_string());

        println!(
            "{:<8} kept 1? {:<5} kept 2? {:<5} len {}",
            cache.policy().to_string(),
            cache.contains(&1),
            cache.contains(&2),
            cache.len()
        );
    }

    println!();
    for bad in ["lfu", "slru:abc"] {
        if let Err(err) = bad.parse::<CachePolicy>() {
            println!("rejected {bad:?}: {err}");
        }
    }
}

// Expected output:
// === CacheBuilder ===
//
// lru      kept 1? true  kept 2? false len 3
// slru:50  kept 1? true  kept 2? false len 3
// clock    kept 1? true  kept 2? false len 3
// fifo     kept 1? false kept 2? true  len 3
//
// rejected "lfu": unknown cache policy `lfu`
// rejected "slru:abc": invalid protected percent `abc` (expected an integer)
