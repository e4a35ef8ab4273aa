use evictkit::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Two probation slots, two protected slots.
    let cache: SlruCache<&str, u32> = SlruCache::with_ratio(4, 50);

    cache.set("a", 1);
    cache.set("b", 2);

    // A hit promotes "a" into the protected segment.
    cache.get(&"a");

    // A scan of one-shot keys only churns probation.
    cache.set("c", 3);
    cache.set("d", 4);

    println!("contains a? {}", cache.contains(&"a"));
    println!("contains b? {}", cache.contains(&"b"));
    println!(
        "protected {}/{}, probation {}/{}",
        cache.protected_len(),
        cache.protected_capacity(),
        cache.probation_len(),
        cache.probation_capacity()
    );
}

// Expected output:
// contains a? true
// contains b? false
// protected 1/2, probation 2/2
//
// Explanation: "a" was re-referenced and lives in protected. "b" was never
// read again, so the scan of "c" and "d" pushed it out of probation.
