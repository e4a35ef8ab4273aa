use evictkit::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cache: ClockCache<u32, &str> = ClockCache::new(3);

    cache.set(1, "one");
    cache.set(2, "two");
    cache.set(3, "three");

    // Sets the reference bit on key 1.
    cache.get(&1);

    // The hand skips key 1 (clearing its bit) and evicts key 2.
    cache.set(4, "four");

    println!("contains 1? {}", cache.contains(&1));
    println!("contains 2? {}", cache.contains(&2));

    let core = cache.into_inner();
    println!("1 referenced? {:?}", core.is_referenced(&1));
    println!("hand at slot {}", core.hand());
}

// Expected output:
// contains 1? true
// contains 2? false
// 1 referenced? Some(false)
// hand at slot 2
//
// Explanation: key 1 got a second chance because it was read. Key 4 took
// slot 1 and the hand moved past it.
