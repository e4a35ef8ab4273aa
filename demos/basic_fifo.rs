use evictkit::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut cache: FifoCore<u32, &str> = FifoCore::new(3);

    cache.insert(1, "one");
    cache.insert(2, "two");
    cache.insert(3, "three");

    // Reads never change FIFO order.
    cache.get(&1);
    cache.insert(4, "four");

    println!("contains 1? {}", cache.contains(&1));
    if let Some((key, value)) = cache.peek_oldest() {
        println!("oldest: {key} => {value}");
    }

    // A zero-capacity FIFO still holds the most recent entry.
    let tiny: FifoCache<u32, &str> = FifoCache::new(0);
    tiny.set(1, "one");
    tiny.set(2, "two");
    println!("tiny len {}, has 2? {}", tiny.len(), tiny.contains(&2));
}

// Expected output:
// contains 1? false
// oldest: 2 => two
// tiny len 1, has 2? true
