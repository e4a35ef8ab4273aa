#![no_main]

use evictkit::policy::slru::{Segment, SlruCore};
use evictkit::traits::{CoreCache, MutableCache};
use libfuzzer_sys::fuzz_target;

// Arbitrary operations on an SLRU core with a fuzzed split. Both segments
// must respect their bounds and a hit must always land in protected.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let capacity = data[0] as usize % 40;
    let percent = data[1] % 101;
    let mut cache: SlruCore<u8, u32> = SlruCore::with_ratio(capacity, percent);

    for chunk in data[2..].chunks_exact(2) {
        let key = chunk[1] % 48;

        match chunk[0] % 5 {
            0 | 1 => {
                cache.insert(key, u32::from(chunk[0]));
                assert!(cache.contains(&key));
            }
            2 => {
                if cache.get(&key).is_some() {
                    assert_eq!(cache.segment_of(&key), Some(Segment::Protected));
                }
            }
            3 => {
                let segment = cache.segment_of(&key);
                let _ = cache.peek(&key);
                assert_eq!(cache.segment_of(&key), segment);
            }
            _ => {
                let existed = cache.contains(&key);
                assert_eq!(cache.remove(&key).is_some(), existed);
            }
        }

        assert!(cache.protected_len() <= cache.protected_capacity());
        assert!(cache.probation_len() <= cache.probation_capacity());
        assert!(cache.len() <= cache.capacity());
        assert!(cache.check_invariants().is_ok());
    }
});
