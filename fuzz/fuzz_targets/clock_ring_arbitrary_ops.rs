#![no_main]

use evictkit::ds::ClockRing;
use libfuzzer_sys::fuzz_target;

// Arbitrary insert/get/peek/remove sequences. Evicted pairs must have been
// resident, and the ring must stay within capacity with a valid index.
fuzz_target!(|data: &[u8]| {
    let Some((&first, rest)) = data.split_first() else {
        return;
    };

    let capacity = first as usize % 33;
    let mut ring: ClockRing<u8, u32> = ClockRing::new(capacity);

    for chunk in rest.chunks_exact(3) {
        let key = chunk[1] % 64;
        let value = u32::from(chunk[2]);

        match chunk[0] % 5 {
            0 => {
                let existed = ring.contains(&key);
                let evicted = ring.insert(key, value);
                if let Some((victim, _)) = evicted {
                    assert!(!existed);
                    assert_ne!(victim, key);
                    assert!(!ring.contains(&victim));
                }
                if capacity > 0 {
                    assert_eq!(ring.peek(&key), Some(&value));
                }
            }
            1 => {
                let before = ring.peek(&key).copied();
                assert_eq!(ring.get(&key).copied(), before);
                if before.is_some() {
                    assert_eq!(ring.is_referenced(&key), Some(true));
                }
            }
            2 => {
                let referenced = ring.is_referenced(&key);
                let _ = ring.peek(&key);
                assert_eq!(ring.is_referenced(&key), referenced);
            }
            3 => {
                let existed = ring.contains(&key);
                assert_eq!(ring.remove(&key).is_some(), existed);
                assert!(!ring.contains(&key));
            }
            _ => {
                if chunk[2] == 0 {
                    ring.clear();
                    assert!(ring.is_empty());
                }
            }
        }

        assert!(ring.len() <= ring.capacity());
        assert!(capacity == 0 || ring.hand() < capacity);
        assert!(ring.validate().is_ok());
    }
});
