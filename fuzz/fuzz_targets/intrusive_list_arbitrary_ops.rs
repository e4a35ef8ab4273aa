#![no_main]

use std::collections::VecDeque;

use evictkit::ds::{IntrusiveList, SlotId};
use libfuzzer_sys::fuzz_target;

// Arbitrary push/pop/move/remove sequences checked against a VecDeque of
// (id, value) pairs. Ids are only reused through the model, never stale.
fuzz_target!(|data: &[u8]| {
    let mut list: IntrusiveList<u32> = IntrusiveList::new();
    let mut model: VecDeque<(SlotId, u32)> = VecDeque::new();

    for chunk in data.chunks_exact(2) {
        let value = u32::from(chunk[1]);
        match chunk[0] % 8 {
            0 => {
                let id = list.push_front(value);
                model.push_front((id, value));
            }
            1 => {
                let id = list.push_back(value);
                model.push_back((id, value));
            }
            2 => {
                assert_eq!(list.pop_front(), model.pop_front().map(|(_, v)| v));
            }
            3 => {
                assert_eq!(list.pop_back(), model.pop_back().map(|(_, v)| v));
            }
            4 if !model.is_empty() => {
                let pos = value as usize % model.len();
                if let Some(entry) = model.remove(pos) {
                    assert!(list.move_to_front(entry.0));
                    model.push_front(entry);
                }
            }
            5 if !model.is_empty() => {
                let pos = value as usize % model.len();
                if let Some(entry) = model.remove(pos) {
                    assert!(list.move_to_back(entry.0));
                    model.push_back(entry);
                }
            }
            6 if !model.is_empty() => {
                let pos = value as usize % model.len();
                if let Some((id, v)) = model.remove(pos) {
                    assert_eq!(list.remove(id), Some(v));
                    assert!(!list.contains(id));
                }
            }
            7 => {
                list.clear();
                model.clear();
            }
            _ => {}
        }

        assert_eq!(list.len(), model.len());
        assert_eq!(list.front(), model.front().map(|(_, v)| v));
        assert_eq!(list.back(), model.back().map(|(_, v)| v));
        assert!(list.validate().is_ok());
    }

    let values: Vec<u32> = list.iter().copied().collect();
    let expected: Vec<u32> = model.iter().map(|&(_, v)| v).collect();
    assert_eq!(values, expected);
});
