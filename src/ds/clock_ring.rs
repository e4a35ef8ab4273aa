//! Clock-sweep ring for second-chance eviction.
//!
//! A fixed-length slot array plus a hand. Reads set a per-slot reference bit;
//! when the ring is full the hand sweeps forward, clearing set bits and
//! evicting the first entry whose bit is already clear.
//!
//! ## Architecture
//!
//! ```text
//!   ┌───────────────────────────────────────────────────────────────────┐
//!   │                        ClockRing<K, V>                            │
//!   │                                                                   │
//!   │   slots: Vec<Option<Slot<K,V>>>          (length == capacity)     │
//!   │   hand ─────────────────────────────┐                             │
//!   │                                     ▼                             │
//!   │   index: FxHashMap<K, usize>   slot[0] = { A, ref:1 }             │
//!   │   ┌───────┬─────┐              slot[1] = { B, ref:0 }             │
//!   │   │ key A │  0  │              slot[2] = { C, ref:1 }             │
//!   │   │ key B │  1  │              slot[3] = None                     │
//!   │   │ key C │  2  │                                                 │
//!   │   └───────┴─────┘                                                 │
//!   └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Insert Flow (new key)
//!
//! ```text
//!   len == capacity?
//!     YES → sweep: ref=1 → clear, advance; ref=0 → evict, stop (hand stays)
//!   probe from hand for an empty slot
//!   place entry with ref=0, advance hand past it
//! ```
//!
//! The hand does not move on eviction, so the freed slot is the one the
//! probe finds first.
//!
//! ## Performance
//!
//! | Operation | Time        | Notes                               |
//! |-----------|-------------|-------------------------------------|
//! | `insert`  | O(1) amort. | Sweep bounded by two passes          |
//! | `get`     | O(1)        | Sets reference bit                   |
//! | `peek`    | O(1)        | Bit untouched                        |
//! | `remove`  | O(1)        | Empties slot, hand unchanged         |
//!
//! A ring of capacity 0 has no slots and drops every new key.
use std::hash::Hash;

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::error::InvariantError;

#[derive(Debug)]
struct Slot<K, V> {
    key: K,
    value: V,
    referenced: bool,
}

#[derive(Debug)]
/// Fixed-size ring implementing the CLOCK (second-chance) eviction algorithm.
pub struct ClockRing<K, V> {
    slots: Vec<Option<Slot<K, V>>>,
    index: FxHashMap<K, usize>,
    hand: usize,
    len: usize,
}

// Accessors that never touch keys.
impl<K, V> ClockRing<K, V> {
    /// Returns the configured capacity (number of slots).
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of occupied slots.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current hand position.
    pub fn hand(&self) -> usize {
        self.hand
    }
}

impl<K, V> ClockRing<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a new ring with `capacity` slots, all empty.
    pub fn new(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self {
            slots,
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            hand: 0,
            len: 0,
        }
    }

    /// Returns `true` if `key` is present.
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Returns `key`'s value without setting the reference bit.
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.slot(key).map(|slot| &slot.value)
    }

    /// Returns `key`'s value and sets the reference bit.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        self.get_mut(key).map(|value| &*value)
    }

    /// Returns a mutable reference to `key`'s value and sets the reference bit.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let idx = *self.index.get(key)?;
        let slot = self.slots.get_mut(idx)?.as_mut()?;
        slot.referenced = true;
        Some(&mut slot.value)
    }

    /// Reports the reference bit for `key`, or `None` if absent.
    pub fn is_referenced(&self, key: &K) -> Option<bool> {
        self.slot(key).map(|slot| slot.referenced)
    }

    /// Inserts or updates `key`.
    ///
    /// An existing key is updated in place and referenced. A new key entering
    /// a full ring evicts via the sweep and the evicted pair is returned.
    pub fn insert(&mut self, key: K, value: V) -> Option<(K, V)> {
        if self.capacity() == 0 {
            return None;
        }

        if let Some(existing) = self.get_mut(&key) {
            *existing = value;
            return None;
        }

        let evicted = if self.len == self.capacity() {
            self.sweep()
        } else {
            None
        };

        let Some(idx) = self.probe_free_slot() else {
            return evicted;
        };
        self.slots[idx] = Some(Slot {
            key: key.clone(),
            value,
            referenced: false,
        });
        self.index.insert(key, idx);
        self.len += 1;
        self.advance_hand();
        evicted
    }

    /// Removes `key` and returns its value. The hand is not moved.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let idx = self.index.remove(key)?;
        let slot = self.slots.get_mut(idx)?.take()?;
        self.len -= 1;
        Some(slot.value)
    }

    /// Empties every slot and resets the hand.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.index.clear();
        self.hand = 0;
        self.len = 0;
    }

    /// Checks occupancy, index correspondence and hand bounds.
    pub fn validate(&self) -> Result<(), InvariantError> {
        let occupied = self.slots.iter().filter(|slot| slot.is_some()).count();
        if occupied != self.len {
            return Err(InvariantError::new(format!(
                "ring has {occupied} occupied slots but len {}",
                self.len
            )));
        }
        if self.index.len() != self.len {
            return Err(InvariantError::new(format!(
                "ring index holds {} keys but len {}",
                self.index.len(),
                self.len
            )));
        }
        if self.len > self.capacity() {
            return Err(InvariantError::new("ring len exceeds capacity"));
        }

        let hand_ok = if self.capacity() == 0 {
            self.hand == 0
        } else {
            self.hand < self.capacity()
        };
        if !hand_ok {
            return Err(InvariantError::new(format!(
                "hand {} out of range for capacity {}",
                self.hand,
                self.capacity()
            )));
        }

        for (key, &idx) in &self.index {
            match self.slots.get(idx).and_then(Option::as_ref) {
                Some(slot) if &slot.key == key => {}
                Some(_) => {
                    return Err(InvariantError::new(format!(
                        "slot {idx} holds a different key than the index claims"
                    )));
                }
                None => {
                    return Err(InvariantError::new(format!("index points to empty slot {idx}")));
                }
            }
        }
        Ok(())
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        if let Err(err) = self.validate() {
            panic!("clock ring invariant violated: {err}");
        }
    }

    #[cfg(any(test, debug_assertions))]
    /// Returns a debug snapshot of slot occupancy in ring order.
    pub fn debug_snapshot_slots(&self) -> Vec<Option<(&K, bool)>> {
        self.slots
            .iter()
            .map(|slot| slot.as_ref().map(|slot| (&slot.key, slot.referenced)))
            .collect()
    }

    fn slot(&self, key: &K) -> Option<&Slot<K, V>> {
        let idx = *self.index.get(key)?;
        self.slots.get(idx)?.as_ref()
    }

    // Two passes suffice: the first clears every set bit it passes.
    fn sweep(&mut self) -> Option<(K, V)> {
        for _ in 0..self.capacity().saturating_mul(2) {
            let idx = self.hand;
            let referenced = self.slots[idx]
                .as_mut()
                .map(|slot| std::mem::replace(&mut slot.referenced, false));
            match referenced {
                Some(true) | None => self.advance_hand(),
                Some(false) => {
                    let slot = self.slots[idx].take()?;
                    self.index.remove(&slot.key);
                    self.len -= 1;
                    trace!(slot = idx, len = self.len, "clock ring evicted entry");
                    return Some((slot.key, slot.value));
                }
            }
        }
        None
    }

    fn probe_free_slot(&mut self) -> Option<usize> {
        for _ in 0..self.capacity() {
            let idx = self.hand;
            if self.slots[idx].is_none() {
                return Some(idx);
            }
            self.advance_hand();
        }
        None
    }

    fn advance_hand(&mut self) {
        let cap = self.capacity();
        if cap == 0 {
            self.hand = 0;
        } else {
            self.hand = (self.hand + 1) % cap;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_ring_insert_and_peek_no_eviction() {
        let mut ring = ClockRing::new(3);
        assert_eq!(ring.insert("a", 1), None);
        assert_eq!(ring.insert("b", 2), None);
        assert_eq!(ring.insert("c", 3), None);
        assert_eq!(ring.len(), 3);
        assert_eq!(ring.peek(&"a"), Some(&1));
        assert_eq!(ring.peek(&"b"), Some(&2));
        assert_eq!(ring.peek(&"c"), Some(&3));
        assert_eq!(ring.hand(), 0);
        ring.debug_validate_invariants();
    }

    #[test]
    fn clock_ring_zero_capacity_drops_inserts() {
        let mut ring = ClockRing::<&str, i32>::new(0);
        assert_eq!(ring.capacity(), 0);
        assert_eq!(ring.insert("a", 1), None);
        assert!(ring.is_empty());
        assert!(ring.peek(&"a").is_none());
        assert!(ring.get(&"a").is_none());
        assert!(!ring.contains(&"a"));
        ring.debug_validate_invariants();
    }

    #[test]
    fn clock_ring_update_sets_reference_bit_without_growing() {
        let mut ring = ClockRing::new(2);
        ring.insert("a", 1);
        ring.insert("b", 2);
        assert_eq!(ring.is_referenced(&"a"), Some(false));

        assert_eq!(ring.insert("a", 10), None);
        assert_eq!(ring.len(), 2);
        assert_eq!(ring.peek(&"a"), Some(&10));
        assert_eq!(ring.is_referenced(&"a"), Some(true));
    }

    #[test]
    fn clock_ring_second_chance_clears_bit_and_evicts_next() {
        let mut ring = ClockRing::new(3);
        ring.insert("a", 1);
        ring.insert("b", 2);
        ring.insert("c", 3);
        assert_eq!(ring.get(&"a"), Some(&1));

        let evicted = ring.insert("d", 4);
        assert_eq!(evicted, Some(("b", 2)));
        assert_eq!(ring.is_referenced(&"a"), Some(false));
        assert!(ring.contains(&"d"));
        // d reused slot 1, hand sits just past it.
        assert_eq!(ring.hand(), 2);
        ring.debug_validate_invariants();
    }

    #[test]
    fn clock_ring_all_referenced_evicts_at_hand_after_full_pass() {
        let mut ring = ClockRing::new(2);
        ring.insert("a", 1);
        ring.insert("b", 2);
        ring.get(&"a");
        ring.get(&"b");

        let evicted = ring.insert("c", 3);
        assert_eq!(evicted, Some(("a", 1)));
        assert_eq!(ring.is_referenced(&"b"), Some(false));
        ring.debug_validate_invariants();
    }

    #[test]
    fn clock_ring_peek_leaves_bit_clear() {
        let mut ring = ClockRing::new(2);
        ring.insert("a", 1);
        ring.insert("b", 2);
        for _ in 0..5 {
            assert_eq!(ring.peek(&"a"), Some(&1));
        }
        assert_eq!(ring.is_referenced(&"a"), Some(false));
        assert_eq!(ring.insert("c", 3), Some(("a", 1)));
    }

    #[test]
    fn clock_ring_remove_then_insert_reuses_slot_without_eviction() {
        let mut ring = ClockRing::new(3);
        ring.insert("a", 1);
        ring.insert("b", 2);
        ring.insert("c", 3);

        assert_eq!(ring.remove(&"b"), Some(2));
        assert_eq!(ring.remove(&"b"), None);
        assert_eq!(ring.len(), 2);

        assert_eq!(ring.insert("d", 4), None);
        assert_eq!(ring.len(), 3);
        let snapshot = ring.debug_snapshot_slots();
        assert_eq!(snapshot[1], Some((&"d", false)));
        ring.debug_validate_invariants();
    }

    #[test]
    fn clock_ring_capacity_one_replaces_sole_entry() {
        let mut ring = ClockRing::new(1);
        ring.insert("a", 1);
        ring.get(&"a");
        assert_eq!(ring.insert("b", 2), Some(("a", 1)));
        assert_eq!(ring.len(), 1);
        assert_eq!(ring.hand(), 0);
        ring.debug_validate_invariants();
    }

    #[test]
    fn clock_ring_clear_resets_hand() {
        let mut ring = ClockRing::new(3);
        ring.insert("a", 1);
        ring.insert("b", 2);
        ring.clear();
        assert!(ring.is_empty());
        assert_eq!(ring.hand(), 0);
        assert_eq!(ring.capacity(), 3);
        ring.insert("c", 3);
        assert_eq!(ring.peek(&"c"), Some(&3));
        ring.debug_validate_invariants();
    }
}
