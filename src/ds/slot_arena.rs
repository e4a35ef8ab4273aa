//! Slot storage addressed by [`SlotId`], with a reserved prefix.
//!
//! The first `reserved` slots are filled at construction and pinned: they can
//! be read and written through their ids but never removed, and `clear` keeps
//! them. Every slot after the prefix is a regular value slot; freed ones go on
//! a free list and the next `insert` takes the most recently freed one.
//!
//! ```text
//!   slots: [ R0 | R1 | v | _ | v | v ]      free_list: [3]
//!            └reserved┘ └──── live / free ───┘
//! ```
//!
//! `len` counts live values after the prefix only.

/// Stable handle into a [`SlotArena`]; valid until its slot is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(pub(crate) usize);

impl SlotId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug)]
pub struct SlotArena<T> {
    slots: Vec<Option<T>>,
    free_list: Vec<usize>,
    reserved: usize,
    live: usize,
}

impl<T> SlotArena<T> {
    /// An arena with no reserved slots.
    pub fn new() -> Self {
        Self::with_reserved([], 0)
    }

    /// Pins `reserved` at ids `0..n` and preallocates `capacity` value slots.
    pub fn with_reserved<const N: usize>(reserved: [T; N], capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity.saturating_add(N));
        slots.extend(reserved.into_iter().map(Some));
        Self {
            slots,
            free_list: Vec::new(),
            reserved: N,
            live: 0,
        }
    }

    pub fn is_reserved(&self, id: SlotId) -> bool {
        id.0 < self.reserved
    }

    pub fn insert(&mut self, value: T) -> SlotId {
        self.live += 1;
        match self.free_list.pop() {
            Some(idx) => {
                self.slots[idx] = Some(value);
                SlotId(idx)
            },
            None => {
                self.slots.push(Some(value));
                SlotId(self.slots.len() - 1)
            },
        }
    }

    /// Takes the value out of a live slot. Reserved ids always yield `None`.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        if self.is_reserved(id) {
            return None;
        }
        let value = self.slots.get_mut(id.0)?.take()?;
        self.free_list.push(id.0);
        self.live -= 1;
        Some(value)
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.slots.get(id.0)?.as_ref()
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.slots.get_mut(id.0)?.as_mut()
    }

    /// `true` for a live value slot; reserved ids report `false`.
    pub fn contains(&self, id: SlotId) -> bool {
        !self.is_reserved(id) && self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Slots allocated so far, reserved, live and free.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Drops every value slot; reserved slots keep their current contents.
    pub fn clear(&mut self) {
        self.slots.truncate(self.reserved);
        self.free_list.clear();
        self.live = 0;
    }
}

impl<T> Default for SlotArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn freed_slot_is_taken_by_next_insert() {
        let mut arena = SlotArena::new();
        let first = arena.insert('p');
        let second = arena.insert('q');
        assert_eq!(arena.remove(first), Some('p'));

        let third = arena.insert('r');
        assert_eq!(third, first);
        assert_eq!(arena.get(third), Some(&'r'));
        assert_eq!(arena.get(second), Some(&'q'));
        assert_eq!((arena.len(), arena.slot_count()), (2, 2));
    }

    #[test]
    fn stale_and_unknown_ids_are_absent() {
        let mut arena = SlotArena::new();
        let id = arena.insert(7u32);
        assert_eq!(arena.remove(id), Some(7));
        assert_eq!(arena.remove(id), None);
        assert!(!arena.contains(id));
        assert!(arena.is_empty());

        let unknown = SlotId(99);
        assert!(arena.get(unknown).is_none());
        assert!(arena.get_mut(unknown).is_none());
        assert!(arena.remove(unknown).is_none());
    }

    mod reserved {
        use super::*;

        #[test]
        fn prefix_is_pinned_and_uncounted() {
            let mut arena = SlotArena::with_reserved(["head", "tail"], 4);
            assert_eq!(arena.len(), 0);
            assert_eq!(arena.slot_count(), 2);

            let head = SlotId(0);
            assert!(arena.is_reserved(head));
            assert!(!arena.contains(head));
            assert_eq!(arena.get(head), Some(&"head"));
            assert_eq!(arena.remove(head), None);

            let id = arena.insert("value");
            assert_eq!(id.index(), 2);
            assert!(!arena.is_reserved(id));
            assert_eq!(arena.len(), 1);
        }

        #[test]
        fn clear_keeps_reserved_contents() {
            let mut arena = SlotArena::with_reserved([10, 20], 0);
            if let Some(slot) = arena.get_mut(SlotId(1)) {
                *slot = 21;
            }
            for n in 0..3 {
                arena.insert(n);
            }
            arena.remove(SlotId(3));

            arena.clear();
            assert!(arena.is_empty());
            assert_eq!(arena.slot_count(), 2);
            assert_eq!(arena.get(SlotId(1)), Some(&21));
            assert_eq!(arena.insert(5).index(), 2);
        }
    }
}
