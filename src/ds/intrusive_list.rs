//! Intrusive doubly linked list backed by `SlotArena`, bounded by sentinels.
//!
//! Nodes live in a `SlotArena` and point at each other by `SlotId`, so a
//! handle stays valid across moves and splicing needs no raw pointers.
//! The two sentinel nodes are the arena's reserved slots 0 and 1 for the life of
//! the list; they carry no value and are never handed out, so link and
//! unlink never branch on "is this the first/last node".
//!
//! ## Architecture
//!
//! ```text
//!   arena (SlotArena<Node<T>>)
//!   ┌────────┬───────────────────────────────────────────┐
//!   │ SlotId │ Node { value, prev, next }                │
//!   ├────────┼───────────────────────────────────────────┤
//!   │ 0      │ { value: None,    prev: 0,   next: id_a } │  head sentinel
//!   │ 1      │ { value: None,    prev: id_c, next: 1 }   │  tail sentinel
//!   │ id_a   │ { value: Some(A), prev: 0,   next: id_b } │
//!   │ id_b   │ { value: Some(B), prev: id_a, next: id_c }│
//!   │ id_c   │ { value: Some(C), prev: id_b, next: 1 }   │
//!   └────────┴───────────────────────────────────────────┘
//!
//!   [HEAD] ◄──► [A] ◄──► [B] ◄──► [C] ◄──► [TAIL]
//!          front                  back
//! ```
//!
//! An empty list is `[HEAD] ◄──► [TAIL]`.
//!
//! ## Performance
//! - `push_front` / `push_back`: O(1)
//! - `pop_front` / `pop_back`: O(1)
//! - `move_to_front` / `move_to_back` / `remove`: O(1)
//! - `iter`: O(n)
//!
//! `validate()` walks the chain and reports the first broken link;
//! `debug_validate_invariants()` panics on the same conditions in debug/test builds.

use crate::ds::slot_arena::{SlotArena, SlotId};
use crate::error::InvariantError;

const HEAD: SlotId = SlotId(0);
const TAIL: SlotId = SlotId(1);

#[derive(Debug)]
struct Node<T> {
    value: Option<T>,
    prev: SlotId,
    next: SlotId,
}

impl<T> Node<T> {
    fn sentinel() -> Self {
        Self {
            value: None,
            prev: HEAD,
            next: TAIL,
        }
    }
}

/// Sentinel-bounded list of `T` addressed by [`SlotId`].
#[derive(Debug)]
pub struct IntrusiveList<T> {
    arena: SlotArena<Node<T>>,
}

impl<T> IntrusiveList<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Reserves room for `capacity` nodes plus the two sentinels.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: SlotArena::with_reserved([Node::sentinel(), Node::sentinel()], capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live data node check; sentinel ids always report `false`.
    pub fn contains(&self, id: SlotId) -> bool {
        self.arena.contains(id)
    }

    pub fn front(&self) -> Option<&T> {
        self.front_id().and_then(|id| self.get(id))
    }

    /// Id of the most recently pushed-front node.
    pub fn front_id(&self) -> Option<SlotId> {
        let id = self.next_of(HEAD);
        (id != TAIL).then_some(id)
    }

    pub fn back(&self) -> Option<&T> {
        self.back_id().and_then(|id| self.get(id))
    }

    /// Id of the node just before the tail sentinel.
    pub fn back_id(&self) -> Option<SlotId> {
        let id = self.prev_of(TAIL);
        (id != HEAD).then_some(id)
    }

    /// Values, front to back.
    pub fn iter(&self) -> IntrusiveListIter<'_, T> {
        IntrusiveListIter {
            list: self,
            current: self.next_of(HEAD),
        }
    }

    pub fn iter_ids(&self) -> impl Iterator<Item = SlotId> + '_ {
        self.iter_entries().map(|(id, _)| id)
    }

    /// `(SlotId, &T)` pairs, front to back.
    pub fn iter_entries(&self) -> IntrusiveListEntryIter<'_, T> {
        IntrusiveListEntryIter {
            list: self,
            current: self.next_of(HEAD),
        }
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.arena.get(id).and_then(|node| node.value.as_ref())
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.arena.get_mut(id).and_then(|node| node.value.as_mut())
    }

    /// Inserts a new node right after the head sentinel and returns its `SlotId`.
    pub fn push_front(&mut self, value: T) -> SlotId {
        let first = self.next_of(HEAD);
        let id = self.arena.insert(Node {
            value: Some(value),
            prev: HEAD,
            next: first,
        });
        self.link(HEAD, id);
        self.link(id, first);
        id
    }

    /// Inserts a new node right before the tail sentinel and returns its `SlotId`.
    pub fn push_back(&mut self, value: T) -> SlotId {
        let last = self.prev_of(TAIL);
        let id = self.arena.insert(Node {
            value: Some(value),
            prev: last,
            next: TAIL,
        });
        self.link(last, id);
        self.link(id, TAIL);
        id
    }

    pub fn pop_front(&mut self) -> Option<T> {
        let id = self.front_id()?;
        self.remove(id)
    }

    pub fn pop_back(&mut self) -> Option<T> {
        let id = self.back_id()?;
        self.remove(id)
    }

    /// Unlinks `id` and frees its slot for reuse.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        if !self.contains(id) {
            return None;
        }
        self.detach(id)?;
        self.arena.remove(id).and_then(|node| node.value)
    }

    /// Relinks `id` after the head sentinel. `false` if `id` is not live.
    pub fn move_to_front(&mut self, id: SlotId) -> bool {
        if !self.contains(id) {
            return false;
        }
        if self.next_of(HEAD) == id {
            return true;
        }
        if self.detach(id).is_none() {
            return false;
        }
        let first = self.next_of(HEAD);
        self.link(HEAD, id);
        self.link(id, first);
        true
    }

    /// Relinks `id` before the tail sentinel. `false` if `id` is not live.
    pub fn move_to_back(&mut self, id: SlotId) -> bool {
        if !self.contains(id) {
            return false;
        }
        if self.prev_of(TAIL) == id {
            return true;
        }
        if self.detach(id).is_none() {
            return false;
        }
        let last = self.prev_of(TAIL);
        self.link(last, id);
        self.link(id, TAIL);
        true
    }

    /// Frees every node and relinks the sentinels to each other.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.link(HEAD, TAIL);
    }

    /// Walks the chain from the head sentinel and checks every link.
    pub fn validate(&self) -> Result<(), InvariantError> {
        let len = self.len();
        let mut count = 0usize;
        let mut prev = HEAD;
        let mut current = self.next_of(HEAD);

        while current != TAIL {
            let node = self.arena.get(current).ok_or_else(|| {
                InvariantError::new(format!("list links to freed slot {}", current.index()))
            })?;
            if node.value.is_none() {
                return Err(InvariantError::new("sentinel reachable as a data node"));
            }
            if node.prev != prev {
                return Err(InvariantError::new(format!(
                    "slot {} has prev {} but is reached from {}",
                    current.index(),
                    node.prev.index(),
                    prev.index()
                )));
            }
            count += 1;
            if count > len {
                return Err(InvariantError::new("cycle detected in list"));
            }
            prev = current;
            current = node.next;
        }

        if self.prev_of(TAIL) != prev {
            return Err(InvariantError::new("tail sentinel does not point at last node"));
        }
        if count != len {
            return Err(InvariantError::new(format!(
                "list reaches {count} nodes but holds {len}"
            )));
        }
        Ok(())
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        if let Err(err) = self.validate() {
            panic!("intrusive list invariant violated: {err}");
        }
    }

    #[cfg(any(test, debug_assertions))]
    /// Returns the list order as SlotIds from front to back.
    pub fn debug_snapshot_ids(&self) -> Vec<SlotId> {
        self.iter_ids().collect()
    }

    fn next_of(&self, id: SlotId) -> SlotId {
        self.arena.get(id).map_or(TAIL, |node| node.next)
    }

    fn prev_of(&self, id: SlotId) -> SlotId {
        self.arena.get(id).map_or(HEAD, |node| node.prev)
    }

    fn link(&mut self, prev: SlotId, next: SlotId) {
        if let Some(node) = self.arena.get_mut(prev) {
            node.next = next;
        }
        if let Some(node) = self.arena.get_mut(next) {
            node.prev = prev;
        }
    }

    fn detach(&mut self, id: SlotId) -> Option<()> {
        let (prev, next) = {
            let node = self.arena.get(id)?;
            (node.prev, node.next)
        };
        self.link(prev, next);
        Some(())
    }
}

impl<T> Default for IntrusiveList<T> {
    fn default() -> Self {
        Self::new()
    }
}

pub struct IntrusiveListIter<'a, T> {
    list: &'a IntrusiveList<T>,
    current: SlotId,
}

impl<'a, T> Iterator for IntrusiveListIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current == TAIL {
            return None;
        }
        let node = self.list.arena.get(self.current)?;
        self.current = node.next;
        node.value.as_ref()
    }
}

pub struct IntrusiveListEntryIter<'a, T> {
    list: &'a IntrusiveList<T>,
    current: SlotId,
}

impl<'a, T> Iterator for IntrusiveListEntryIter<'a, T> {
    type Item = (SlotId, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        if self.current == TAIL {
            return None;
        }
        let id = self.current;
        let node = self.list.arena.get(id)?;
        self.current = node.next;
        node.value.as_ref().map(|value| (id, value))
    }
}
