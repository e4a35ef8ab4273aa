//! Clock cache replacement policy.
//!
//! Second-chance approximation of LRU. Reads only set a reference bit, so a
//! hit costs a hash lookup and a store; the ordering work is deferred to the
//! sweep that runs when a new key meets a full ring.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        ClockCache<K, V> Layout                          │
//! │                                                                         │
//! │   parking_lot::Mutex<ClockCore<K, V>>                                   │
//! │        │                                                                │
//! │        ▼                                                                │
//! │   ClockRing<K, V>                                                       │
//! │     index: FxHashMap<K, usize>                                          │
//! │     slots:   [0]   [1]   [2]   [3]                                      │
//! │             ┌───┐ ┌───┐ ┌───┐ ┌───┐                                     │
//! │             │ A │ │ B │ │ C │ │ D │                                     │
//! │             │ref│ │   │ │ref│ │   │                                     │
//! │             └───┘ └───┘ └───┘ └───┘                                     │
//! │               ▲                                                         │
//! │              hand                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Algorithm
//!
//! ```text
//! GET(key):     set referenced = true, return value
//! PEEK(key):    return value
//! INSERT(key):
//!   existing → update value, set referenced = true
//!   new      → if len == capacity: sweep
//!              probe from hand for an empty slot, place (ref = 0),
//!              advance hand past it
//! SWEEP:
//!   at hand: ref=1 → clear, advance;  ref=0 → evict, stop
//! ```
//!
//! ## Performance Characteristics
//!
//! | Operation | Time    | Notes                            |
//! |-----------|---------|----------------------------------|
//! | `get`     | O(1)    | Hash lookup + bit set            |
//! | `insert`  | O(1)*   | Amortized; a sweep clears bits   |
//! | `peek`    | O(1)    | Hash lookup only                 |
//! | `remove`  | O(1)    | Slot emptied, hand unchanged     |
//!
//! A capacity-0 cache has no slots and silently drops every new key.

use std::fmt;
use std::hash::Hash;
use std::mem;

use parking_lot::Mutex;
use tracing::debug;

use crate::ds::ClockRing;
use crate::error::InvariantError;
use crate::traits::{ConcurrentCache, CoreCache, MutableCache};

/// Single-threaded Clock core.
///
/// # Example
///
/// ```
/// use evictkit::policy::clock::ClockCore;
/// use evictkit::traits::CoreCache;
///
/// let mut cache = ClockCore::new(3);
/// cache.insert("a", 1);
/// cache.insert("b", 2);
/// cache.insert("c", 3);
/// cache.get(&"a");
///
/// cache.insert("d", 4); // a gets a second chance, b goes
/// assert!(cache.contains(&"a"));
/// assert!(!cache.contains(&"b"));
/// assert_eq!(cache.is_referenced(&"a"), Some(false));
/// ```
pub struct ClockCore<K, V> {
    ring: ClockRing<K, V>,
}

impl<K, V> ClockCore<K, V>
where
    K: Clone + Eq + Hash,
{
    pub fn new(capacity: usize) -> Self {
        if capacity == 0 {
            debug!(policy = "clock", "capacity 0: new keys are dropped");
        }
        Self {
            ring: ClockRing::new(capacity),
        }
    }

    /// Reference bit of `key`, or `None` if absent.
    pub fn is_referenced(&self, key: &K) -> Option<bool> {
        self.ring.is_referenced(key)
    }

    /// Slot index the next probe or sweep starts from.
    pub fn hand(&self) -> usize {
        self.ring.hand()
    }

    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.ring
            .validate()
            .map_err(|err| InvariantError::new(format!("clock: {err}")))
    }
}

impl<K, V> CoreCache<K, V> for ClockCore<K, V>
where
    K: Clone + Eq + Hash,
{
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(existing) = self.ring.get_mut(&key) {
            return Some(mem::replace(existing, value));
        }
        self.ring.insert(key, value);
        None
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        self.ring.get(key)
    }

    fn peek(&self, key: &K) -> Option<&V> {
        self.ring.peek(key)
    }

    fn contains(&self, key: &K) -> bool {
        self.ring.contains(key)
    }

    fn len(&self) -> usize {
        self.ring.len()
    }

    fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    fn clear(&mut self) {
        self.ring.clear();
    }
}

impl<K, V> MutableCache<K, V> for ClockCore<K, V>
where
    K: Clone + Eq + Hash,
{
    fn remove(&mut self, key: &K) -> Option<V> {
        self.ring.remove(key)
    }
}

impl<K, V> fmt::Debug for ClockCore<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClockCore")
            .field("len", &self.ring.len())
            .field("capacity", &self.ring.capacity())
            .field("hand", &self.ring.hand())
            .finish_non_exhaustive()
    }
}

/// Thread-safe Clock cache: one exclusive lock around a [`ClockCore`].
///
/// `get` only flips a bit but still takes the exclusive lock, like every
/// other operation.
pub struct ClockCache<K, V> {
    inner: Mutex<ClockCore<K, V>>,
}

impl<K, V> ClockCache<K, V>
where
    K: Clone + Eq + Hash,
{
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(ClockCore::new(capacity)),
        }
    }

    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.inner.lock().check_invariants()
    }

    pub fn into_inner(self) -> ClockCore<K, V> {
        self.inner.into_inner()
    }
}

impl<K, V> ConcurrentCache<K, V> for ClockCache<K, V>
where
    K: Clone + Eq + Hash + Send,
    V: Send,
{
    fn set(&self, key: K, value: V) {
        self.inner.lock().insert(key, value);
    }

    fn get_with<R>(&self, key: &K, f: impl FnOnce(&V) -> R) -> Option<R> {
        let mut cache = self.inner.lock();
        cache.get(key).map(f)
    }

    fn peek_with<R>(&self, key: &K, f: impl FnOnce(&V) -> R) -> Option<R> {
        let cache = self.inner.lock();
        cache.peek(key).map(f)
    }

    fn delete(&self, key: &K) -> bool {
        self.inner.lock().remove(key).is_some()
    }

    fn len(&self) -> usize {
        self.inner.lock().len()
    }

    fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    fn contains(&self, key: &K) -> bool {
        self.inner.lock().contains(key)
    }

    fn clear(&self) {
        self.inner.lock().clear();
    }
}

impl<K, V> fmt::Debug for ClockCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = self.inner.lock();
        f.debug_struct("ClockCache")
            .field("len", &cache.ring.len())
            .field("capacity", &cache.ring.capacity())
            .finish_non_exhaustive()
    }
}
