//! First-In-First-Out (FIFO) cache.
//!
//! Insertion order only. Reads never reorder, updates keep the original
//! position, and a new key arriving at a full cache evicts the oldest entry
//! (the node just before the tail sentinel) before it is linked at the head.
//!
//! ```text
//!   set(new)                                          evict when len ≥ capacity
//!      │                                                          ▲
//!      ▼                                                          │
//!   [HEAD] ◄──► [newest] ◄──► ... ◄──► [oldest] ◄──► [TAIL] ──────┘
//! ```
//!
//! Because eviction happens before the insert, a capacity-0 cache keeps the
//! most recent entry: the first insert finds nothing to evict, every later
//! distinct insert replaces it.
//!
//! ## Example
//!
//! ```
//! use evictkit::policy::fifo::FifoCache;
//! use evictkit::traits::ConcurrentCache;
//!
//! let cache = FifoCache::new(3);
//! cache.set("a", 1);
//! cache.set("b", 2);
//! cache.set("c", 3);
//!
//! for _ in 0..10 {
//!     cache.get(&"a");
//! }
//! cache.set("d", 4);
//!
//! assert!(!cache.contains(&"a"));
//! assert_eq!(cache.len(), 3);
//! ```

use std::fmt;
use std::hash::Hash;
use std::mem;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::ds::{IntrusiveList, SlotId};
use crate::error::InvariantError;
use crate::policy::{Entry, check_list_index, prealloc};
use crate::traits::{ConcurrentCache, CoreCache, MutableCache};

/// Single-threaded FIFO core.
pub struct FifoCore<K, V> {
    index: FxHashMap<K, SlotId>,
    list: IntrusiveList<Entry<K, V>>,
    capacity: usize,
}

impl<K, V> FifoCore<K, V>
where
    K: Clone + Eq + Hash,
{
    pub fn new(capacity: usize) -> Self {
        if capacity == 0 {
            debug!(policy = "fifo", "capacity 0: only the latest insert is kept");
        }
        Self {
            index: FxHashMap::with_capacity_and_hasher(prealloc(capacity), Default::default()),
            list: IntrusiveList::with_capacity(prealloc(capacity)),
            capacity,
        }
    }

    /// Returns the entry that the next eviction would remove.
    ///
    /// ```
    /// use evictkit::policy::fifo::FifoCore;
    /// use evictkit::traits::CoreCache;
    ///
    /// let mut cache = FifoCore::new(2);
    /// cache.insert("first", 1);
    /// cache.insert("second", 2);
    /// cache.get(&"first");
    /// assert_eq!(cache.peek_oldest(), Some((&"first", &1)));
    /// ```
    pub fn peek_oldest(&self) -> Option<(&K, &V)> {
        self.list.back().map(|entry| (&entry.key, &entry.value))
    }

    /// Verifies index/list correspondence and the capacity bound.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        check_list_index("fifo", &self.list, |key| self.index.get(key).copied())?;
        if self.index.len() != self.list.len() {
            return Err(InvariantError::new(format!(
                "fifo: index holds {} keys but list holds {}",
                self.index.len(),
                self.list.len()
            )));
        }
        let bound = self.capacity.max(1);
        if self.list.len() > bound {
            return Err(InvariantError::new(format!(
                "fifo: {} entries exceed bound {bound}",
                self.list.len()
            )));
        }
        Ok(())
    }

    fn evict_oldest(&mut self) {
        if let Some(entry) = self.list.pop_back() {
            self.index.remove(&entry.key);
            trace!(policy = "fifo", len = self.list.len(), "evicted oldest entry");
        }
    }
}

impl<K, V> CoreCache<K, V> for FifoCore<K, V>
where
    K: Clone + Eq + Hash,
{
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(&id) = self.index.get(&key) {
            return self
                .list
                .get_mut(id)
                .map(|entry| mem::replace(&mut entry.value, value));
        }

        if self.list.len() >= self.capacity {
            self.evict_oldest();
        }
        let id = self.list.push_front(Entry {
            key: key.clone(),
            value,
        });
        self.index.insert(key, id);
        None
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        self.peek(key)
    }

    fn peek(&self, key: &K) -> Option<&V> {
        let id = *self.index.get(key)?;
        self.list.get(id).map(|entry| &entry.value)
    }

    fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) {
        self.index.clear();
        self.list.clear();
    }
}

impl<K, V> MutableCache<K, V> for FifoCore<K, V>
where
    K: Clone + Eq + Hash,
{
    fn remove(&mut self, key: &K) -> Option<V> {
        let id = self.index.remove(key)?;
        self.list.remove(id).map(|entry| entry.value)
    }
}

impl<K, V> fmt::Debug for FifoCore<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FifoCore")
            .field("len", &self.index.len())
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

/// Thread-safe FIFO cache: one exclusive lock around a [`FifoCore`].
pub struct FifoCache<K, V> {
    inner: Mutex<FifoCore<K, V>>,
}

impl<K, V> FifoCache<K, V>
where
    K: Clone + Eq + Hash,
{
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(FifoCore::new(capacity)),
        }
    }

    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.inner.lock().check_invariants()
    }

    pub fn into_inner(self) -> FifoCore<K, V> {
        self.inner.into_inner()
    }
}

impl<K, V> ConcurrentCache<K, V> for FifoCache<K, V>
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

impl<K, V> fmt::Debug for FifoCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = self.inner.lock();
        f.debug_struct("FifoCache")
            .field("len", &cache.index.len())
            .field("capacity", &cache.capacity)
            .finish_non_exhaustive()
    }
}
