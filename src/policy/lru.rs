//! # Least Recently Used (LRU) Cache
//!
//! Recency-ordered cache: every `get` or update moves the entry to the head
//! of the list, and inserting past capacity evicts the entry just before the
//! tail sentinel.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                          LruCache<K, V>                              │
//!   │                                                                      │
//!   │   ┌──────────────────────────────────────────────────────────────┐   │
//!   │   │                 parking_lot::Mutex<LruCore<K, V>>            │   │
//!   │   └──────────────────────────────────────────────────────────────┘   │
//!   │                                 │                                    │
//!   │                                 ▼                                    │
//!   │   ┌──────────────────────────────────────────────────────────────┐   │
//!   │   │  index: FxHashMap<K, SlotId>                                 │   │
//!   │   │                                                              │   │
//!   │   │  list: IntrusiveList<Entry<K, V>>                            │   │
//!   │   │                                                              │   │
//!   │   │  [HEAD] ◄──► [id_1] ◄──► [id_2] ◄──► [id_3] ◄──► [TAIL]      │   │
//!   │   │               MRU                     LRU                    │   │
//!   │   └──────────────────────────────────────────────────────────────┘   │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations
//!
//! | Operation | Effect                                          | Time |
//! |-----------|-------------------------------------------------|------|
//! | `insert`  | new → head, evict tail if over capacity         | O(1) |
//! |           | existing → update value, move to head           |      |
//! | `get`     | move to head                                    | O(1) |
//! | `peek`    | no reorder                                      | O(1) |
//! | `remove`  | unlink from list and index                      | O(1) |
//!
//! A capacity of 0 retains nothing: each insert is evicted immediately.
//!
//! ## Example
//!
//! ```
//! use evictkit::policy::lru::LruCache;
//! use evictkit::traits::ConcurrentCache;
//!
//! let cache = LruCache::new(3);
//! cache.set("a", 1);
//! cache.set("b", 2);
//! cache.set("c", 3);
//!
//! cache.get(&"a");      // a becomes most recently used
//! cache.set("d", 4);    // evicts b
//!
//! assert!(!cache.contains(&"b"));
//! assert_eq!(cache.peek(&"a"), Some(1));
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

/// Single-threaded LRU core.
///
/// # Example
///
/// ```
/// use evictkit::policy::lru::LruCore;
/// use evictkit::traits::CoreCache;
///
/// let mut cache = LruCore::new(2);
/// cache.insert(1, "one");
/// cache.insert(2, "two");
/// assert_eq!(cache.peek_lru(), Some((&1, &"one")));
///
/// cache.get(&1);
/// assert_eq!(cache.peek_lru(), Some((&2, &"two")));
/// ```
pub struct LruCore<K, V> {
    index: FxHashMap<K, SlotId>,
    list: IntrusiveList<Entry<K, V>>,
    capacity: usize,
}

impl<K, V> LruCore<K, V>
where
    K: Clone + Eq + Hash,
{
    /// Creates an empty core holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        if capacity == 0 {
            debug!(policy = "lru", "capacity 0: every insert is evicted immediately");
        }
        Self {
            index: FxHashMap::with_capacity_and_hasher(prealloc(capacity), Default::default()),
            list: IntrusiveList::with_capacity(prealloc(capacity)),
            capacity,
        }
    }

    /// Returns the least recently used entry without touching recency.
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        self.list.back().map(|entry| (&entry.key, &entry.value))
    }

    /// Verifies index/list correspondence and the capacity bound.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        check_list_index("lru", &self.list, |key| self.index.get(key).copied())?;
        if self.index.len() != self.list.len() {
            return Err(InvariantError::new(format!(
                "lru: index holds {} keys but list holds {}",
                self.index.len(),
                self.list.len()
            )));
        }
        if self.list.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "lru: {} entries exceed capacity {}",
                self.list.len(),
                self.capacity
            )));
        }
        Ok(())
    }

    fn evict_lru(&mut self) {
        if let Some(entry) = self.list.pop_back() {
            self.index.remove(&entry.key);
            trace!(policy = "lru", len = self.list.len(), "evicted least recently used entry");
        }
    }
}

impl<K, V> CoreCache<K, V> for LruCore<K, V>
where
    K: Clone + Eq + Hash,
{
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(&id) = self.index.get(&key) {
            self.list.move_to_front(id);
            return self
                .list
                .get_mut(id)
                .map(|entry| mem::replace(&mut entry.value, value));
        }

        let id = self.list.push_front(Entry {
            key: key.clone(),
            value,
        });
        self.index.insert(key, id);
        if self.list.len() > self.capacity {
            self.evict_lru();
        }
        None
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        let id = *self.index.get(key)?;
        self.list.move_to_front(id);
        self.list.get(id).map(|entry| &entry.value)
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

impl<K, V> MutableCache<K, V> for LruCore<K, V>
where
    K: Clone + Eq + Hash,
{
    fn remove(&mut self, key: &K) -> Option<V> {
        let id = self.index.remove(key)?;
        self.list.remove(id).map(|entry| entry.value)
    }
}

impl<K, V> fmt::Debug for LruCore<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCore")
            .field("len", &self.index.len())
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

/// Thread-safe LRU cache: one exclusive lock around an [`LruCore`].
///
/// Reads take the same lock as writes because `get` reorders the list.
pub struct LruCache<K, V> {
    inner: Mutex<LruCore<K, V>>,
}

impl<K, V> LruCache<K, V>
where
    K: Clone + Eq + Hash,
{
    /// Creates a new thread-safe LRU cache with the given capacity.
    ///
    /// # Example
    ///
    /// ```
    /// use evictkit::policy::lru::LruCache;
    /// use evictkit::traits::ConcurrentCache;
    ///
    /// let cache: LruCache<u32, String> = LruCache::new(100);
    /// assert_eq!(cache.capacity(), 100);
    /// assert!(cache.is_empty());
    /// ```
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(LruCore::new(capacity)),
        }
    }

    /// Runs [`LruCore::check_invariants`] under the lock.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.inner.lock().check_invariants()
    }

    /// Consumes the cache and returns the core.
    pub fn into_inner(self) -> LruCore<K, V> {
        self.inner.into_inner()
    }
}

impl<K, V> ConcurrentCache<K, V> for LruCache<K, V>
where
    K: Clone + Eq + Hash + Send,
    V: Send,
{
    fn set(&self, key: K, value: V) {
        let mut cache = self.inner.lock();
        cache.insert(key, value);
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
        let mut cache = self.inner.lock();
        cache.remove(key).is_some()
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

impl<K, V> fmt::Debug for LruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = self.inner.lock();
        f.debug_struct("LruCache")
            .field("len", &cache.index.len())
            .field("capacity", &cache.capacity)
            .finish_non_exhaustive()
    }
}
