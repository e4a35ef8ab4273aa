//! # Cache Trait Hierarchy
//!
//! Two layers of contract: single-threaded cores that mutate through
//! `&mut self` and lend out references, and thread-safe caches that take
//! `&self`, lock internally, and hand back owned values.
//!
//! ## Architecture
//!
//! ```text
//!   ┌─────────────────────────────────────────┐
//!   │            CoreCache<K, V>              │
//!   │                                         │
//!   │  insert(&mut, K, V) → Option<V>         │
//!   │  get(&mut, &K) → Option<&V>             │
//!   │  peek(&, &K) → Option<&V>               │
//!   │  contains(&, &K) → bool                 │
//!   │  len / is_empty / capacity              │
//!   │  clear(&mut)                            │
//!   └──────────────────┬──────────────────────┘
//!                      │
//!                      ▼
//!   ┌─────────────────────────────────────────┐
//!   │          MutableCache<K, V>             │
//!   │  remove(&mut, &K) → Option<V>           │
//!   └─────────────────────────────────────────┘
//!        implemented by LruCore, SlruCore, ClockCore, FifoCore
//!
//!   ┌─────────────────────────────────────────┐
//!   │   ConcurrentCache<K, V>: Send + Sync    │
//!   │                                         │
//!   │  set(&, K, V)                           │
//!   │  get / peek(&, &K) → Option<V>  V: Clone│
//!   │  get_with / peek_with(&, &K, FnOnce)    │
//!   │  delete(&, &K) → bool                   │
//!   │  len / is_empty / capacity / contains   │
//!   │  clear(&)                               │
//!   └─────────────────────────────────────────┘
//!        implemented by LruCache, SlruCache, ClockCache, FifoCache, Cache
//! ```
//!
//! ## Access Semantics
//!
//! | Policy | `get` side effect                       | `peek` side effect |
//! |--------|-----------------------------------------|--------------------|
//! | LRU    | move to most-recently-used              | none               |
//! | SLRU   | promote to / refresh in protected       | none               |
//! | Clock  | set reference bit                       | none               |
//! | FIFO   | none                                    | none               |
//!
//! Every `ConcurrentCache` method holds the instance's single mutex for its
//! whole duration, so calls on one instance are linearizable.

/// Core cache operations that every policy core supports.
///
/// # Example
///
/// ```
/// use evictkit::policy::lru::LruCore;
/// use evictkit::traits::CoreCache;
///
/// let mut cache = LruCore::new(2);
/// assert_eq!(cache.insert("a", 1), None);
/// assert_eq!(cache.insert("a", 2), Some(1));
/// assert_eq!(cache.get(&"a"), Some(&2));
/// ```
pub trait CoreCache<K, V> {
    /// Inserts or updates `key`, returning the previous value on update.
    ///
    /// May evict according to the policy when inserting a new key.
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    /// Returns the value for `key`, applying the policy's access side effect.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Returns the value for `key` with no effect on eviction order.
    fn peek(&self, key: &K) -> Option<&V>;

    /// Returns `true` if `key` is present. Never touches eviction state.
    fn contains(&self, key: &K) -> bool;

    /// Number of live entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Configured capacity.
    fn capacity(&self) -> usize;

    /// Removes every entry.
    fn clear(&mut self);
}

/// Adds arbitrary key-based removal.
pub trait MutableCache<K, V>: CoreCache<K, V> {
    /// Removes `key`, returning its value if it was present.
    fn remove(&mut self, key: &K) -> Option<V>;
}

/// Thread-safe cache contract shared by every locked policy wrapper.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use std::thread;
///
/// use evictkit::policy::clock::ClockCache;
/// use evictkit::traits::ConcurrentCache;
///
/// fn warm<C: ConcurrentCache<u32, u32>>(cache: &C) {
///     for i in 0..4 {
///         cache.set(i, i * 10);
///     }
/// }
///
/// let cache = Arc::new(ClockCache::new(8));
/// let worker = {
///     let cache = Arc::clone(&cache);
///     thread::spawn(move || warm(&*cache))
/// };
/// worker.join().unwrap();
/// assert_eq!(cache.get(&2), Some(20));
/// ```
pub trait ConcurrentCache<K, V>: Send + Sync {
    /// Inserts or updates `key`; may evict, promote or demote.
    fn set(&self, key: K, value: V);

    /// Applies `f` to the value for `key` under the lock, with the policy's
    /// access side effect.
    fn get_with<R>(&self, key: &K, f: impl FnOnce(&V) -> R) -> Option<R>;

    /// Applies `f` to the value for `key` under the lock, leaving eviction
    /// state untouched.
    fn peek_with<R>(&self, key: &K, f: impl FnOnce(&V) -> R) -> Option<R>;

    /// Removes `key`; returns whether it was present.
    fn delete(&self, key: &K) -> bool;

    /// Total live entries across all segments.
    fn len(&self) -> usize;

    /// Configured capacity.
    fn capacity(&self) -> usize;

    /// Returns `true` if `key` is present, without any access side effect.
    fn contains(&self, key: &K) -> bool;

    /// Removes every entry.
    fn clear(&self);

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a clone of the value for `key`, with the access side effect.
    fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.get_with(key, V::clone)
    }

    /// Returns a clone of the value for `key` without touching eviction state.
    fn peek(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.peek_with(key, V::clone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::fifo::{FifoCache, FifoCore};
    use crate::policy::lru::LruCore;

    #[test]
    fn core_cache_insert_returns_previous_value() {
        let mut cache: LruCore<&str, i32> = LruCore::new(4);
        assert_eq!(CoreCache::insert(&mut cache, "k", 1), None);
        assert_eq!(CoreCache::insert(&mut cache, "k", 2), Some(1));
        assert_eq!(MutableCache::remove(&mut cache, &"k"), Some(2));
        assert!(CoreCache::is_empty(&cache));
    }

    fn exercise_core<C: MutableCache<u32, u32>>(cache: &mut C) {
        cache.insert(1, 10);
        assert!(cache.contains(&1));
        assert_eq!(cache.peek(&1), Some(&10));
        assert_eq!(cache.remove(&1), Some(10));
        assert_eq!(cache.remove(&1), None);
    }

    #[test]
    fn mutable_cache_generic_usage() {
        exercise_core(&mut LruCore::new(2));
        exercise_core(&mut FifoCore::new(2));
    }

    #[test]
    fn concurrent_cache_default_methods_clone_values() {
        let cache: FifoCache<u32, String> = FifoCache::new(2);
        assert!(ConcurrentCache::is_empty(&cache));
        cache.set(1, "one".to_string());
        assert_eq!(cache.get(&1).as_deref(), Some("one"));
        assert_eq!(cache.peek(&1).as_deref(), Some("one"));
        assert_eq!(cache.get_with(&1, String::len), Some(3));
    }
}
