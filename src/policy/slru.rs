//! Segmented LRU (SLRU) cache replacement policy.
//!
//! Two LRU segments with independent capacities: new keys enter
//! **probation**, and a hit on a probation key promotes it into
//! **protected**. A one-time scan therefore churns probation while the
//! re-referenced working set stays protected.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         SlruCore<K, V> Layout                           │
//! │                                                                         │
//! │   index: FxHashMap<K, Handle { segment, id: SlotId }>                   │
//! │                                                                         │
//! │   PROBATION (IntrusiveList)             PROTECTED (IntrusiveList)       │
//! │   ┌───────────────────────────┐         ┌───────────────────────────┐   │
//! │   │ [H] ◄► new ◄► ... ◄► [T]  │         │ [H] ◄► hot ◄► ... ◄► [T]  │   │
//! │   │        MRU        LRU     │         │        MRU        LRU     │   │
//! │   └───────────────────────────┘         └───────────────────────────┘   │
//! │     cap = capacity − protected_cap        cap = capacity·pct / 100      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Promotion Cascade
//!
//! ```text
//!   get(k) where k is in probation:
//!     1. unlink k from probation, link at protected head
//!     2. protected over cap?  → unlink protected LRU, link at probation HEAD
//!     3. probation over cap?  → evict probation LRU
//! ```
//!
//! At most one promotion, one demotion and one eviction happen per `get`.
//! A demoted entry lands at the head of probation, so it outlives entries
//! that have been waiting there longer.
//!
//! `insert` on an existing key updates it in place and refreshes it within
//! the segment it already occupies; it never changes segment.
//!
//! ## Sizing
//!
//! `protected_cap = capacity · pct / 100` (integer division) and
//! `probation_cap = capacity − protected_cap`, each raised to at least 1.
//! `pct` above 100 is clamped. [`SlruCore::capacity`] reports the sum of the
//! two segment capacities after flooring.

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

/// Share of the capacity given to the protected segment by [`SlruCore::new`].
pub const DEFAULT_PROTECTED_PERCENT: u8 = 80;

/// Which segment an entry lives in.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Segment {
    /// New or demoted entries; evicted from here.
    Probation,
    /// Entries hit at least once since insertion.
    Protected,
}

#[derive(Copy, Clone, Debug)]
struct Handle {
    segment: Segment,
    id: SlotId,
}

/// Single-threaded SLRU core.
///
/// # Example
///
/// ```
/// use evictkit::policy::slru::{Segment, SlruCore};
/// use evictkit::traits::CoreCache;
///
/// let mut cache = SlruCore::new(10);
/// assert_eq!((cache.protected_capacity(), cache.probation_capacity()), (8, 2));
///
/// cache.insert("key", 1);
/// assert_eq!(cache.segment_of(&"key"), Some(Segment::Probation));
///
/// cache.get(&"key");
/// assert_eq!(cache.segment_of(&"key"), Some(Segment::Protected));
/// ```
pub struct SlruCore<K, V> {
    index: FxHashMap<K, Handle>,
    probation: IntrusiveList<Entry<K, V>>,
    protected: IntrusiveList<Entry<K, V>>,
    probation_cap: usize,
    protected_cap: usize,
}

impl<K, V> SlruCore<K, V>
where
    K: Clone + Eq + Hash,
{
    /// Creates a core with [`DEFAULT_PROTECTED_PERCENT`] of `capacity` protected.
    pub fn new(capacity: usize) -> Self {
        Self::with_ratio(capacity, DEFAULT_PROTECTED_PERCENT)
    }

    /// Creates a core with `protected_percent` of `capacity` protected.
    ///
    /// Percentages above 100 are clamped and each segment gets at least one
    /// slot, so construction never fails.
    ///
    /// ```
    /// use evictkit::policy::slru::SlruCore;
    ///
    /// let cache: SlruCore<u32, u32> = SlruCore::with_ratio(10, 150);
    /// assert_eq!(cache.protected_capacity(), 10);
    /// assert_eq!(cache.probation_capacity(), 1);
    /// ```
    pub fn with_ratio(capacity: usize, protected_percent: u8) -> Self {
        let (protected_cap, probation_cap) = segment_capacities(capacity, protected_percent);
        Self {
            index: FxHashMap::with_capacity_and_hasher(
                prealloc(protected_cap.saturating_add(probation_cap)),
                Default::default(),
            ),
            probation: IntrusiveList::with_capacity(prealloc(probation_cap)),
            protected: IntrusiveList::with_capacity(prealloc(protected_cap)),
            probation_cap,
            protected_cap,
        }
    }

    pub fn protected_len(&self) -> usize {
        self.protected.len()
    }

    pub fn probation_len(&self) -> usize {
        self.probation.len()
    }

    pub fn protected_capacity(&self) -> usize {
        self.protected_cap
    }

    pub fn probation_capacity(&self) -> usize {
        self.probation_cap
    }

    /// Reports which segment holds `key`.
    pub fn segment_of(&self, key: &K) -> Option<Segment> {
        self.index.get(key).map(|handle| handle.segment)
    }

    /// Returns the next eviction victim: the LRU entry of probation.
    pub fn peek_probation_lru(&self) -> Option<(&K, &V)> {
        self.probation.back().map(|entry| (&entry.key, &entry.value))
    }

    /// Verifies both segments against the index and their capacities.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        check_list_index("slru probation", &self.probation, |key| {
            self.handle_in(key, Segment::Probation)
        })?;
        check_list_index("slru protected", &self.protected, |key| {
            self.handle_in(key, Segment::Protected)
        })?;

        let listed = self.probation.len() + self.protected.len();
        if self.index.len() != listed {
            return Err(InvariantError::new(format!(
                "slru: index holds {} keys but segments hold {listed}",
                self.index.len()
            )));
        }
        if self.probation_cap == 0 || self.protected_cap == 0 {
            return Err(InvariantError::new("slru: segment capacity is zero"));
        }
        if self.probation.len() > self.probation_cap {
            return Err(InvariantError::new(format!(
                "slru: probation holds {} over capacity {}",
                self.probation.len(),
                self.probation_cap
            )));
        }
        if self.protected.len() > self.protected_cap {
            return Err(InvariantError::new(format!(
                "slru: protected holds {} over capacity {}",
                self.protected.len(),
                self.protected_cap
            )));
        }
        Ok(())
    }

    fn handle_in(&self, key: &K, segment: Segment) -> Option<SlotId> {
        self.index
            .get(key)
            .filter(|handle| handle.segment == segment)
            .map(|handle| handle.id)
    }

    fn segment(&self, segment: Segment) -> &IntrusiveList<Entry<K, V>> {
        match segment {
            Segment::Probation => &self.probation,
            Segment::Protected => &self.protected,
        }
    }

    fn segment_mut(&mut self, segment: Segment) -> &mut IntrusiveList<Entry<K, V>> {
        match segment {
            Segment::Probation => &mut self.probation,
            Segment::Protected => &mut self.protected,
        }
    }

    /// Moves a probation entry to the protected head and returns its new id.
    fn promote(&mut self, id: SlotId) -> Option<SlotId> {
        let entry = self.probation.remove(id)?;
        let new_id = self.protected.push_front(entry);
        if let Some(entry) = self.protected.get(new_id)
            && let Some(handle) = self.index.get_mut(&entry.key)
        {
            *handle = Handle {
                segment: Segment::Protected,
                id: new_id,
            };
        }
        trace!(
            policy = "slru",
            protected_len = self.protected.len(),
            probation_len = self.probation.len(),
            "promoted entry to protected"
        );

        if self.protected.len() > self.protected_cap {
            self.demote_protected_lru();
        }
        Some(new_id)
    }

    fn demote_protected_lru(&mut self) {
        let Some(entry) = self.protected.pop_back() else {
            return;
        };
        let new_id = self.probation.push_front(entry);
        if let Some(entry) = self.probation.get(new_id)
            && let Some(handle) = self.index.get_mut(&entry.key)
        {
            *handle = Handle {
                segment: Segment::Probation,
                id: new_id,
            };
        }
        trace!(
            policy = "slru",
            protected_len = self.protected.len(),
            probation_len = self.probation.len(),
            "demoted protected LRU to probation head"
        );

        // Promotion freed a probation slot first, so this cannot fire from `get`.
        if self.probation.len() > self.probation_cap {
            self.evict_probation_lru();
        }
    }

    fn evict_probation_lru(&mut self) {
        if let Some(entry) = self.probation.pop_back() {
            self.index.remove(&entry.key);
            trace!(
                policy = "slru",
                probation_len = self.probation.len(),
                "evicted probation LRU"
            );
        }
    }
}

/// Splits `capacity` into `(protected, probation)` segment capacities.
fn segment_capacities(capacity: usize, protected_percent: u8) -> (usize, usize) {
    let pct = if protected_percent > 100 {
        debug!(protected_percent, "slru protected percent clamped to 100");
        100
    } else {
        usize::from(protected_percent)
    };

    // capacity * pct / 100 without overflowing on large capacities.
    let protected = (capacity / 100) * pct + (capacity % 100) * pct / 100;
    let probation = capacity - protected;

    let protected = if protected == 0 {
        debug!(capacity, pct, "slru protected segment raised to 1");
        1
    } else {
        protected
    };
    let probation = if probation == 0 {
        debug!(capacity, pct, "slru probation segment raised to 1");
        1
    } else {
        probation
    };
    (protected, probation)
}

impl<K, V> CoreCache<K, V> for SlruCore<K, V>
where
    K: Clone + Eq + Hash,
{
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(&Handle { segment, id }) = self.index.get(&key) {
            let list = self.segment_mut(segment);
            list.move_to_front(id);
            return list
                .get_mut(id)
                .map(|entry| mem::replace(&mut entry.value, value));
        }

        let id = self.probation.push_front(Entry {
            key: key.clone(),
            value,
        });
        self.index.insert(
            key,
            Handle {
                segment: Segment::Probation,
                id,
            },
        );
        if self.probation.len() > self.probation_cap {
            self.evict_probation_lru();
        }
        None
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        let handle = *self.index.get(key)?;
        let id = match handle.segment {
            Segment::Protected => {
                self.protected.move_to_front(handle.id);
                handle.id
            }
            Segment::Probation => self.promote(handle.id)?,
        };
        self.protected.get(id).map(|entry| &entry.value)
    }

    fn peek(&self, key: &K) -> Option<&V> {
        let handle = self.index.get(key)?;
        self.segment(handle.segment)
            .get(handle.id)
            .map(|entry| &entry.value)
    }

    fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    /// Sum of both segment capacities.
    fn capacity(&self) -> usize {
        self.protected_cap.saturating_add(self.probation_cap)
    }

    fn clear(&mut self) {
        self.index.clear();
        self.probation.clear();
        self.protected.clear();
    }
}

impl<K, V> MutableCache<K, V> for SlruCore<K, V>
where
    K: Clone + Eq + Hash,
{
    fn remove(&mut self, key: &K) -> Option<V> {
        let handle = self.index.remove(key)?;
        self.segment_mut(handle.segment)
            .remove(handle.id)
            .map(|entry| entry.value)
    }
}

impl<K, V> fmt::Debug for SlruCore<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlruCore")
            .field("len", &self.index.len())
            .field("probation_len", &self.probation.len())
            .field("probation_cap", &self.probation_cap)
            .field("protected_len", &self.protected.len())
            .field("protected_cap", &self.protected_cap)
            .finish_non_exhaustive()
    }
}

/// Thread-safe SLRU cache: one exclusive lock around an [`SlruCore`].
///
/// # Example
///
/// ```
/// use evictkit::policy::slru::SlruCache;
/// use evictkit::traits::ConcurrentCache;
///
/// let cache = SlruCache::new(10);
/// cache.set("a", 1);
/// cache.set("b", 2);
/// cache.get(&"a"); // promoted
///
/// for key in ["c", "d", "e"] {
///     cache.set(key, 0);
/// }
/// assert!(cache.contains(&"a"));
/// assert!(!cache.contains(&"b"));
/// ```
pub struct SlruCache<K, V> {
    inner: Mutex<SlruCore<K, V>>,
}

impl<K, V> SlruCache<K, V>
where
    K: Clone + Eq + Hash,
{
    pub fn new(capacity: usize) -> Self {
        Self::with_ratio(capacity, DEFAULT_PROTECTED_PERCENT)
    }

    pub fn with_ratio(capacity: usize, protected_percent: u8) -> Self {
        Self {
            inner: Mutex::new(SlruCore::with_ratio(capacity, protected_percent)),
        }
    }

    pub fn protected_len(&self) -> usize {
        self.inner.lock().protected_len()
    }

    pub fn probation_len(&self) -> usize {
        self.inner.lock().probation_len()
    }

    pub fn protected_capacity(&self) -> usize {
        self.inner.lock().protected_capacity()
    }

    pub fn probation_capacity(&self) -> usize {
        self.inner.lock().probation_capacity()
    }

    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.inner.lock().check_invariants()
    }

    pub fn into_inner(self) -> SlruCore<K, V> {
        self.inner.into_inner()
    }
}

impl<K, V> ConcurrentCache<K, V> for SlruCache<K, V>
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

impl<K, V> fmt::Debug for SlruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = self.inner.lock();
        f.debug_struct("SlruCache")
            .field("len", &cache.index.len())
            .field("protected_len", &cache.protected.len())
            .field("probation_len", &cache.probation.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==============================================
    // Sizing
    // ==============================================

    mod sizing {
        use super::*;

        #[test]
        fn default_split_is_eighty_twenty() {
            let cache: SlruCore<u32, u32> = SlruCore::new(10);
            assert_eq!(cache.protected_capacity(), 8);
            assert_eq!(cache.probation_capacity(), 2);
            assert_eq!(cache.capacity(), 10);
        }

        #[test]
        fn ratio_edges_floor_segments_to_one() {
            let all_probation: SlruCore<u32, u32> = SlruCore::with_ratio(10, 0);
            assert_eq!(all_probation.protected_capacity(), 1);
            assert_eq!(all_probation.probation_capacity(), 10);

            let all_protected: SlruCore<u32, u32> = SlruCore::with_ratio(10, 100);
            assert_eq!(all_protected.protected_capacity(), 10);
            assert_eq!(all_protected.probation_capacity(), 1);

            let clamped: SlruCore<u32, u32> = SlruCore::with_ratio(10, 150);
            assert_eq!(clamped.protected_capacity(), 10);
            assert_eq!(clamped.probation_capacity(), 1);
        }

        #[test]
        fn small_capacities() {
            let zero: SlruCore<u32, u32> = SlruCore::new(0);
            assert_eq!((zero.protected_capacity(), zero.probation_capacity()), (1, 1));

            let one: SlruCore<u32, u32> = SlruCore::new(1);
            assert_eq!((one.protected_capacity(), one.probation_capacity()), (1, 1));

            let three: SlruCore<u32, u32> = SlruCore::with_ratio(3, 66);
            assert_eq!((three.protected_capacity(), three.probation_capacity()), (1, 2));
        }

        #[test]
        fn large_capacity_split_does_not_overflow() {
            let (protected, probation) = segment_capacities(usize::MAX, 80);
            assert_eq!(protected + probation, usize::MAX);
            assert!(protected > probation);
        }
    }

    // ==============================================
    // Segment Behavior
    // ==============================================

    mod segment_behavior {
        use super::*;

        #[test]
        fn new_keys_enter_probation() {
            let mut cache = SlruCore::new(10);
            cache.insert("a", 1);
            assert_eq!(cache.segment_of(&"a"), Some(Segment::Probation));
            assert_eq!(cache.probation_len(), 1);
            assert_eq!(cache.protected_len(), 0);
        }

        #[test]
        fn get_promotes_and_peek_does_not() {
            let mut cache = SlruCore::new(10);
            cache.insert("a", 1);
            assert_eq!(cache.peek(&"a"), Some(&1));
            assert_eq!(cache.segment_of(&"a"), Some(Segment::Probation));

            assert_eq!(cache.get(&"a"), Some(&1));
            assert_eq!(cache.segment_of(&"a"), Some(Segment::Protected));
            assert_eq!(cache.protected_len(), 1);
            assert_eq!(cache.probation_len(), 0);
            cache.check_invariants().unwrap();
        }

        #[test]
        fn update_stays_in_current_segment() {
            let mut cache = SlruCore::new(10);
            cache.insert("a", 1);
            cache.get(&"a");
            assert_eq!(cache.insert("a", 2), Some(1));
            assert_eq!(cache.segment_of(&"a"), Some(Segment::Protected));

            cache.insert("b", 3);
            assert_eq!(cache.insert("b", 4), Some(3));
            assert_eq!(cache.segment_of(&"b"), Some(Segment::Probation));
            assert_eq!(cache.len(), 2);
        }

        #[test]
        fn update_refreshes_within_probation() {
            let mut cache = SlruCore::new(10);
            cache.insert("a", 1);
            cache.insert("b", 2);
            cache.insert("a", 11);
            cache.insert("c", 3);
            assert!(cache.contains(&"a"));
            assert!(!cache.contains(&"b"));
        }

        #[test]
        fn delete_from_either_segment() {
            let mut cache = SlruCore::new(10);
            cache.insert("a", 1);
            cache.insert("b", 2);
            cache.get(&"a");

            assert_eq!(cache.remove(&"a"), Some(1));
            assert_eq!(cache.remove(&"b"), Some(2));
            assert_eq!(cache.remove(&"b"), None);
            assert!(cache.is_empty());
            cache.check_invariants().unwrap();
        }
    }

    // ==============================================
    // Promotion / Demotion / Eviction
    // ==============================================

    mod cascade {
        use super::*;

        #[test]
        fn protected_overflow_demotes_lru_to_probation() {
            let mut cache = SlruCore::new(5);
            for (k, v) in [("a", 1), ("b", 2), ("c", 3), ("d", 4)] {
                cache.insert(k, v);
                cache.get(&k);
            }
            assert_eq!(cache.protected_len(), 4);

            cache.insert("e", 5);
            cache.get(&"e");

            assert_eq!(cache.get(&"e"), Some(&5));
            assert_eq!(cache.peek(&"a"), Some(&1));
            assert_eq!(cache.segment_of(&"a"), Some(Segment::Probation));
            cache.check_invariants().unwrap();
        }

        #[test]
        fn demoted_entry_is_next_victim_when_probation_has_one_slot() {
            let mut cache = SlruCore::with_ratio(3, 67);
            assert_eq!((cache.protected_capacity(), cache.probation_capacity()), (2, 1));

            cache.insert("a", 1);
            cache.get(&"a");
            cache.insert("b", 2);
            cache.get(&"b");
            cache.insert("c", 3);
            cache.get(&"c");
            assert_eq!(cache.segment_of(&"a"), Some(Segment::Probation));

            cache.insert("d", 4);
            assert!(!cache.contains(&"a"));

            cache.get(&"d");
            assert_eq!(cache.segment_of(&"d"), Some(Segment::Protected));
            assert_eq!(cache.segment_of(&"c"), Some(Segment::Protected));
            assert_eq!(cache.segment_of(&"b"), Some(Segment::Probation));
            assert_eq!(cache.len(), 3);
            cache.check_invariants().unwrap();
        }

        #[test]
        fn full_cascade_never_evicts_on_get() {
            let mut cache = SlruCore::with_ratio(4, 50);
            for key in ["a", "b"] {
                cache.insert(key, 0);
                cache.get(&key);
            }
            cache.insert("c", 0);
            cache.insert("d", 0);
            assert_eq!((cache.protected_len(), cache.probation_len()), (2, 2));

            // Promote "c": "a" is demoted into the slot "c" vacated.
            cache.get(&"c");
            assert_eq!(cache.len(), 4);
            assert_eq!(cache.segment_of(&"a"), Some(Segment::Probation));
            assert_eq!(cache.segment_of(&"d"), Some(Segment::Probation));
            assert_eq!((cache.protected_len(), cache.probation_len()), (2, 2));
            cache.check_invariants().unwrap();
        }

        #[test]
        fn demoted_entry_outlives_older_probation_entries() {
            let mut cache = SlruCore::with_ratio(4, 25);
            assert_eq!((cache.protected_capacity(), cache.probation_capacity()), (1, 3));

            cache.insert("hot", 0);
            cache.get(&"hot");
            cache.insert("x", 1);
            cache.insert("y", 2);
            cache.get(&"y"); // demotes hot to probation head: [hot, x]

            cache.insert("z", 3); // [z, hot, x]
            cache.insert("w", 4); // evicts x, not hot
            assert!(cache.contains(&"hot"));
            assert!(!cache.contains(&"x"));
            assert_eq!(cache.peek_probation_lru(), Some((&"hot", &0)));
        }

        #[test]
        fn capacity_one_segments() {
            let mut cache = SlruCore::new(1);
            cache.insert("a", 1);
            cache.insert("b", 2);
            assert!(!cache.contains(&"a"));

            cache.get(&"b");
            cache.insert("c", 3);
            cache.get(&"c");
            assert_eq!(cache.segment_of(&"c"), Some(Segment::Protected));
            assert_eq!(cache.segment_of(&"b"), Some(Segment::Probation));
            assert!(cache.len() <= cache.capacity());
            cache.check_invariants().unwrap();
        }
    }

    // ==============================================
    // Scan Resistance
    // ==============================================

    mod scan_resistance {
        use super::*;

        #[test]
        fn promoted_key_survives_probation_churn() {
            let mut cache = SlruCore::new(10);
            cache.insert("a", 1);
            cache.insert("b", 2);
            cache.get(&"a");
            for key in ["c", "d", "e"] {
                cache.insert(key, 0);
            }
            assert!(cache.contains(&"a"));
            assert!(!cache.contains(&"b"));
        }

        #[test]
        fn scan_does_not_pollute_protected() {
            let mut cache = SlruCore::new(100);
            for i in 0..50 {
                let key = format!("working{i}");
                cache.insert(key.clone(), i);
                cache.get(&key);
            }
            for i in 0..500 {
                cache.insert(format!("scan{i}"), i);
            }
            let survivors = (0..50)
                .filter(|i| cache.contains(&format!("working{i}")))
                .count();
            assert_eq!(survivors, 50);
            assert_eq!(cache.probation_len(), cache.probation_capacity());
        }
    }

    // ==============================================
    // SlruCache
    // ==============================================

    mod concurrent {
        use std::sync::{Arc, Barrier};
        use std::thread;

        use super::*;

        #[test]
        fn wrapper_reports_segment_state() {
            let cache = SlruCache::with_ratio(10, 50);
            assert_eq!(cache.protected_capacity(), 5);
            assert_eq!(cache.probation_capacity(), 5);
            cache.set(1, "one");
            assert_eq!(cache.get(&1), Some("one"));
            assert_eq!(cache.protected_len(), 1);
            assert_eq!(cache.probation_len(), 0);
            assert!(cache.delete(&1));
            assert!(ConcurrentCache::is_empty(&cache));
        }

        #[test]
        fn mixed_threads_keep_segments_consistent() {
            let cache = Arc::new(SlruCache::new(50));
            let barrier = Arc::new(Barrier::new(4));
            let handles: Vec<_> = (0..4u32)
                .map(|t| {
                    let cache = Arc::clone(&cache);
                    let barrier = Arc::clone(&barrier);
                    thread::spawn(move || {
                        barrier.wait();
                        for i in 0..1000u32 {
                            let key = (i * 7 + t) % 120;
                            match i % 4 {
                                0 => cache.set(key, i),
                                1 => {
                                    cache.get(&key);
                                }
                                2 => {
                                    cache.peek(&key);
                                }
                                _ => {
                                    cache.delete(&key);
                                }
                            }
                        }
                    })
                })
                .collect();
            for handle in handles {
                handle.join().unwrap();
            }
            cache.check_invariants().unwrap();
            assert!(cache.len() <= 50);
        }
    }

    mod property_tests {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            #[test]
            fn prop_segments_stay_within_bounds(
                capacity in 0usize..20,
                pct in any::<u8>(),
                ops in prop::collection::vec((0u8..3, 0u8..40), 0..300)
            ) {
                let mut cache = SlruCore::with_ratio(capacity, pct);
                for (op, key) in ops {
                    match op {
                        0 => { cache.insert(key, key); }
                        1 => { cache.get(&key); }
                        _ => { cache.remove(&key); }
                    }
                    prop_assert!(cache.probation_len() <= cache.probation_capacity());
                    prop_assert!(cache.protected_len() <= cache.protected_capacity());
                }
                prop_assert!(cache.check_invariants().is_ok());
            }

            #[test]
            fn prop_peek_is_pure(
                ops in prop::collection::vec((any::<bool>(), 0u8..24), 0..200)
            ) {
                let mut plain = SlruCore::new(8);
                let mut peeked = SlruCore::new(8);
                for (is_get, key) in ops {
                    if is_get {
                        plain.get(&key);
                        peeked.get(&key);
                    } else {
                        plain.insert(key, ());
                        peeked.insert(key, ());
                    }
                    for probe in 0u8..24 {
                        peeked.peek(&probe);
                    }
                }
                for probe in 0u8..24 {
                    prop_assert_eq!(plain.segment_of(&probe), peeked.segment_of(&probe));
                }
                prop_assert_eq!(plain.peek_probation_lru(), peeked.peek_probation_lru());
            }
        }
    }
}
