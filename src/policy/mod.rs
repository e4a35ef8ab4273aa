//! Eviction policies.
//!
//! Each policy ships a single-threaded core (`XxxCore`, implements
//! [`CoreCache`](crate::traits::CoreCache) and
//! [`MutableCache`](crate::traits::MutableCache)) and a thread-safe cache
//! (`XxxCache`, one `parking_lot::Mutex` around the core, implements
//! [`ConcurrentCache`](crate::traits::ConcurrentCache)).
//!
//! | Module   | Evicts                                   |
//! |----------|------------------------------------------|
//! | [`lru`]  | least recently used                      |
//! | [`slru`] | probation LRU; protected demotes first   |
//! | [`clock`]| first unreferenced slot under the hand   |
//! | [`fifo`] | oldest insertion                         |

pub mod clock;
pub mod fifo;
pub mod lru;
pub mod slru;

use crate::ds::{IntrusiveList, SlotId};
use crate::error::InvariantError;

// Upper bound on eager allocation so huge capacities stay lazy.
const MAX_PREALLOC: usize = 1 << 16;

pub(crate) fn prealloc(capacity: usize) -> usize {
    capacity.min(MAX_PREALLOC)
}

/// List payload shared by the list-based policies.
#[derive(Debug)]
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
}

/// Checks list links and that every listed entry is indexed at its own slot.
pub(crate) fn check_list_index<K, V>(
    name: &str,
    list: &IntrusiveList<Entry<K, V>>,
    resolve: impl Fn(&K) -> Option<SlotId>,
) -> Result<(), InvariantError> {
    list.validate()
        .map_err(|err| InvariantError::new(format!("{name}: {err}")))?;
    for (id, entry) in list.iter_entries() {
        if resolve(&entry.key) != Some(id) {
            return Err(InvariantError::new(format!(
                "{name}: slot {} is not indexed by its key",
                id.index()
            )));
        }
    }
    Ok(())
}
