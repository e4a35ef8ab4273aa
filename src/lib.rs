//! evictkit: bounded in-memory caches with LRU, SLRU, Clock and FIFO eviction.
//!
//! Every policy comes as a single-threaded core plus a thread-safe cache
//! guarded by one exclusive lock. All operations are O(1) (the Clock insert
//! is amortized O(1)).
//!
//! ```
//! use evictkit::prelude::*;
//!
//! let cache = SlruCache::new(10);
//! cache.set("a", 1);
//! assert_eq!(cache.get(&"a"), Some(1));
//! assert!(cache.delete(&"a"));
//! assert_eq!(cache.len(), 0);
//! ```

pub mod builder;
pub mod ds;
pub mod error;
pub mod policy;
pub mod prelude;
pub mod traits;

pub use crate::builder::{Cache, CacheBuilder, CachePolicy};
pub use crate::error::{ConfigError, InvariantError};
pub use crate::policy::clock::ClockCache;
pub use crate::policy::fifo::FifoCache;
pub use crate::policy::lru::LruCache;
pub use crate::policy::slru::SlruCache;
