pub use crate::builder::{Cache, CacheBuilder, CachePolicy};
pub use crate::error::{ConfigError, InvariantError};
pub use crate::policy::clock::{ClockCache, ClockCore};
pub use crate::policy::fifo::{FifoCache, FifoCore};
pub use crate::policy::lru::{LruCache, LruCore};
pub use crate::policy::slru::{Segment, SlruCache, SlruCore};
pub use crate::traits::{ConcurrentCache, CoreCache, MutableCache};
