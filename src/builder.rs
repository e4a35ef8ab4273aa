//! Runtime policy selection.
//!
//! [`CachePolicy`] names one of the four eviction policies and parses from
//! short strings (`"lru"`, `"slru:70"`, ...), so the choice can come from a
//! config file or command line. [`CacheBuilder`] turns a capacity and a policy
//! into a [`Cache`], a thread-safe cache that dispatches to the selected
//! implementation.
//!
//! ## Example
//!
//! ```rust
//! use evictkit::builder::{CacheBuilder, CachePolicy};
//! use evictkit::traits::ConcurrentCache;
//!
//! let policy: CachePolicy = "slru:75".parse().unwrap();
//! let cache = CacheBuilder::new(100).policy(policy).build::<u64, String>();
//!
//! cache.set(1, "hello".to_string());
//! assert_eq!(cache.get(&1).as_deref(), Some("hello"));
//! assert_eq!(cache.policy(), CachePolicy::Slru { protected_percent: 75 });
//! ```

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use tracing::debug;

use crate::error::{ConfigError, InvariantError};
use crate::policy::clock::ClockCache;
use crate::policy::fifo::FifoCache;
use crate::policy::lru::LruCache;
use crate::policy::slru::{DEFAULT_PROTECTED_PERCENT, SlruCache};
use crate::traits::ConcurrentCache;

/// Available cache eviction policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePolicy {
    /// Least Recently Used eviction.
    #[default]
    Lru,
    /// Segmented LRU with `protected_percent` of capacity in the protected segment.
    Slru { protected_percent: u8 },
    /// Clock (second-chance) eviction.
    Clock,
    /// First In, First Out eviction.
    Fifo,
}

impl CachePolicy {
    /// SLRU with the default 80% protected split.
    pub const fn slru() -> Self {
        CachePolicy::Slru {
            protected_percent: DEFAULT_PROTECTED_PERCENT,
        }
    }
}

impl fmt::Display for CachePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CachePolicy::Lru => f.write_str("lru"),
            CachePolicy::Slru { protected_percent } => write!(f, "slru:{protected_percent}"),
            CachePolicy::Clock => f.write_str("clock"),
            CachePolicy::Fifo => f.write_str("fifo"),
        }
    }
}

impl FromStr for CachePolicy {
    type Err = ConfigError;

    /// Parses `lru`, `clock`, `fifo`, `slru` or `slru:<percent>`.
    ///
    /// Case and surrounding whitespace are ignored. A percent above 100 is
    /// clamped rather than rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let (name, arg) = match normalized.split_once(':') {
            Some((name, arg)) => (name.trim(), Some(arg.trim())),
            None => (normalized.as_str(), None),
        };

        match (name, arg) {
            ("lru", None) => Ok(CachePolicy::Lru),
            ("clock", None) => Ok(CachePolicy::Clock),
            ("fifo", None) => Ok(CachePolicy::Fifo),
            ("slru", None) => Ok(CachePolicy::slru()),
            ("slru", Some(arg)) => {
                let percent: u64 = arg
                    .parse()
                    .map_err(|_| ConfigError::InvalidRatio(arg.to_string()))?;
                if percent > 100 {
                    debug!(percent, "slru protected percent clamped to 100");
                }
                let protected_percent = u8::try_from(percent.min(100)).unwrap_or(100);
                Ok(CachePolicy::Slru { protected_percent })
            }
            _ => Err(ConfigError::UnknownPolicy(s.trim().to_string())),
        }
    }
}

/// Thread-safe cache whose policy is chosen at runtime.
pub struct Cache<K, V> {
    inner: CacheInner<K, V>,
}

enum CacheInner<K, V> {
    Lru(LruCache<K, V>),
    Slru(SlruCache<K, V>, u8),
    Clock(ClockCache<K, V>),
    Fifo(FifoCache<K, V>),
}

impl<K, V> Cache<K, V>
where
    K: Clone + Eq + Hash,
{
    /// The policy this cache was built with.
    pub fn policy(&self) -> CachePolicy {
        match &self.inner {
            CacheInner::Lru(_) => CachePolicy::Lru,
            CacheInner::Slru(_, protected_percent) => CachePolicy::Slru {
                protected_percent: *protected_percent,
            },
            CacheInner::Clock(_) => CachePolicy::Clock,
            CacheInner::Fifo(_) => CachePolicy::Fifo,
        }
    }

    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        match &self.inner {
            CacheInner::Lru(lru) => lru.check_invariants(),
            CacheInner::Slru(slru, _) => slru.check_invariants(),
            CacheInner::Clock(clock) => clock.check_invariants(),
            CacheInner::Fifo(fifo) => fifo.check_invariants(),
        }
    }
}

impl<K, V> ConcurrentCache<K, V> for Cache<K, V>
where
    K: Clone + Eq + Hash + Send,
    V: Send,
{
    fn set(&self, key: K, value: V) {
        match &self.inner {
            CacheInner::Lru(lru) => lru.set(key, value),
            CacheInner::Slru(slru, _) => slru.set(key, value),
            CacheInner::Clock(clock) => clock.set(key, value),
            CacheInner::Fifo(fifo) => fifo.set(key, value),
        }
    }

    fn get_with<R>(&self, key: &K, f: impl FnOnce(&V) -> R) -> Option<R> {
        match &self.inner {
            CacheInner::Lru(lru) => lru.get_with(key, f),
            CacheInner::Slru(slru, _) => slru.get_with(key, f),
            CacheInner::Clock(clock) => clock.get_with(key, f),
            CacheInner::Fifo(fifo) => fifo.get_with(key, f),
        }
    }

    fn peek_with<R>(&self, key: &K, f: impl FnOnce(&V) -> R) -> Option<R> {
        match &self.inner {
            CacheInner::Lru(lru) => lru.peek_with(key, f),
            CacheInner::Slru(slru, _) => slru.peek_with(key, f),
            CacheInner::Clock(clock) => clock.peek_with(key, f),
            CacheInner::Fifo(fifo) => fifo.peek_with(key, f),
        }
    }

    fn delete(&self, key: &K) -> bool {
        match &self.inner {
            CacheInner::Lru(lru) => lru.delete(key),
            CacheInner::Slru(slru, _) => slru.delete(key),
            CacheInner::Clock(clock) => clock.delete(key),
            CacheInner::Fifo(fifo) => fifo.delete(key),
        }
    }

    fn len(&self) -> usize {
        match &self.inner {
            CacheInner::Lru(lru) => lru.len(),
            CacheInner::Slru(slru, _) => slru.len(),
            CacheInner::Clock(clock) => clock.len(),
            CacheInner::Fifo(fifo) => fifo.len(),
        }
    }

    fn capacity(&self) -> usize {
        match &self.inner {
            CacheInner::Lru(lru) => lru.capacity(),
            CacheInner::Slru(slru, _) => slru.capacity(),
            CacheInner::Clock(clock) => clock.capacity(),
            CacheInner::Fifo(fifo) => fifo.capacity(),
        }
    }

    fn contains(&self, key: &K) -> bool {
        match &self.inner {
            CacheInner::Lru(lru) => lru.contains(key),
            CacheInner::Slru(slru, _) => slru.contains(key),
            CacheInner::Clock(clock) => clock.contains(key),
            CacheInner::Fifo(fifo) => fifo.contains(key),
        }
    }

    fn clear(&self) {
        match &self.inner {
            CacheInner::Lru(lru) => lru.clear(),
            CacheInner::Slru(slru, _) => slru.clear(),
            CacheInner::Clock(clock) => clock.clear(),
            CacheInner::Fifo(fifo) => fifo.clear(),
        }
    }
}

impl<K, V> fmt::Debug for Cache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            CacheInner::Lru(lru) => fmt::Debug::fmt(lru, f),
            CacheInner::Slru(slru, _) => fmt::Debug::fmt(slru, f),
            CacheInner::Clock(clock) => fmt::Debug::fmt(clock, f),
            CacheInner::Fifo(fifo) => fmt::Debug::fmt(fifo, f),
        }
    }
}

/// Builder for [`Cache`]. The policy defaults to [`CachePolicy::Lru`].
#[derive(Debug, Clone, Copy)]
pub struct CacheBuilder {
    capacity: usize,
    policy: CachePolicy,
}

impl CacheBuilder {
    /// Create a new cache builder with the specified capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            policy: CachePolicy::default(),
        }
    }

    /// Selects the eviction policy.
    pub fn policy(mut self, policy: CachePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Build a cache with the configured policy.
    ///
    /// # Example
    ///
    /// ```rust
    /// use evictkit::builder::{CacheBuilder, CachePolicy};
    /// use evictkit::traits::ConcurrentCache;
    ///
    /// let lru = CacheBuilder::new(100).build::<u64, String>();
    /// assert_eq!(lru.capacity(), 100);
    ///
    /// let clock = CacheBuilder::new(100)
    ///     .policy(CachePolicy::Clock)
    ///     .build::<u64, String>();
    /// assert!(clock.is_empty());
    /// ```
    pub fn build<K, V>(self) -> Cache<K, V>
    where
        K: Clone + Eq + Hash,
    {
        debug!(policy = %self.policy, capacity = self.capacity, "building cache");
        let inner = match self.policy {
            CachePolicy::Lru => CacheInner::Lru(LruCache::new(self.capacity)),
            CachePolicy::Slru { protected_percent } => CacheInner::Slru(
                SlruCache::with_ratio(self.capacity, protected_percent),
                protected_percent.min(100),
            ),
            CachePolicy::Clock => CacheInner::Clock(ClockCache::new(self.capacity)),
            CachePolicy::Fifo => CacheInner::Fifo(FifoCache::new(self.capacity)),
        };

        Cache { inner }
    }
}
