//! Error types for the evictkit library.
//!
//! ## Key Components
//!
//! - [`InvariantError`]: Returned by `check_invariants` when an internal
//!   structure no longer matches its index.
//! - [`ConfigError`]: Returned when a policy description string cannot be
//!   parsed (see [`CachePolicy`](crate::builder::CachePolicy)).
//!
//! Numeric anomalies such as an SLRU ratio above 100 are normalized at
//! construction and never surface as errors.
//!
//! ## Example Usage
//!
//! ```
//! use evictkit::builder::CachePolicy;
//! use evictkit::error::ConfigError;
//!
//! let policy: Result<CachePolicy, ConfigError> = "slru:70".parse();
//! assert!(policy.is_ok());
//!
//! let bad = "lfu".parse::<CachePolicy>();
//! assert!(bad.is_err());
//! ```

use thiserror::Error;

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal cache invariants are violated.
///
/// Carries a human-readable description of which invariant failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when a cache policy description cannot be parsed.
///
/// # Example
///
/// ```
/// use evictkit::builder::CachePolicy;
///
/// let err = "slru:abc".parse::<CachePolicy>().unwrap_err();
/// assert!(err.to_string().contains("abc"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown cache policy `{0}`")]
    UnknownPolicy(String),
    #[error("invalid protected percent `{0}` (expected an integer)")]
    InvalidRatio(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
