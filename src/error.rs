//! Error types for the cache client
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache client.
///
/// Store and HTTP failures pass through from the underlying clients; the
/// only error this crate adds on top is `Conversion`, raised when a cached
/// payload cannot be decoded into the requested type.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The backing store returned an error
    #[error("store error: {0}")]
    Store(#[from] redis::RedisError),

    /// The HTTP request failed
    #[error("fetch error: {0}")]
    Fetch(#[from] reqwest::Error),

    /// A cached payload could not be converted to the requested type
    #[error("conversion error: {0}")]
    Conversion(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache client.
pub type Result<T> = std::result::Result<T, CacheError>;
