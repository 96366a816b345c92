//! Backend Module
//!
//! Abstracts the backing key-value store behind a small async trait with a
//! Redis implementation for production use and an in-memory implementation
//! for tests and offline runs.

use async_trait::async_trait;

use crate::error::Result;

mod memory;
mod redis;

// Re-export public types
pub use memory::MemoryBackend;
pub use redis::RedisBackend;

// == Backend Trait ==
/// Operations the cache client requires from its backing store.
///
/// Mirrors the handful of Redis commands the client issues. Reads of missing
/// keys yield `None` (or an empty list), never an error; everything else
/// passes the store's own failures through.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Stores a value under a key with no expiration.
    async fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Stores a value under a key that expires after `ttl_seconds`.
    async fn set_ex(&self, key: &str, value: &[u8], ttl_seconds: u64) -> Result<()>;

    /// Retrieves the value stored under a key, or None if absent.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Atomically increments the integer stored under a key.
    ///
    /// A missing key counts from zero. Returns the value after the increment.
    async fn incr(&self, key: &str) -> Result<i64>;

    /// Appends a value to the tail of the list stored under a key.
    async fn rpush(&self, key: &str, value: &str) -> Result<()>;

    /// Returns the list elements between `start` and `stop` inclusive.
    ///
    /// Negative indices count from the end of the list, Redis style. A
    /// missing key yields an empty list.
    async fn lrange(&self, key: &str, start: isize, stop: isize) -> Result<Vec<String>>;

    /// Removes every key from the store.
    async fn flushdb(&self) -> Result<()>;
}
