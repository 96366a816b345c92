//! Memory Backend Module
//!
//! In-process backend with the same observable semantics as the Redis one,
//! including lazy TTL expiry. Used by the test suite and for offline runs.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::sync::RwLock;
use tracing::debug;

use super::Backend;
use crate::error::{CacheError, Result};

// == Entry ==
/// A stored value with an optional expiration timestamp.
#[derive(Debug, Clone)]
struct Entry {
    /// The stored payload
    data: Vec<u8>,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    expires_at: Option<u64>,
}

impl Entry {
    fn new(data: Vec<u8>, ttl_seconds: Option<u64>) -> Self {
        let expires_at = ttl_seconds.map(|ttl| current_timestamp_ms() + ttl * 1000);
        Self { data, expires_at }
    }

    /// An entry is expired once the current time reaches its expiration time.
    fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires) => current_timestamp_ms() >= expires,
            None => false,
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    /// Plain value storage, counters included
    values: HashMap<String, Entry>,
    /// List storage
    lists: HashMap<String, Vec<String>>,
}

// == Memory Backend ==
/// Backend keeping everything in process memory.
///
/// Expired entries are removed lazily when a read encounters them; there is
/// no background sweeper.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryBackend {
    /// Creates an empty memory backend.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl Backend for MemoryBackend {
    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner
            .values
            .insert(key.to_string(), Entry::new(value.to_vec(), None));
        Ok(())
    }

    async fn set_ex(&self, key: &str, value: &[u8], ttl_seconds: u64) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner
            .values
            .insert(key.to_string(), Entry::new(value.to_vec(), Some(ttl_seconds)));
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut inner = self.inner.write().await;

        // Check expiry with a lookup first so the remove below does not
        // overlap a live borrow of the entry.
        let expired = inner.values.get(key).map(|entry| entry.is_expired());
        match expired {
            Some(true) => {
                inner.values.remove(key);
                debug!(key = %key, "Removed expired entry");
                Ok(None)
            }
            Some(false) => Ok(inner.values.get(key).map(|entry| entry.data.clone())),
            None => Ok(None),
        }
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        let mut inner = self.inner.write().await;

        let (current, expires_at) = match inner.values.get(key) {
            Some(entry) if entry.is_expired() => (0, None),
            Some(entry) => {
                let text = std::str::from_utf8(&entry.data).map_err(|_| {
                    CacheError::Conversion(format!("value at '{}' is not an integer", key))
                })?;
                let parsed = text.parse::<i64>().map_err(|_| {
                    CacheError::Conversion(format!("value at '{}' is not an integer", key))
                })?;
                (parsed, entry.expires_at)
            }
            None => (0, None),
        };

        let next = current + 1;
        inner.values.insert(
            key.to_string(),
            Entry {
                data: next.to_string().into_bytes(),
                expires_at,
            },
        );
        Ok(next)
    }

    async fn rpush(&self, key: &str, value: &str) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner
            .lists
            .entry(key.to_string())
            .or_default()
            .push(value.to_string());
        Ok(())
    }

    async fn lrange(&self, key: &str, start: isize, stop: isize) -> Result<Vec<String>> {
        let inner = self.inner.read().await;

        let list = match inner.lists.get(key) {
            Some(list) => list,
            None => return Ok(Vec::new()),
        };

        let len = list.len() as isize;
        let start = if start < 0 { (len + start).max(0) } else { start };
        let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };

        if len == 0 || start > stop || start >= len {
            return Ok(Vec::new());
        }

        Ok(list[start as usize..=stop as usize].to_vec())
    }

    async fn flushdb(&self) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.values.clear();
        inner.lists.clear();
        Ok(())
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}
