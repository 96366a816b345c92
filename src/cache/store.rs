//! Cache Store Module
//!
//! The instrumented value cache: writes payloads under freshly generated
//! identifiers and runs every `store` call through the counting and history
//! wrappers from the trace module.

use uuid::Uuid;

use crate::backend::Backend;
use crate::cache::Value;
use crate::error::{CacheError, Result};
use crate::trace::{self, Operation};

// == Operation Identity ==
/// Name under which `store` calls are counted and recorded.
pub const STORE_OP: Operation = Operation::new("Cache::store");

// == Cache ==
/// Instrumented value cache over a backing store.
///
/// Holds nothing but the backend handle; counters, history and payloads all
/// live in the store.
#[derive(Debug, Clone)]
pub struct Cache<B: Backend> {
    backend: B,
}

impl<B: Backend> Cache<B> {
    // == Constructor ==
    /// Creates a cache over the given backend handle.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    // == Store ==
    /// Stores a payload under a freshly generated identifier and returns
    /// the identifier.
    ///
    /// Each call is traced under [`STORE_OP`]: the invocation counter is
    /// incremented first, the rendered input is appended to the input
    /// history before the write, and the returned identifier is appended to
    /// the output history after it.
    ///
    /// # Arguments
    /// * `value` - The payload to store; anything convertible into [`Value`]
    pub async fn store(&self, value: impl Into<Value>) -> Result<String> {
        let value = value.into();
        let input = value.to_string();

        trace::count_calls(&self.backend, &STORE_OP, async {
            trace::with_history(&self.backend, &STORE_OP, &input, async {
                let key = Uuid::new_v4().to_string();
                self.backend.set(&key, &value.into_bytes()).await?;
                Ok(key)
            })
            .await
        })
        .await
    }

    // == Get ==
    /// Reads the raw payload stored under an identifier.
    ///
    /// Returns `Ok(None)` when the identifier was never stored; absence is
    /// not an error.
    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.backend.get(key).await
    }

    /// Reads the payload and applies a converter to it.
    ///
    /// Absent identifiers yield `Ok(None)` without invoking the converter;
    /// a converter failure propagates to the caller.
    pub async fn get_with<T, F>(&self, key: &str, convert: F) -> Result<Option<T>>
    where
        F: FnOnce(Vec<u8>) -> Result<T>,
    {
        match self.backend.get(key).await? {
            Some(raw) => convert(raw).map(Some),
            None => Ok(None),
        }
    }

    /// Reads the payload and parses it as an integer.
    pub async fn get_int(&self, key: &str) -> Result<Option<i64>> {
        self.get_with(key, |raw| {
            let text = String::from_utf8(raw)
                .map_err(|e| CacheError::Conversion(format!("invalid utf-8 payload: {}", e)))?;
            text.parse::<i64>()
                .map_err(|e| CacheError::Conversion(format!("invalid integer payload: {}", e)))
        })
        .await
    }

    /// Reads the payload and decodes it as UTF-8 text.
    pub async fn get_text(&self, key: &str) -> Result<Option<String>> {
        self.get_with(key, |raw| {
            String::from_utf8(raw)
                .map_err(|e| CacheError::Conversion(format!("invalid utf-8 payload: {}", e)))
        })
        .await
    }

    // == Call Count ==
    /// Number of times the operation has been invoked, 0 if never.
    pub async fn call_count(&self, op: &Operation) -> Result<u64> {
        match self.get_int(op.counter_key()).await? {
            Some(count) => Ok(count.max(0) as u64),
            None => Ok(0),
        }
    }

    // == Replay ==
    /// Renders the operation's recorded call history as a report.
    pub async fn replay(&self, op: &Operation) -> Result<String> {
        trace::replay(&self.backend, op).await
    }

    // == Flush ==
    /// Removes every key from the backing store, counters and history
    /// included.
    pub async fn flush(&self) -> Result<()> {
        self.backend.flushdb().await
    }
}
