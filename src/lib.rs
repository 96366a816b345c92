//! Traced Cache - a Redis-backed cache client with call tracing
//!
//! Stores payloads under generated identifiers, counts and records every
//! store call for later replay, and separately caches fetched web pages
//! under a fixed TTL with per-URL access counting.

pub mod backend;
pub mod cache;
pub mod config;
pub mod error;
pub mod trace;
pub mod web;

pub use backend::{Backend, MemoryBackend, RedisBackend};
pub use cache::{Cache, Value, STORE_OP};
pub use config::Config;
pub use error::{CacheError, Result};
pub use trace::Operation;
pub use web::PageCache;
