//! Web Module
//!
//! URL fetch caching: fetches pages over HTTP GET, caches the body in the
//! backing store under a fixed TTL, and counts accesses per URL regardless
//! of cache outcome.

use std::time::Duration;

use tracing::debug;

use crate::backend::Backend;
use crate::config::Config;
use crate::error::{CacheError, Result};

// == Key Conventions ==
/// Prefix of cached page bodies.
pub const PAGE_KEY_PREFIX: &str = "cache:";

/// Prefix of per-URL access counters.
pub const COUNT_KEY_PREFIX: &str = "count:";

fn page_key(url: &str) -> String {
    format!("{}{}", PAGE_KEY_PREFIX, url)
}

fn count_key(url: &str) -> String {
    format!("{}{}", COUNT_KEY_PREFIX, url)
}

// == Page Cache ==
/// HTTP page fetcher with store-backed caching and access counting.
///
/// Expiry is delegated entirely to the store: the TTL is set at write time
/// and never checked or refreshed here.
#[derive(Debug, Clone)]
pub struct PageCache<B: Backend> {
    backend: B,
    client: reqwest::Client,
    ttl_seconds: u64,
}

impl<B: Backend> PageCache<B> {
    // == Constructors ==
    /// Creates a page cache with the given body TTL and HTTP request timeout.
    ///
    /// # Arguments
    /// * `ttl_seconds` - How long fetched bodies stay cached
    /// * `timeout_seconds` - Per-request timeout of the HTTP client
    pub fn new(backend: B, ttl_seconds: u64, timeout_seconds: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self {
            backend,
            client,
            ttl_seconds,
        })
    }

    /// Creates a page cache from configuration values.
    pub fn from_config(backend: B, config: &Config) -> Result<Self> {
        Self::new(backend, config.page_ttl, config.http_timeout)
    }

    // == Fetch ==
    /// Fetches the page at `url`, serving the cached body when present.
    ///
    /// The access counter is incremented on every call, hit or miss. On a
    /// miss the body is fetched over HTTP GET, cached for the configured
    /// TTL and returned. The body is stored whatever the response status;
    /// only transport failures propagate.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        self.backend.incr(&count_key(url)).await?;

        let key = page_key(url);
        if let Some(cached) = self.backend.get(&key).await? {
            debug!(url = %url, "Serving cached page");
            let body = String::from_utf8(cached)
                .map_err(|e| CacheError::Conversion(format!("invalid utf-8 page body: {}", e)))?;
            return Ok(body);
        }

        debug!(url = %url, "Cache miss, fetching page");
        let body = self.client.get(url).send().await?.text().await?;
        self.backend
            .set_ex(&key, body.as_bytes(), self.ttl_seconds)
            .await?;

        Ok(body)
    }

    // == Access Count ==
    /// Number of times `fetch` has been called for `url`, 0 if never.
    pub async fn access_count(&self, url: &str) -> Result<u64> {
        match self.backend.get(&count_key(url)).await? {
            Some(raw) => {
                let text = String::from_utf8(raw)
                    .map_err(|e| CacheError::Conversion(format!("invalid utf-8 counter: {}", e)))?;
                let count = text
                    .parse::<i64>()
                    .map_err(|e| CacheError::Conversion(format!("invalid counter: {}", e)))?;
                Ok(count.max(0) as u64)
            }
            None => Ok(0),
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;

    const TEST_TTL: u64 = 10;
    const TEST_TIMEOUT: u64 = 5;

    #[tokio::test]
    async fn test_fetch_serves_cached_body_without_network() {
        let backend = MemoryBackend::new();
        let pages = PageCache::new(backend.clone(), TEST_TTL, TEST_TIMEOUT).unwrap();

        // Preload the cache; the URL is unroutable so any network attempt
        // would fail the test.
        let url = "http://unreachable.invalid/page";
        backend
            .set_ex(&page_key(url), b"cached body", TEST_TTL)
            .await
            .unwrap();

        let body = pages.fetch(url).await.unwrap();
        assert_eq!(body, "cached body");
    }

    #[tokio::test]
    async fn test_fetch_counts_cache_hits() {
        let backend = MemoryBackend::new();
        let pages = PageCache::new(backend.clone(), TEST_TTL, TEST_TIMEOUT).unwrap();

        let url = "http://unreachable.invalid/page";
        backend
            .set_ex(&page_key(url), b"cached body", TEST_TTL)
            .await
            .unwrap();

        pages.fetch(url).await.unwrap();
        pages.fetch(url).await.unwrap();

        assert_eq!(pages.access_count(url).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_access_count_independent_per_url() {
        let backend = MemoryBackend::new();
        let pages = PageCache::new(backend.clone(), TEST_TTL, TEST_TIMEOUT).unwrap();

        let first = "http://unreachable.invalid/a";
        let second = "http://unreachable.invalid/b";
        backend
            .set_ex(&page_key(first), b"a", TEST_TTL)
            .await
            .unwrap();
        backend
            .set_ex(&page_key(second), b"b", TEST_TTL)
            .await
            .unwrap();

        pages.fetch(first).await.unwrap();
        pages.fetch(first).await.unwrap();
        pages.fetch(second).await.unwrap();

        assert_eq!(pages.access_count(first).await.unwrap(), 2);
        assert_eq!(pages.access_count(second).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_access_count_zero_when_never_fetched() {
        let backend = MemoryBackend::new();
        let pages = PageCache::new(backend, TEST_TTL, TEST_TIMEOUT).unwrap();

        assert_eq!(
            pages.access_count("http://unreachable.invalid/").await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_key_prefixes() {
        assert_eq!(page_key("http://x/"), "cache:http://x/");
        assert_eq!(count_key("http://x/"), "count:http://x/");
    }
}
