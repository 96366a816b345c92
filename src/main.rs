//! Traced Cache - a Redis-backed cache client with call tracing
//!
//! Demo binary: stores a few payloads, replays the recorded call history,
//! then fetches a page twice to show the fetch cache and access counter.

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use traced_cache::{Cache, Config, PageCache, RedisBackend, STORE_OP};

/// Demo entry point.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Connect to the backing store
/// 4. Exercise the value cache and print its replay report
/// 5. Exercise the page cache and its access counter
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "traced_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting traced cache demo");

    // Load configuration from environment variables
    let config = Config::from_env();
    info!(
        "Configuration loaded: redis_url={}, page_ttl={}s, http_timeout={}s",
        config.redis_url, config.page_ttl, config.http_timeout
    );

    // Connect to the backing store
    let backend = RedisBackend::connect(&config.redis_url).await?;

    // Start from an empty store, counters and history included
    let cache = Cache::new(backend.clone());
    cache.flush().await?;

    let first = cache.store("hello cache").await?;
    let second = cache.store(42i64).await?;
    let third = cache.store(3.14f64).await?;

    info!(
        "Read back: {:?}, {:?}, {:?}",
        cache.get_text(&first).await?,
        cache.get_int(&second).await?,
        cache.get_text(&third).await?
    );
    info!(
        "store was called {} times",
        cache.call_count(&STORE_OP).await?
    );

    print!("{}", cache.replay(&STORE_OP).await?);

    // Fetch the same page twice; the second call is served from the store
    let pages = PageCache::from_config(backend, &config)?;
    let url = "https://example.com/";

    let body = pages.fetch(url).await?;
    info!("Fetched {} ({} bytes)", url, body.len());
    let body = pages.fetch(url).await?;
    info!("Fetched {} again ({} bytes)", url, body.len());
    info!(
        "{} was accessed {} times",
        url,
        pages.access_count(url).await?
    );

    Ok(())
}
