//! Integration Tests for the Value Cache
//!
//! Exercises the full store/get/count/history/replay flow over the
//! in-memory backend.

use traced_cache::{Backend, Cache, CacheError, MemoryBackend, Value, STORE_OP};

// == Helper Functions ==

fn new_cache() -> (Cache<MemoryBackend>, MemoryBackend) {
    let backend = MemoryBackend::new();
    (Cache::new(backend.clone()), backend)
}

// == Round-trip Tests ==

#[tokio::test]
async fn test_roundtrip_all_payload_types() {
    let (cache, _) = new_cache();

    let text_key = cache.store("some text").await.unwrap();
    let bytes_key = cache.store(vec![1u8, 2, 3]).await.unwrap();
    let int_key = cache.store(-99i64).await.unwrap();
    let float_key = cache.store(0.5f64).await.unwrap();

    assert_eq!(
        cache.get_text(&text_key).await.unwrap(),
        Some("some text".to_string())
    );
    assert_eq!(
        cache.get(&bytes_key).await.unwrap(),
        Some(vec![1u8, 2, 3])
    );
    assert_eq!(cache.get_int(&int_key).await.unwrap(), Some(-99));
    assert_eq!(
        cache.get_text(&float_key).await.unwrap(),
        Some("0.5".to_string())
    );
}

#[tokio::test]
async fn test_get_never_stored_identifier() {
    let (cache, _) = new_cache();

    assert_eq!(cache.get("no-such-id").await.unwrap(), None);
    assert_eq!(cache.get_int("no-such-id").await.unwrap(), None);
    assert_eq!(cache.get_text("no-such-id").await.unwrap(), None);
}

#[tokio::test]
async fn test_get_int_on_text_payload() {
    let (cache, _) = new_cache();

    let key = cache.store("42").await.unwrap();
    assert_eq!(cache.get_int(&key).await.unwrap(), Some(42));
}

#[tokio::test]
async fn test_converter_failure_propagates() {
    let (cache, _) = new_cache();

    let key = cache.store(vec![0xffu8, 0xfe]).await.unwrap();
    let result = cache.get_text(&key).await;

    assert!(matches!(result, Err(CacheError::Conversion(_))));
}

// == Counting and History Tests ==

#[tokio::test]
async fn test_counter_tracks_store_calls() {
    let (cache, _) = new_cache();

    for i in 0u64..4 {
        assert_eq!(cache.call_count(&STORE_OP).await.unwrap(), i);
        cache.store("payload").await.unwrap();
    }

    assert_eq!(cache.call_count(&STORE_OP).await.unwrap(), 4);
}

#[tokio::test]
async fn test_history_pairs_inputs_with_outputs() {
    let (cache, backend) = new_cache();

    let payloads = ["first", "second", "third"];
    let mut keys = Vec::new();
    for payload in payloads {
        keys.push(cache.store(payload).await.unwrap());
    }

    let inputs = backend
        .lrange(&STORE_OP.inputs_key(), 0, -1)
        .await
        .unwrap();
    let outputs = backend
        .lrange(&STORE_OP.outputs_key(), 0, -1)
        .await
        .unwrap();

    assert_eq!(inputs.len(), outputs.len());
    assert_eq!(outputs, keys);
    for (input, payload) in inputs.iter().zip(payloads) {
        assert_eq!(input, &Value::from(payload).to_string());
    }
    // Each recorded output resolves to the payload recorded next to it
    for (key, payload) in keys.iter().zip(payloads) {
        assert_eq!(
            cache.get_text(key).await.unwrap(),
            Some(payload.to_string())
        );
    }
}

#[tokio::test]
async fn test_replay_reports_full_history() {
    let (cache, _) = new_cache();

    let key1 = cache.store("alpha").await.unwrap();
    let key2 = cache.store(123i64).await.unwrap();
    let key3 = cache.store(vec![7u8]).await.unwrap();

    let report = cache.replay(&STORE_OP).await.unwrap();
    let expected = format!(
        "Cache::store was called 3 times:\n\
         Cache::store(\"alpha\") -> {}\n\
         Cache::store(123) -> {}\n\
         Cache::store(b\"\\x07\") -> {}\n",
        key1, key2, key3
    );

    assert_eq!(report, expected);
}

#[tokio::test]
async fn test_replay_on_unused_operation() {
    let (cache, _) = new_cache();

    let report = cache.replay(&STORE_OP).await.unwrap();
    assert_eq!(report, "Cache::store was called 0 times:\n");
}

// == Shared Store Tests ==

#[tokio::test]
async fn test_clients_share_state_through_the_store() {
    let backend = MemoryBackend::new();
    let writer = Cache::new(backend.clone());
    let reader = Cache::new(backend);

    let key = writer.store("shared").await.unwrap();

    // The second client sees the payload, the counter and the history
    // because none of that state lives in the client.
    assert_eq!(
        reader.get_text(&key).await.unwrap(),
        Some("shared".to_string())
    );
    assert_eq!(reader.call_count(&STORE_OP).await.unwrap(), 1);
    assert_eq!(
        reader.replay(&STORE_OP).await.unwrap(),
        writer.replay(&STORE_OP).await.unwrap()
    );
}

// == Flush Tests ==

#[tokio::test]
async fn test_flush_resets_payloads_counters_and_history() {
    let (cache, _) = new_cache();

    let key = cache.store("gone soon").await.unwrap();
    assert_eq!(cache.call_count(&STORE_OP).await.unwrap(), 1);

    cache.flush().await.unwrap();

    assert_eq!(cache.get(&key).await.unwrap(), None);
    assert_eq!(cache.call_count(&STORE_OP).await.unwrap(), 0);
    assert_eq!(
        cache.replay(&STORE_OP).await.unwrap(),
        "Cache::store was called 0 times:\n"
    );
}
