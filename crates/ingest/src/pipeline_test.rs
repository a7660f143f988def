//! Pipeline tests
//!
//! Cover per-item failure isolation and the count conservation rules:
//! processed = valid + invalid, saved <= valid.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Map, Value};

use pulse_crypto::{tag_message, EnvelopeCipher};
use pulse_protocol::ProtocolError;
use pulse_store::{BucketStore, EventRecord, MemoryBucketStore, MinuteBucket, RecordDraft, StoreError};

use crate::pipeline::IngestionPipeline;
use crate::stats::ProcessingStats;

const SECRET: &str = "pipeline-test-secret";

fn envelope(cipher: &EnvelopeCipher, name: &str, origin: &str, destination: &str) -> String {
    let mut fields = Map::new();
    fields.insert("name".to_string(), json!(name));
    fields.insert("origin".to_string(), json!(origin));
    fields.insert("destination".to_string(), json!(destination));
    let tagged = tag_message(fields);
    let bytes = serde_json::to_vec(&Value::Object(tagged)).unwrap();
    cipher.encrypt(&bytes)
}

fn pipeline() -> (IngestionPipeline, Arc<MemoryBucketStore>) {
    let store = Arc::new(MemoryBucketStore::new());
    let pipeline = IngestionPipeline::new(
        EnvelopeCipher::new(SECRET),
        store.clone(),
        Arc::new(ProcessingStats::new()),
        Duration::from_secs(5),
    );
    (pipeline, store)
}

#[tokio::test]
async fn test_all_valid_batch() {
    let (pipeline, store) = pipeline();
    let cipher = EnvelopeCipher::new(SECRET);

    let stream = pulse_protocol::encode(&[
        envelope(&cipher, "Asha", "Mumbai", "Delhi"),
        envelope(&cipher, "Ravi", "Mumbai", "Delhi"),
        envelope(&cipher, "Meera", "Pune", "Chennai"),
    ]);

    let report = pipeline.process_batch(&stream).await.unwrap();
    assert_eq!(report.message_count, 3);
    assert_eq!(report.processed_count, 3);
    assert_eq!(report.valid_count, 3);
    assert_eq!(report.invalid_count, 0);
    assert_eq!(report.saved_count, 3);
    assert!(report.errors.is_empty());

    assert_eq!(store.total_records().await.unwrap(), 3);
}

#[tokio::test]
async fn test_bad_item_does_not_poison_batch() {
    let (pipeline, store) = pipeline();
    let cipher = EnvelopeCipher::new(SECRET);

    let stream = pulse_protocol::encode(&[
        envelope(&cipher, "Asha", "Mumbai", "Delhi"),
        "not-an-envelope".to_string(),
        envelope(&cipher, "Ravi", "Pune", "Chennai"),
        envelope(&cipher, "Meera", "Pune", "Delhi"),
    ]);

    let report = pipeline.process_batch(&stream).await.unwrap();
    assert_eq!(report.processed_count, 4);
    assert_eq!(report.valid_count, 3);
    assert_eq!(report.invalid_count, 1);
    assert_eq!(report.saved_count, 3);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].message_index, 1);

    assert_eq!(store.total_records().await.unwrap(), 3);
}

#[tokio::test]
async fn test_tampered_message_rejected() {
    let (pipeline, _store) = pipeline();
    let cipher = EnvelopeCipher::new(SECRET);

    // Tag computed over one name, message altered afterwards
    let mut fields = Map::new();
    fields.insert("name".to_string(), json!("Asha"));
    fields.insert("origin".to_string(), json!("Mumbai"));
    fields.insert("destination".to_string(), json!("Delhi"));
    let mut tagged = tag_message(fields);
    tagged.insert("name".to_string(), json!("Mallory"));
    let bytes = serde_json::to_vec(&Value::Object(tagged)).unwrap();

    let report = pipeline.process_batch(&cipher.encrypt(&bytes)).await.unwrap();
    assert_eq!(report.invalid_count, 1);
    assert_eq!(report.saved_count, 0);
    assert!(report.errors[0].error.contains("tag mismatch"));
}

#[tokio::test]
async fn test_missing_tag_rejected() {
    let (pipeline, _store) = pipeline();
    let cipher = EnvelopeCipher::new(SECRET);

    let bytes = serde_json::to_vec(&json!({
        "name": "Asha",
        "origin": "Mumbai",
        "destination": "Delhi",
    }))
    .unwrap();

    let report = pipeline.process_batch(&cipher.encrypt(&bytes)).await.unwrap();
    assert_eq!(report.invalid_count, 1);
    assert_eq!(report.valid_count, 0);
}

#[tokio::test]
async fn test_missing_field_rejected() {
    let (pipeline, _store) = pipeline();
    let cipher = EnvelopeCipher::new(SECRET);

    let mut fields = Map::new();
    fields.insert("name".to_string(), json!("Asha"));
    fields.insert("origin".to_string(), json!("Mumbai"));
    let tagged = tag_message(fields);
    let bytes = serde_json::to_vec(&Value::Object(tagged)).unwrap();

    let report = pipeline.process_batch(&cipher.encrypt(&bytes)).await.unwrap();
    assert_eq!(report.invalid_count, 1);
    assert!(report.errors[0].error.contains("destination"));
}

#[tokio::test]
async fn test_wrong_secret_rejected() {
    let (pipeline, _store) = pipeline();
    let other = EnvelopeCipher::new("some-other-secret");

    let report = pipeline
        .process_batch(&envelope(&other, "Asha", "Mumbai", "Delhi"))
        .await
        .unwrap();
    // CTR decrypts to garbage that fails the JSON parse
    assert_eq!(report.invalid_count, 1);
    assert_eq!(report.saved_count, 0);
}

#[tokio::test]
async fn test_empty_stream_is_batch_error() {
    let (pipeline, _store) = pipeline();
    let stats = pipeline.stats();

    let result = pipeline.process_batch("   ").await;
    assert!(matches!(result, Err(ProtocolError::EmptyStream)));
    assert_eq!(stats.snapshot().errors, 1);
    assert_eq!(stats.snapshot().batches, 0);
}

#[tokio::test]
async fn test_stats_accumulate_across_batches() {
    let (pipeline, _store) = pipeline();
    let cipher = EnvelopeCipher::new(SECRET);
    let stats = pipeline.stats();

    let good = envelope(&cipher, "Asha", "Mumbai", "Delhi");
    pipeline.process_batch(&good).await.unwrap();
    pipeline
        .process_batch(&pulse_protocol::encode(&[good, "junk".to_string()]))
        .await
        .unwrap();

    let snap = stats.snapshot();
    assert_eq!(snap.batches, 2);
    assert_eq!(snap.received, 3);
    assert_eq!(snap.valid, 2);
    assert_eq!(snap.invalid, 1);
    assert_eq!(snap.saved, 2);
}

/// Store whose appends always fail, for exercising the unsaved path
struct FailingStore;

#[async_trait::async_trait]
impl BucketStore for FailingStore {
    async fn append(&self, _draft: RecordDraft) -> Result<EventRecord, StoreError> {
        Err(StoreError::Backend("disk on fire".to_string()))
    }

    async fn get(&self, _bucket_key: &str) -> Result<Option<MinuteBucket>, StoreError> {
        Ok(None)
    }

    async fn bucket_keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(Vec::new())
    }

    async fn bucket_count(&self) -> Result<usize, StoreError> {
        Ok(0)
    }

    async fn total_records(&self) -> Result<u64, StoreError> {
        Ok(0)
    }
}

#[tokio::test]
async fn test_store_failure_is_valid_but_unsaved() {
    let cipher = EnvelopeCipher::new(SECRET);
    let pipeline = IngestionPipeline::new(
        EnvelopeCipher::new(SECRET),
        Arc::new(FailingStore),
        Arc::new(ProcessingStats::new()),
        Duration::from_secs(5),
    );

    let report = pipeline
        .process_batch(&envelope(&cipher, "Asha", "Mumbai", "Delhi"))
        .await
        .unwrap();
    assert_eq!(report.valid_count, 1);
    assert_eq!(report.invalid_count, 0);
    assert_eq!(report.saved_count, 0);
    assert!(report.errors[0].error.contains("store error"));
}
