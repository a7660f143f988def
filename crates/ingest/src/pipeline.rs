//! Ingestion pipeline
//!
//! Runs one batch stream through decode, decrypt, parse, integrity check,
//! and persistence. Failures are isolated per item: a bad envelope is
//! counted and reported, and the walk continues. Only a stream that fails
//! to decode at all aborts the batch.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::{Map, Value};
use tokio::time::timeout;

use pulse_crypto::{validate_tag, EnvelopeCipher, TAG_FIELD};
use pulse_protocol::{BatchReport, ProtocolError};
use pulse_store::{BucketStore, RecordDraft};

use crate::stats::ProcessingStats;

/// Per-batch processing pipeline
///
/// Shared across connections behind an `Arc`; holds no per-batch state.
pub struct IngestionPipeline {
    cipher: EnvelopeCipher,
    store: Arc<dyn BucketStore>,
    stats: Arc<ProcessingStats>,
    persist_timeout: Duration,
}

impl IngestionPipeline {
    /// Create a pipeline over a store
    pub fn new(
        cipher: EnvelopeCipher,
        store: Arc<dyn BucketStore>,
        stats: Arc<ProcessingStats>,
        persist_timeout: Duration,
    ) -> Self {
        Self {
            cipher,
            store,
            stats,
            persist_timeout,
        }
    }

    /// Cumulative stats shared with the reporter
    pub fn stats(&self) -> Arc<ProcessingStats> {
        Arc::clone(&self.stats)
    }

    /// Process one batch stream and return its report
    ///
    /// Items run in input order; each item's failure is recorded in the
    /// report without affecting its neighbors. The report is also folded
    /// into the cumulative stats before returning.
    ///
    /// # Errors
    ///
    /// `EmptyStream` if the stream itself cannot be decoded. The caller
    /// should answer with an error frame; no items were attempted.
    pub async fn process_batch(&self, stream: &str) -> Result<BatchReport, ProtocolError> {
        let started = Instant::now();

        let envelopes = match pulse_protocol::decode(stream) {
            Ok(envelopes) => envelopes,
            Err(e) => {
                self.stats.record_batch_error();
                return Err(e);
            }
        };

        let mut report = BatchReport::new(envelopes.len());

        for (index, envelope) in envelopes.iter().enumerate() {
            match self.process_item(envelope).await {
                ItemOutcome::Saved => report.record_saved(),
                ItemOutcome::Unsaved(reason) => report.record_unsaved(index, reason),
                ItemOutcome::Invalid(reason) => report.record_invalid(index, reason),
            }
        }

        report.processing_time_ms = started.elapsed().as_millis() as u64;
        self.stats.record_report(&report);

        Ok(report)
    }

    /// Run one envelope through decrypt, parse, validate, persist
    async fn process_item(&self, envelope: &str) -> ItemOutcome {
        let plaintext = match self.cipher.decrypt(envelope) {
            Ok(bytes) => bytes,
            Err(e) => return ItemOutcome::Invalid(format!("decrypt failed: {}", e)),
        };

        let message: Map<String, Value> = match serde_json::from_slice(&plaintext) {
            Ok(Value::Object(map)) => map,
            Ok(_) => return ItemOutcome::Invalid("message is not a JSON object".to_string()),
            Err(e) => return ItemOutcome::Invalid(format!("message is not valid JSON: {}", e)),
        };

        match validate_tag(&message) {
            Ok(true) => {}
            Ok(false) => return ItemOutcome::Invalid("integrity tag mismatch".to_string()),
            Err(e) => return ItemOutcome::Invalid(e.to_string()),
        }

        let draft = match extract_draft(&message) {
            Ok(draft) => draft,
            Err(field) => {
                return ItemOutcome::Invalid(format!("missing or empty field '{}'", field))
            }
        };

        match timeout(self.persist_timeout, self.store.append(draft)).await {
            Ok(Ok(_record)) => ItemOutcome::Saved,
            Ok(Err(e)) => ItemOutcome::Unsaved(format!("store error: {}", e)),
            Err(_) => ItemOutcome::Unsaved(format!(
                "store timeout after {}ms",
                self.persist_timeout.as_millis()
            )),
        }
    }
}

impl std::fmt::Debug for IngestionPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestionPipeline")
            .field("persist_timeout", &self.persist_timeout)
            .finish_non_exhaustive()
    }
}

/// Outcome of one item's walk through the pipeline
enum ItemOutcome {
    /// Valid and durably persisted
    Saved,
    /// Valid but persistence failed
    Unsaved(String),
    /// Rejected before persistence
    Invalid(String),
}

/// Pull the record fields out of a validated message
///
/// Returns the name of the first missing or empty field on failure. The
/// tag and any extra fields are dropped; only the record fields persist.
fn extract_draft(message: &Map<String, Value>) -> Result<RecordDraft, &'static str> {
    let field = |name: &'static str| -> Result<String, &'static str> {
        match message.get(name) {
            Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
            _ => Err(name),
        }
    };

    // TAG_FIELD is already validated and never stored
    debug_assert!(message.contains_key(TAG_FIELD));

    Ok(RecordDraft {
        name: field("name")?,
        origin: field("origin")?,
        destination: field("destination")?,
    })
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod pipeline_test;
