//! Per-batch processing report
//!
//! Built by the ingestion pipeline while walking a batch and carried back to
//! the producer inside the acknowledgment frame. Counts are per-category so
//! a caller can distinguish "rejected for integrity" (invalid) from
//! "accepted but not durably stored" (valid, not saved).

use serde::{Deserialize, Serialize};

/// One item-level failure, kept with the item's position in the batch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ItemError {
    /// Zero-based index of the envelope within the batch
    pub message_index: usize,

    /// Human-readable failure reason
    pub error: String,
}

/// Outcome counts for one processed batch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    /// Envelopes in the batch as decoded
    pub message_count: usize,

    /// Items the pipeline attempted (always equals `message_count` when the
    /// batch itself decoded)
    pub processed_count: usize,

    /// Items whose tag validated
    pub valid_count: usize,

    /// Items rejected at decrypt, parse, or tag stage
    pub invalid_count: usize,

    /// Valid items durably persisted
    pub saved_count: usize,

    /// Item-level failures, in input order
    pub errors: Vec<ItemError>,

    /// Wall-clock processing time in milliseconds
    #[serde(rename = "processingTime")]
    pub processing_time_ms: u64,
}

impl BatchReport {
    /// Create an empty report for a batch of `message_count` envelopes
    pub fn new(message_count: usize) -> Self {
        Self {
            message_count,
            processed_count: 0,
            valid_count: 0,
            invalid_count: 0,
            saved_count: 0,
            errors: Vec::new(),
            processing_time_ms: 0,
        }
    }

    /// Record a valid item that was durably stored
    pub fn record_saved(&mut self) {
        self.processed_count += 1;
        self.valid_count += 1;
        self.saved_count += 1;
    }

    /// Record a valid item whose persistence failed
    pub fn record_unsaved(&mut self, index: usize, reason: impl Into<String>) {
        self.processed_count += 1;
        self.valid_count += 1;
        self.errors.push(ItemError {
            message_index: index,
            error: reason.into(),
        });
    }

    /// Record an item rejected before persistence
    pub fn record_invalid(&mut self, index: usize, reason: impl Into<String>) {
        self.processed_count += 1;
        self.invalid_count += 1;
        self.errors.push(ItemError {
            message_index: index,
            error: reason.into(),
        });
    }

    /// Number of item-level failures
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}
