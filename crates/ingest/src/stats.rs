//! Cumulative processing statistics
//!
//! Lock-free counters shared between the pipeline, the stats reporter, and
//! whoever else wants a read. All increments are relaxed; the snapshot is a
//! point-in-time read, not a consistent cut.

use std::sync::atomic::{AtomicU64, Ordering};

use pulse_protocol::BatchReport;
use serde::Serialize;

/// Cumulative counters across all processed batches
#[derive(Debug, Default)]
pub struct ProcessingStats {
    /// Batches that decoded and ran through the pipeline
    batches: AtomicU64,

    /// Envelopes received across all batches
    received: AtomicU64,

    /// Items the pipeline attempted
    processed: AtomicU64,

    /// Items whose integrity tag validated
    valid: AtomicU64,

    /// Items rejected at decrypt, parse, or tag stage
    invalid: AtomicU64,

    /// Valid items durably persisted
    saved: AtomicU64,

    /// Item-level failures plus batch-level decode failures
    errors: AtomicU64,
}

impl ProcessingStats {
    /// Create zeroed stats
    pub const fn new() -> Self {
        Self {
            batches: AtomicU64::new(0),
            received: AtomicU64::new(0),
            processed: AtomicU64::new(0),
            valid: AtomicU64::new(0),
            invalid: AtomicU64::new(0),
            saved: AtomicU64::new(0),
            errors: AtomicU64::new(0),
        }
    }

    /// Fold one batch report into the totals
    pub fn record_report(&self, report: &BatchReport) {
        self.batches.fetch_add(1, Ordering::Relaxed);
        self.received
            .fetch_add(report.message_count as u64, Ordering::Relaxed);
        self.processed
            .fetch_add(report.processed_count as u64, Ordering::Relaxed);
        self.valid
            .fetch_add(report.valid_count as u64, Ordering::Relaxed);
        self.invalid
            .fetch_add(report.invalid_count as u64, Ordering::Relaxed);
        self.saved
            .fetch_add(report.saved_count as u64, Ordering::Relaxed);
        self.errors
            .fetch_add(report.error_count() as u64, Ordering::Relaxed);
    }

    /// Record a batch that failed before any item ran (stream decode failure)
    pub fn record_batch_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time snapshot of all counters
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            batches: self.batches.load(Ordering::Relaxed),
            received: self.received.load(Ordering::Relaxed),
            processed: self.processed.load(Ordering::Relaxed),
            valid: self.valid.load(Ordering::Relaxed),
            invalid: self.invalid.load(Ordering::Relaxed),
            saved: self.saved.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of cumulative processing stats
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub batches: u64,
    pub received: u64,
    pub processed: u64,
    pub valid: u64,
    pub invalid: u64,
    pub saved: u64,
    pub errors: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_report_accumulates() {
        let stats = ProcessingStats::new();

        let mut report = BatchReport::new(3);
        report.record_saved();
        report.record_saved();
        report.record_invalid(2, "bad tag");
        stats.record_report(&report);

        let mut report = BatchReport::new(2);
        report.record_saved();
        report.record_unsaved(1, "store timeout");
        stats.record_report(&report);

        let snap = stats.snapshot();
        assert_eq!(snap.batches, 2);
        assert_eq!(snap.received, 5);
        assert_eq!(snap.processed, 5);
        assert_eq!(snap.valid, 4);
        assert_eq!(snap.invalid, 1);
        assert_eq!(snap.saved, 3);
        assert_eq!(snap.errors, 2);
    }

    #[test]
    fn test_batch_error_counts_once() {
        let stats = ProcessingStats::new();
        stats.record_batch_error();

        let snap = stats.snapshot();
        assert_eq!(snap.errors, 1);
        assert_eq!(snap.batches, 0);
        assert_eq!(snap.received, 0);
    }

    #[test]
    fn test_snapshot_serializes_camel_case() {
        let snap = ProcessingStats::new().snapshot();
        let json = serde_json::to_value(snap).unwrap();
        assert!(json.get("received").is_some());
        assert!(json.get("invalid").is_some());
    }
}
