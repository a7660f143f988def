//! Periodic stats reporter
//!
//! Logs a one-line summary of cumulative processing stats and store shape
//! at a fixed interval. Purely observational; nothing reads it back.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use pulse_store::BucketStore;

use crate::stats::ProcessingStats;

/// Periodic stats summary task
pub struct StatsReporter {
    stats: Arc<ProcessingStats>,
    store: Arc<dyn BucketStore>,
    interval: Duration,
    enabled: bool,
}

impl StatsReporter {
    /// Create a reporter
    pub fn new(
        stats: Arc<ProcessingStats>,
        store: Arc<dyn BucketStore>,
        interval: Duration,
        enabled: bool,
    ) -> Self {
        Self {
            stats,
            store,
            interval,
            enabled,
        }
    }

    /// Run until cancelled
    ///
    /// Returns immediately when reporting is disabled. A tick that takes
    /// longer than the interval skips forward rather than bursting.
    pub async fn run(self, cancel: CancellationToken) {
        if !self.enabled {
            return;
        }

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // Discard the immediate first tick; report after one full interval
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    break;
                }
                _ = ticker.tick() => {
                    self.report().await;
                }
            }
        }

        tracing::debug!("stats reporter stopped");
    }

    async fn report(&self) {
        let snap = self.stats.snapshot();
        let buckets = self.store.bucket_count().await.unwrap_or(0);
        let records = self.store.total_records().await.unwrap_or(0);

        tracing::info!(
            batches = snap.batches,
            received = snap.received,
            valid = snap.valid,
            invalid = snap.invalid,
            saved = snap.saved,
            errors = snap.errors,
            buckets,
            records,
            "processing stats"
        );
    }
}
