//! In-memory bucket store
//!
//! The default backend: a `DashMap` keyed by bucket key. All bucket
//! mutation happens inside `DashMap::entry`, which holds the shard lock for
//! that key, so the "create bucket or append to it" decision and the
//! per-counter increment-or-insert both execute as one indivisible step.
//! Two concurrent first-writers for a minute cannot create two buckets:
//! whichever loses the entry race lands in `and_modify`.

use async_trait::async_trait;
use chrono::{DateTime, Timelike, Utc};
use dashmap::DashMap;

use crate::bucket::{bucket_key_for, MinuteBucket};
use crate::error::StoreError;
use crate::record::{EventRecord, RecordDraft};
use crate::store::BucketStore;

/// In-process bucket store
#[derive(Debug, Default)]
pub struct MemoryBucketStore {
    buckets: DashMap<String, MinuteBucket>,
}

impl MemoryBucketStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Append with an explicit timestamp; the trait method stamps with now.
    /// Also the seam tests use to force records into a chosen minute.
    pub fn append_at(
        &self,
        draft: RecordDraft,
        timestamp: DateTime<Utc>,
    ) -> Result<EventRecord, StoreError> {
        let record = EventRecord::from_draft(draft, timestamp);
        let minute = truncate_to_minute(timestamp);
        let key = bucket_key_for(minute);

        let stored = record.clone();
        self.buckets
            .entry(key)
            .and_modify(|bucket| bucket.absorb(stored.clone()))
            .or_insert_with(|| MinuteBucket::new(minute, stored));

        Ok(record)
    }
}

#[async_trait]
impl BucketStore for MemoryBucketStore {
    async fn append(&self, draft: RecordDraft) -> Result<EventRecord, StoreError> {
        self.append_at(draft, Utc::now())
    }

    async fn get(&self, bucket_key: &str) -> Result<Option<MinuteBucket>, StoreError> {
        Ok(self.buckets.get(bucket_key).map(|b| b.clone()))
    }

    async fn bucket_keys(&self) -> Result<Vec<String>, StoreError> {
        let mut keys: Vec<String> = self.buckets.iter().map(|e| e.key().clone()).collect();
        keys.sort_unstable();
        Ok(keys)
    }

    async fn bucket_count(&self) -> Result<usize, StoreError> {
        Ok(self.buckets.len())
    }

    async fn total_records(&self) -> Result<u64, StoreError> {
        Ok(self.buckets.iter().map(|e| e.record_count).sum())
    }
}

/// Zero out seconds and sub-second precision
fn truncate_to_minute(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(ts)
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod memory_test;
