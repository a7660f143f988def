//! Bucket store trait - the persistence collaborator boundary

use async_trait::async_trait;

use crate::bucket::MinuteBucket;
use crate::error::StoreError;
use crate::record::{EventRecord, RecordDraft};

/// Persistence backend for minute buckets
///
/// `append` is the single write path: it stamps the draft, picks the bucket
/// for the current minute, and must be safe under concurrent calls for the
/// same or different minutes (per-key atomicity; no caller-side locking).
/// The read methods exist for stats and query collaborators.
#[async_trait]
pub trait BucketStore: Send + Sync {
    /// Persist a draft into the bucket for the current minute
    ///
    /// Returns the stamped record. A bucket is created if this is the
    /// minute's first record; concurrent first-writers must converge on one
    /// bucket.
    async fn append(&self, draft: RecordDraft) -> Result<EventRecord, StoreError>;

    /// Fetch a bucket by key, if it exists
    async fn get(&self, bucket_key: &str) -> Result<Option<MinuteBucket>, StoreError>;

    /// All bucket keys, sorted (and therefore in time order)
    async fn bucket_keys(&self) -> Result<Vec<String>, StoreError>;

    /// Number of buckets
    async fn bucket_count(&self) -> Result<usize, StoreError>;

    /// Sum of `record_count` across all buckets
    async fn total_records(&self) -> Result<u64, StoreError>;
}
