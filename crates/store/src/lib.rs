//! Pulse Store - minute-granularity aggregation buckets
//!
//! Valid records land in one [`MinuteBucket`] per UTC minute. A bucket holds
//! the raw records plus derived counters (per-route and per-name counts),
//! created lazily on the first record for its minute and mutated additively
//! after that. Nothing here deletes buckets; retention is an external
//! concern.
//!
//! # Concurrency
//!
//! `append` must stay correct when many connections write into the same
//! minute at once. The in-memory backend keys a `DashMap` by bucket key and
//! does every read-modify-write inside the map's entry guard, so "increment
//! this route's counter or insert it at 1" and "create the bucket or append
//! to it" are each one indivisible step per key. There is no store-wide
//! lock.

mod bucket;
mod error;
mod memory;
mod record;
mod store;

pub use bucket::{bucket_key_for, route_key, MinuteBucket};
pub use error::StoreError;
pub use memory::MemoryBucketStore;
pub use record::{EventRecord, RecordDraft};
pub use store::BucketStore;
