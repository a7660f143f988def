//! Minute buckets and their derived counters

use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::record::EventRecord;

/// Truncate a timestamp to its minute and render the sortable bucket key
///
/// Keys sort lexicographically in time order (`2026-08-26T10:07`), which
/// makes range scans over bucket keys trivial for query collaborators.
pub fn bucket_key_for(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%M").to_string()
}

/// Route counter key: `origin->destination`
pub fn route_key(origin: &str, destination: &str) -> String {
    format!("{}->{}", origin, destination)
}

/// One minute's aggregation bucket
///
/// Invariants, preserved by [`MinuteBucket::absorb`]:
/// - `record_count == records.len()`
/// - `routes.values().sum() == record_count`
/// - `name_frequency.values().sum() == record_count`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinuteBucket {
    /// Start of the minute this bucket covers
    pub timestamp: DateTime<Utc>,

    /// `%Y-%m` partition hint
    pub year_month: String,

    /// `%Y-%m-%d` partition hint
    pub date_only: String,

    /// Hour of day, 0-23
    pub hour: u32,

    /// Records in insertion order
    pub records: Vec<EventRecord>,

    /// Always `records.len()`
    pub record_count: u64,

    /// Count per `origin->destination` route
    pub routes: BTreeMap<String, u64>,

    /// Count per record name
    pub name_frequency: BTreeMap<String, u64>,

    /// Timestamp of the first record absorbed
    pub first_record_time: DateTime<Utc>,

    /// Timestamp of the most recent record absorbed
    pub last_record_time: DateTime<Utc>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MinuteBucket {
    /// Create a bucket for `minute` with `record` as its sole member
    pub fn new(minute: DateTime<Utc>, record: EventRecord) -> Self {
        let now = Utc::now();
        let mut bucket = Self {
            timestamp: minute,
            year_month: minute.format("%Y-%m").to_string(),
            date_only: minute.format("%Y-%m-%d").to_string(),
            hour: minute.hour(),
            records: Vec::new(),
            record_count: 0,
            routes: BTreeMap::new(),
            name_frequency: BTreeMap::new(),
            first_record_time: record.timestamp,
            last_record_time: record.timestamp,
            created_at: now,
            updated_at: now,
        };
        bucket.absorb(record);
        bucket
    }

    /// Append a record and update every derived counter
    ///
    /// Counter maintenance is increment-or-insert per key; callers must hold
    /// whatever guard makes this step atomic for the bucket (the memory
    /// store runs it inside its map entry lock).
    pub fn absorb(&mut self, record: EventRecord) {
        *self
            .routes
            .entry(route_key(&record.origin, &record.destination))
            .or_insert(0) += 1;
        *self.name_frequency.entry(record.name.clone()).or_insert(0) += 1;

        self.last_record_time = record.timestamp;
        self.records.push(record);
        self.record_count += 1;
        self.updated_at = Utc::now();
    }

    /// The bucket's own key
    pub fn key(&self) -> String {
        bucket_key_for(self.timestamp)
    }

    /// Hour-of-day sanity check plus counter conservation; used by tests
    /// and debug assertions
    pub fn invariants_hold(&self) -> bool {
        self.record_count == self.records.len() as u64
            && self.routes.values().sum::<u64>() == self.record_count
            && self.name_frequency.values().sum::<u64>() == self.record_count
            && self.hour == self.timestamp.hour()
            && self.timestamp.year() >= 1970
    }
}

#[cfg(test)]
#[path = "bucket_test.rs"]
mod bucket_test;
