//! Tests for minute buckets

use chrono::{TimeZone, Utc};

use crate::bucket::{bucket_key_for, route_key, MinuteBucket};
use crate::record::{EventRecord, RecordDraft};

fn record(name: &str, origin: &str, destination: &str) -> EventRecord {
    EventRecord::from_draft(
        RecordDraft {
            name: name.into(),
            origin: origin.into(),
            destination: destination.into(),
        },
        Utc::now(),
    )
}

#[test]
fn test_bucket_key_truncates_to_minute() {
    let ts = Utc.with_ymd_and_hms(2026, 8, 26, 10, 7, 42).unwrap();
    assert_eq!(bucket_key_for(ts), "2026-08-26T10:07");
}

#[test]
fn test_bucket_keys_sort_in_time_order() {
    let earlier = Utc.with_ymd_and_hms(2026, 8, 26, 9, 59, 0).unwrap();
    let later = Utc.with_ymd_and_hms(2026, 8, 26, 10, 0, 0).unwrap();
    assert!(bucket_key_for(earlier) < bucket_key_for(later));
}

#[test]
fn test_route_key_format() {
    assert_eq!(route_key("Mumbai", "Delhi"), "Mumbai->Delhi");
}

#[test]
fn test_new_bucket_has_single_record() {
    let minute = Utc.with_ymd_and_hms(2026, 8, 26, 10, 7, 0).unwrap();
    let bucket = MinuteBucket::new(minute, record("Asha", "Mumbai", "Delhi"));

    assert_eq!(bucket.record_count, 1);
    assert_eq!(bucket.records.len(), 1);
    assert_eq!(bucket.routes["Mumbai->Delhi"], 1);
    assert_eq!(bucket.name_frequency["Asha"], 1);
    assert_eq!(bucket.year_month, "2026-08");
    assert_eq!(bucket.date_only, "2026-08-26");
    assert_eq!(bucket.hour, 10);
    assert!(bucket.invariants_hold());
}

#[test]
fn test_absorb_increments_existing_route() {
    let minute = Utc.with_ymd_and_hms(2026, 8, 26, 10, 7, 0).unwrap();
    let mut bucket = MinuteBucket::new(minute, record("Asha", "Mumbai", "Delhi"));
    bucket.absorb(record("Ravi", "Mumbai", "Delhi"));
    bucket.absorb(record("Asha", "Pune", "Goa"));

    assert_eq!(bucket.record_count, 3);
    assert_eq!(bucket.routes["Mumbai->Delhi"], 2);
    assert_eq!(bucket.routes["Pune->Goa"], 1);
    assert_eq!(bucket.name_frequency["Asha"], 2);
    assert_eq!(bucket.name_frequency["Ravi"], 1);
    assert!(bucket.invariants_hold());
}

#[test]
fn test_absorb_preserves_insertion_order() {
    let minute = Utc.with_ymd_and_hms(2026, 8, 26, 10, 7, 0).unwrap();
    let mut bucket = MinuteBucket::new(minute, record("a", "X", "Y"));
    for name in ["b", "c", "d"] {
        bucket.absorb(record(name, "X", "Y"));
    }

    let names: Vec<&str> = bucket.records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "c", "d"]);
}

#[test]
fn test_absorb_tracks_first_and_last_times() {
    let minute = Utc.with_ymd_and_hms(2026, 8, 26, 10, 7, 0).unwrap();
    let first = record("a", "X", "Y");
    let first_ts = first.timestamp;

    let mut bucket = MinuteBucket::new(minute, first);
    let last = record("b", "X", "Y");
    let last_ts = last.timestamp;
    bucket.absorb(last);

    assert_eq!(bucket.first_record_time, first_ts);
    assert_eq!(bucket.last_record_time, last_ts);
}

#[test]
fn test_counter_sums_equal_record_count() {
    let minute = Utc.with_ymd_and_hms(2026, 8, 26, 10, 7, 0).unwrap();
    let mut bucket = MinuteBucket::new(minute, record("a", "X", "Y"));
    for i in 0..50 {
        bucket.absorb(record(
            &format!("name{}", i % 7),
            &format!("o{}", i % 3),
            &format!("d{}", i % 5),
        ));
    }

    assert_eq!(bucket.record_count, 51);
    assert_eq!(bucket.routes.values().sum::<u64>(), 51);
    assert_eq!(bucket.name_frequency.values().sum::<u64>(), 51);
}
