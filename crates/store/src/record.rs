//! Event records

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Fields of a record as validated by the pipeline, before persistence
///
/// The store assigns `timestamp` and `record_id` at append time; a draft is
/// everything that arrived over the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordDraft {
    pub name: String,
    pub origin: String,
    pub destination: String,
}

/// One persisted event record
///
/// Immutable once created. `record_id` is globally unique (nanosecond clock
/// reading plus a random suffix) and serves as the idempotency key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub name: String,
    pub origin: String,
    pub destination: String,
    pub timestamp: DateTime<Utc>,
    pub record_id: String,
}

impl EventRecord {
    /// Persist a draft: stamp it with the current time and a fresh id
    pub fn from_draft(draft: RecordDraft, timestamp: DateTime<Utc>) -> Self {
        Self {
            name: draft.name,
            origin: draft.origin,
            destination: draft.destination,
            timestamp,
            record_id: new_record_id(),
        }
    }
}

/// Generate a record id: hex nanoseconds since epoch plus a random suffix
///
/// The random suffix keeps ids unique even when two appends land on the
/// same clock reading.
fn new_record_id() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let suffix: u32 = rand::rng().random();
    format!("{:x}-{:08x}", nanos, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> RecordDraft {
        RecordDraft {
            name: "Asha".into(),
            origin: "Mumbai".into(),
            destination: "Delhi".into(),
        }
    }

    #[test]
    fn test_from_draft_keeps_fields() {
        let ts = Utc::now();
        let record = EventRecord::from_draft(draft(), ts);
        assert_eq!(record.name, "Asha");
        assert_eq!(record.origin, "Mumbai");
        assert_eq!(record.destination, "Delhi");
        assert_eq!(record.timestamp, ts);
    }

    #[test]
    fn test_record_ids_are_unique() {
        let ts = Utc::now();
        let mut ids: Vec<String> = (0..1000)
            .map(|_| EventRecord::from_draft(draft(), ts).record_id)
            .collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_serializes_camel_case() {
        let record = EventRecord::from_draft(draft(), Utc::now());
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("recordId").is_some());
        assert!(json.get("record_id").is_none());
    }
}
