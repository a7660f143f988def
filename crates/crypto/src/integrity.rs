//! Canonical hashing and integrity tags
//!
//! A message's tag is the SHA-256 digest over its fields serialized in
//! canonical order: keys sorted lexicographically, rendered as `key:value`
//! pairs joined by `|`. The canonicalization makes the digest independent of
//! key insertion order, which the ingestion pipeline relies on - producer and
//! consumer may hold the same fields in different orders.

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::error::CryptoError;

/// Field name carrying the embedded integrity tag
pub const TAG_FIELD: &str = "tag";

/// Compute the canonical hash of a field map as lowercase hex
///
/// Deterministic under any permutation of the map's key order. String values
/// are rendered bare (no quotes); everything else renders as compact JSON.
pub fn canonical_hash(fields: &Map<String, Value>) -> String {
    let mut keys: Vec<&String> = fields.keys().collect();
    keys.sort_unstable();

    let joined = keys
        .iter()
        .map(|k| format!("{}:{}", k, render_value(&fields[k.as_str()])))
        .collect::<Vec<_>>()
        .join("|");

    let digest = Sha256::digest(joined.as_bytes());
    hex::encode(digest)
}

/// Insert the canonical hash of `fields` under the tag field
///
/// The hash covers the fields as given; an existing tag is replaced, not
/// hashed over.
pub fn tag_message(mut fields: Map<String, Value>) -> Map<String, Value> {
    fields.remove(TAG_FIELD);
    let tag = canonical_hash(&fields);
    fields.insert(TAG_FIELD.to_string(), Value::String(tag));
    fields
}

/// Check a message's embedded tag against the canonical hash of its fields
///
/// A mismatch is `Ok(false)`, never an error; the tag comparison is
/// constant-time.
///
/// # Errors
///
/// `MissingTag` if the tag field is absent or not a string.
pub fn validate_tag(message: &Map<String, Value>) -> Result<bool, CryptoError> {
    let tag = match message.get(TAG_FIELD) {
        Some(Value::String(t)) => t,
        _ => return Err(CryptoError::MissingTag),
    };

    let mut untagged = message.clone();
    untagged.remove(TAG_FIELD);
    let expected = canonical_hash(&untagged);

    Ok(expected.as_bytes().ct_eq(tag.as_bytes()).into())
}

/// Render a value for canonical hashing
fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[path = "integrity_test.rs"]
mod integrity_test;
