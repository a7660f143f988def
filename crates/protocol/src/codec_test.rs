//! Tests for the batch codec

use crate::codec::{decode, encode};
use crate::error::ProtocolError;

fn envelopes(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_encode_joins_with_delimiter() {
    let stream = encode(&envelopes(&["aa:bb", "cc:dd", "ee:ff"]));
    assert_eq!(stream, "aa:bb|cc:dd|ee:ff");
}

#[test]
fn test_encode_single_envelope_has_no_delimiter() {
    let stream = encode(&envelopes(&["aa:bb"]));
    assert_eq!(stream, "aa:bb");
}

#[test]
fn test_round_trip() {
    let original = envelopes(&["aa:bb", "cc:dd", "ee:ff", "0123:4567"]);
    let decoded = decode(&encode(&original)).unwrap();
    assert_eq!(decoded, original);
}

#[test]
fn test_round_trip_preserves_order() {
    let original: Vec<String> = (0..100).map(|i| format!("{:04x}:{:04x}", i, i * 2)).collect();
    assert_eq!(decode(&encode(&original)).unwrap(), original);
}

#[test]
fn test_decode_empty_is_error() {
    assert!(matches!(decode(""), Err(ProtocolError::EmptyStream)));
}

#[test]
fn test_decode_whitespace_only_is_error() {
    assert!(matches!(decode("   \n"), Err(ProtocolError::EmptyStream)));
}

#[test]
fn test_decode_drops_empty_parts() {
    let decoded = decode("aa:bb||cc:dd|").unwrap();
    assert_eq!(decoded, envelopes(&["aa:bb", "cc:dd"]));
}

#[test]
fn test_decode_trims_parts() {
    let decoded = decode(" aa:bb | cc:dd ").unwrap();
    assert_eq!(decoded, envelopes(&["aa:bb", "cc:dd"]));
}

#[test]
fn test_decode_does_not_validate_envelope_content() {
    // The codec is framing only; envelope syntax is the crypto layer's job
    let decoded = decode("not-an-envelope|also not").unwrap();
    assert_eq!(decoded.len(), 2);
}
