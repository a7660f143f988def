//! Batch codec - delimited envelope sequences
//!
//! Envelopes are hex text with a single `:` separator, so `|` can never
//! occur inside one; joining with it round-trips losslessly.

use crate::error::ProtocolError;

/// Delimiter between envelopes in a batch stream
pub const STREAM_DELIMITER: char = '|';

/// Join envelopes into a single batch stream
///
/// No per-envelope validation; garbage in, garbage out.
pub fn encode(envelopes: &[String]) -> String {
    envelopes.join(&STREAM_DELIMITER.to_string())
}

/// Split a batch stream back into envelopes, preserving order
///
/// Parts are trimmed and empty parts dropped, so a trailing delimiter or
/// stray whitespace does not produce phantom envelopes.
///
/// # Errors
///
/// `EmptyStream` if the input is empty or all-whitespace.
pub fn decode(stream: &str) -> Result<Vec<String>, ProtocolError> {
    if stream.trim().is_empty() {
        return Err(ProtocolError::EmptyStream);
    }

    Ok(stream
        .split(STREAM_DELIMITER)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
#[path = "codec_test.rs"]
mod codec_test;
