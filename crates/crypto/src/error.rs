//! Crypto error types

use thiserror::Error;

/// Errors from envelope encryption and tag validation
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Envelope is not `hex(iv):hex(ciphertext)`
    ///
    /// The only decrypt-time failure: once the IV parses, the keystream
    /// always applies, and corruption surfaces later as a tag mismatch.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(&'static str),

    /// Message has no tag field (or the tag is not a string)
    #[error("message is missing integrity tag")]
    MissingTag,
}

impl CryptoError {
    /// Create a malformed envelope error
    #[inline]
    pub fn malformed(reason: &'static str) -> Self {
        Self::MalformedEnvelope(reason)
    }
}
