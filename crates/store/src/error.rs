//! Store error types

use thiserror::Error;

/// Errors from bucket persistence
#[derive(Debug, Error)]
pub enum StoreError {
    /// Write did not complete within the persistence timeout
    #[error("persistence timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Backend rejected or failed the write
    #[error("persistence backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Create a backend error
    #[inline]
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }
}
