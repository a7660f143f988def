//! Protocol error types

use thiserror::Error;

/// Errors that can occur while framing or unframing wire data
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Batch stream was empty - nothing to decode
    #[error("empty batch stream")]
    EmptyStream,

    /// A frame line exceeded the size limit
    #[error("frame of {size} bytes exceeds limit {limit}")]
    FrameTooLarge { size: usize, limit: usize },

    /// Frame was not valid JSON or not a known event
    #[error("invalid frame: {0}")]
    InvalidFrame(#[from] serde_json::Error),
}

impl ProtocolError {
    /// Create a frame too large error
    #[inline]
    pub fn frame_too_large(size: usize, limit: usize) -> Self {
        Self::FrameTooLarge { size, limit }
    }

    /// True if the whole connection should be torn down, not just the batch
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::FrameTooLarge { .. })
    }
}
