//! Wire frames - newline-delimited JSON events
//!
//! Parsing only; the ingest server and producer own the sockets. Frames are
//! line-oriented so both sides can read with a plain buffered line loop.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;
use crate::report::BatchReport;

/// Maximum serialized frame size (16MB)
///
/// A batch of 499 envelopes of modest records sits well under 1MB; anything
/// beyond this is a broken or hostile peer and closes the connection.
pub const MAX_FRAME_BYTES: usize = 16 * 1024 * 1024;

/// A batch of encrypted envelopes, producer to consumer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BatchFrame {
    /// Codec-encoded envelope sequence
    pub stream: String,

    /// Producer-side send time
    pub timestamp: DateTime<Utc>,

    /// Envelope count as the producer sees it
    pub message_count: usize,
}

/// Batch acknowledgment, consumer to producer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AckFrame {
    /// Per-category outcome counts for the acknowledged batch
    #[serde(flatten)]
    pub report: BatchReport,

    /// Consumer-side completion time
    pub timestamp: DateTime<Utc>,
}

/// Batch-level processing error, consumer to producer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorFrame {
    /// What went wrong
    pub error: String,

    /// Consumer-side time of failure
    pub timestamp: DateTime<Utc>,
}

/// Any frame either side may read off the wire
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WireFrame {
    /// Producer-sent batch
    Batch(BatchFrame),

    /// Consumer acknowledgment
    BatchAck(AckFrame),

    /// Consumer batch-level error
    Error(ErrorFrame),
}

impl WireFrame {
    /// Build a batch frame stamped now
    pub fn batch(stream: String, message_count: usize) -> Self {
        Self::Batch(BatchFrame {
            stream,
            timestamp: Utc::now(),
            message_count,
        })
    }

    /// Build an acknowledgment frame stamped now
    pub fn ack(report: BatchReport) -> Self {
        Self::BatchAck(AckFrame {
            report,
            timestamp: Utc::now(),
        })
    }

    /// Build an error frame stamped now
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(ErrorFrame {
            error: message.into(),
            timestamp: Utc::now(),
        })
    }

    /// Serialize to a single newline-terminated line
    pub fn to_line(&self) -> Result<String, ProtocolError> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }

    /// Parse one line back into a frame
    ///
    /// # Errors
    ///
    /// `FrameTooLarge` for oversized lines (fatal to the connection),
    /// `InvalidFrame` for anything that is not a known JSON event.
    pub fn from_line(line: &str) -> Result<Self, ProtocolError> {
        if line.len() > MAX_FRAME_BYTES {
            return Err(ProtocolError::frame_too_large(line.len(), MAX_FRAME_BYTES));
        }
        Ok(serde_json::from_str(line.trim_end())?)
    }
}

#[cfg(test)]
#[path = "wire_test.rs"]
mod wire_test;
