//! Ingest server errors

use pulse_protocol::ProtocolError;
use thiserror::Error;

/// Errors from the ingest server
#[derive(Debug, Error)]
pub enum IngestError {
    /// Failed to bind to address
    #[error("failed to bind to {address}: {source}")]
    Bind {
        /// Address the server tried to bind
        address: String,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// I/O error on a connection
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Protocol error
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// In-flight connections did not drain within the shutdown grace period
    #[error("shutdown grace period of {grace_ms}ms expired with connections still active")]
    ShutdownTimeout {
        /// Grace period in milliseconds
        grace_ms: u64,
    },
}
