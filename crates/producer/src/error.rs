//! Producer errors

use pulse_protocol::ProtocolError;
use thiserror::Error;

/// Errors from the producer
#[derive(Debug, Error)]
pub enum ProducerError {
    /// Failed to connect to the server
    #[error("failed to connect to {target}: {source}")]
    Connect {
        /// Server address
        target: String,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// I/O error on an established connection
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Protocol error
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// An operation exceeded its deadline
    #[error("{operation} timed out after {timeout_ms}ms")]
    Timeout {
        /// What timed out ("connect", "write", ...)
        operation: &'static str,
        /// Deadline in milliseconds
        timeout_ms: u64,
    },

    /// Every allowed reconnect attempt failed
    #[error("giving up after {attempts} failed connection attempts")]
    ReconnectExhausted {
        /// Consecutive failed attempts
        attempts: u32,
    },

    /// A reference list was empty
    #[error("reference list '{list}' must not be empty")]
    EmptyReference {
        /// Which list
        list: &'static str,
    },
}

impl ProducerError {
    /// Create a Timeout error
    pub fn timeout(operation: &'static str, timeout: std::time::Duration) -> Self {
        Self::Timeout {
            operation,
            timeout_ms: timeout.as_millis() as u64,
        }
    }
}
