//! Pulse Producer
//!
//! The emitting side of Pulse: generates batches of encrypted, integrity-
//! tagged messages from reference data and pushes them to an ingest server
//! on a fixed cadence, reconnecting with bounded retries when the
//! connection drops.

mod error;
mod fsm;
mod generator;
mod producer;
mod reference;

pub use error::ProducerError;
pub use fsm::{ConnectionFsm, ConnectionState, ConnectionStatus, RetryDecision, RetryPolicy};
pub use generator::{BatchGenerator, GeneratedBatch};
pub use producer::{Producer, ProducerConfig};
pub use reference::ReferenceData;
