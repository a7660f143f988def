//! Pulse Ingest
//!
//! The consumer side of Pulse: a TCP server that accepts newline-delimited
//! JSON frames from producers, runs each batch through the ingestion
//! pipeline, and answers with an acknowledgment carrying per-item outcome
//! counts.
//!
//! # Components
//!
//! - [`IngestionPipeline`] - decode, decrypt, validate, and persist a batch
//! - [`IngestServer`] - accept loop, per-connection tasks, graceful shutdown
//! - [`ProcessingStats`] - cumulative counters across all batches
//! - [`StatsReporter`] - periodic stats summary to the log

mod error;
mod pipeline;
mod reporter;
mod server;
mod stats;

pub use error::IngestError;
pub use pipeline::IngestionPipeline;
pub use reporter::StatsReporter;
pub use server::{IngestServer, IngestServerConfig, ServerMetrics, ServerMetricsSnapshot};
pub use stats::{ProcessingStats, StatsSnapshot};
