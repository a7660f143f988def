//! Pulse Protocol - wire format shared by producer and consumer
//!
//! # Protocol
//!
//! Both directions speak newline-delimited JSON frames over one TCP
//! connection, discriminated by an `event` field:
//!
//! ```text
//! {"event":"batch","stream":"<iv:ct|iv:ct|...>","timestamp":"...","messageCount":120}
//! {"event":"batch_ack","messageCount":120,"processedCount":120,...}
//! {"event":"error","error":"...","timestamp":"..."}
//! ```
//!
//! The `stream` payload is the batch codec's output: encrypted envelopes
//! joined by `|`, a character that never appears in hex output so splitting
//! is unambiguous.
//!
//! # Design
//!
//! - **Text frames**: one JSON object per line, camelCase field names
//! - **Order-preserving codec**: `decode(encode(xs)) == xs` for any
//!   delimiter-free envelopes
//! - **Per-item reports**: [`BatchReport`] carries exact valid/invalid/saved
//!   counts so the producer can tell integrity rejects from storage failures

mod codec;
mod error;
mod report;
mod wire;

pub use codec::{decode, encode, STREAM_DELIMITER};
pub use error::ProtocolError;
pub use report::{BatchReport, ItemError};
pub use wire::{AckFrame, BatchFrame, ErrorFrame, WireFrame, MAX_FRAME_BYTES};
