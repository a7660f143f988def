//! Producer connection loop
//!
//! Drives the connection state machine with real sockets and timers. The
//! send cadence timer lives inside the connected session and dies with it,
//! so a reconnect always starts with a fresh cadence - and the first batch
//! goes out immediately on connect, not one interval later.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::{timeout, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use pulse_crypto::EnvelopeCipher;
use pulse_protocol::WireFrame;

use crate::error::ProducerError;
use crate::fsm::{ConnectionFsm, ConnectionStatus, RetryDecision, RetryPolicy};
use crate::generator::BatchGenerator;
use crate::reference::ReferenceData;

/// Producer configuration
#[derive(Debug, Clone)]
pub struct ProducerConfig {
    /// Server address to connect to
    pub target: String,

    /// Interval between batch transmissions while connected
    pub send_interval: Duration,

    /// Delay before a reconnect attempt
    pub reconnect_interval: Duration,

    /// Give up after this many consecutive failed connects; 0 retries forever
    pub max_reconnect_attempts: u32,

    /// Upper bound on establishing a connection
    pub connect_timeout: Duration,

    /// Upper bound on writing one batch frame
    pub write_timeout: Duration,

    /// Upper bound on waiting for the server's reply to a batch
    pub read_timeout: Duration,

    /// Smallest batch size (inclusive)
    pub batch_min: usize,

    /// Largest batch size (inclusive)
    pub batch_max: usize,
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self {
            target: "127.0.0.1:50100".into(),
            send_interval: Duration::from_secs(10),
            reconnect_interval: Duration::from_secs(5),
            max_reconnect_attempts: 10,
            connect_timeout: Duration::from_secs(5),
            write_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(30),
            batch_min: 49,
            batch_max: 499,
        }
    }
}

/// How a connected session ended
enum SessionEnd {
    /// Shutdown was requested
    Cancelled,
    /// The connection dropped or misbehaved
    Lost(ProducerError),
}

/// The producer: batch generation plus the connection driver
pub struct Producer {
    config: ProducerConfig,
    generator: BatchGenerator,
    fsm: ConnectionFsm,
}

impl Producer {
    /// Create a producer
    pub fn new(
        config: ProducerConfig,
        reference: Arc<ReferenceData>,
        cipher: EnvelopeCipher,
    ) -> Self {
        let generator =
            BatchGenerator::new(reference, cipher, config.batch_min, config.batch_max);
        let fsm = ConnectionFsm::new(RetryPolicy {
            reconnect_interval: config.reconnect_interval,
            max_attempts: config.max_reconnect_attempts,
        });
        Self {
            config,
            generator,
            fsm,
        }
    }

    /// Get a shareable connection status handle
    pub fn status(&self) -> ConnectionStatus {
        self.fsm.status()
    }

    /// Run until cancelled or retries are exhausted
    ///
    /// # Errors
    ///
    /// `ReconnectExhausted` when every allowed attempt failed. Cancellation
    /// is not an error.
    pub async fn run(mut self, cancel: CancellationToken) -> Result<(), ProducerError> {
        loop {
            if cancel.is_cancelled() {
                self.fsm.stop();
                return Ok(());
            }

            self.fsm.connect_started();
            let decision = match self.dial().await {
                Ok(stream) => {
                    self.fsm.connect_succeeded();
                    tracing::info!(target = %self.config.target, "connected");

                    match self.send_loop(stream, &cancel).await {
                        SessionEnd::Cancelled => {
                            self.fsm.stop();
                            return Ok(());
                        }
                        SessionEnd::Lost(e) => {
                            tracing::warn!(error = %e, "connection lost");
                            self.fsm.connection_lost()
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        target = %self.config.target,
                        attempt = self.fsm.attempts() + 1,
                        error = %e,
                        "connect failed"
                    );
                    self.fsm.connect_failed()
                }
            };

            match decision {
                RetryDecision::RetryAfter(delay) => {
                    tokio::select! {
                        _ = cancel.cancelled() => {
                            self.fsm.stop();
                            return Ok(());
                        }
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
                RetryDecision::GiveUp => {
                    let attempts = self.fsm.attempts();
                    tracing::error!(attempts, "reconnect attempts exhausted");
                    return Err(ProducerError::ReconnectExhausted { attempts });
                }
            }
        }
    }

    /// Open a connection within the connect timeout
    async fn dial(&self) -> Result<TcpStream, ProducerError> {
        match timeout(
            self.config.connect_timeout,
            TcpStream::connect(&self.config.target),
        )
        .await
        {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(e)) => Err(ProducerError::Connect {
                target: self.config.target.clone(),
                source: e,
            }),
            Err(_) => Err(ProducerError::timeout(
                "connect",
                self.config.connect_timeout,
            )),
        }
    }

    /// Send batches on the cadence until cancel or loss
    ///
    /// The interval's first tick fires immediately, so entering this loop
    /// transmits a batch right away.
    async fn send_loop(&self, stream: TcpStream, cancel: &CancellationToken) -> SessionEnd {
        let (read_half, mut write_half) = stream.into_split();
        let mut reader = BufReader::new(read_half);
        let mut line = Vec::new();

        let mut ticker = tokio::time::interval(self.config.send_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => return SessionEnd::Cancelled,
                _ = ticker.tick() => {
                    if let Err(e) = self.send_batch(&mut write_half).await {
                        return SessionEnd::Lost(e);
                    }

                    line.clear();
                    // The reply read is capped in bytes and bounded in time:
                    // a server that accepts batches but never acknowledges
                    // them is a lost connection, not a reason to hang here.
                    let mut capped =
                        (&mut reader).take(pulse_protocol::MAX_FRAME_BYTES as u64 + 1);
                    let read = tokio::select! {
                        _ = cancel.cancelled() => return SessionEnd::Cancelled,
                        read = timeout(
                            self.config.read_timeout,
                            capped.read_until(b'\n', &mut line),
                        ) => match read {
                            Ok(read) => read,
                            Err(_) => {
                                return SessionEnd::Lost(ProducerError::timeout(
                                    "ack read",
                                    self.config.read_timeout,
                                ));
                            }
                        },
                    };
                    match read {
                        Ok(0) => {
                            return SessionEnd::Lost(ProducerError::Io(
                                std::io::Error::new(
                                    std::io::ErrorKind::UnexpectedEof,
                                    "server closed the connection",
                                ),
                            ));
                        }
                        Ok(_) if line.len() > pulse_protocol::MAX_FRAME_BYTES => {
                            return SessionEnd::Lost(
                                pulse_protocol::ProtocolError::frame_too_large(
                                    line.len(),
                                    pulse_protocol::MAX_FRAME_BYTES,
                                )
                                .into(),
                            );
                        }
                        Ok(_) => self.handle_reply(&String::from_utf8_lossy(&line)),
                        Err(e) => return SessionEnd::Lost(e.into()),
                    }
                }
            }
        }
    }

    /// Generate one batch and write its frame
    async fn send_batch(
        &self,
        writer: &mut tokio::net::tcp::OwnedWriteHalf,
    ) -> Result<(), ProducerError> {
        let batch = self.generator.generate();
        let frame = WireFrame::batch(batch.stream, batch.message_count);
        let wire = frame.to_line()?;

        match timeout(self.config.write_timeout, async {
            writer.write_all(wire.as_bytes()).await?;
            writer.flush().await
        })
        .await
        {
            Ok(Ok(())) => {
                tracing::debug!(messages = batch.message_count, "batch sent");
                Ok(())
            }
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Err(ProducerError::timeout("write", self.config.write_timeout)),
        }
    }

    /// Log the server's reply to a batch
    fn handle_reply(&self, line: &str) {
        match WireFrame::from_line(line) {
            Ok(WireFrame::BatchAck(ack)) => {
                tracing::info!(
                    messages = ack.report.message_count,
                    valid = ack.report.valid_count,
                    invalid = ack.report.invalid_count,
                    saved = ack.report.saved_count,
                    elapsed_ms = ack.report.processing_time_ms,
                    "batch acknowledged"
                );
            }
            Ok(WireFrame::Error(err)) => {
                tracing::warn!(error = %err.error, "server rejected batch");
            }
            Ok(WireFrame::Batch(_)) => {
                tracing::warn!("unexpected frame direction, ignoring");
            }
            Err(e) => {
                tracing::warn!(error = %e, "unparseable server reply");
            }
        }
    }
}

#[cfg(test)]
#[path = "producer_test.rs"]
mod producer_test;
