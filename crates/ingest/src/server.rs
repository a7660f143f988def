//! TCP ingest server
//!
//! Accepts producer connections and speaks the line-framed JSON protocol.
//! Each connection gets its own task tracked by a `TaskTracker`, so shutdown
//! can wait for in-flight batches up to a grace period.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use socket2::{SockRef, TcpKeepalive};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::{TcpListener, TcpStream};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use pulse_protocol::{WireFrame, MAX_FRAME_BYTES};

use crate::error::IngestError;
use crate::pipeline::IngestionPipeline;

/// Ingest server configuration
#[derive(Debug, Clone)]
pub struct IngestServerConfig {
    /// Bind address (e.g., "0.0.0.0")
    pub address: String,

    /// Listen port
    pub port: u16,

    /// TCP keepalive enabled
    pub keepalive: bool,

    /// TCP nodelay (disable Nagle's algorithm)
    pub nodelay: bool,

    /// How long shutdown waits for in-flight connections
    pub shutdown_grace: Duration,
}

impl Default for IngestServerConfig {
    fn default() -> Self {
        Self {
            address: "0.0.0.0".into(),
            port: 50100,
            keepalive: true,
            nodelay: true,
            shutdown_grace: Duration::from_secs(10),
        }
    }
}

impl IngestServerConfig {
    /// Create config with custom port
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Get the socket address to bind to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

/// Server-level connection metrics
#[derive(Debug, Default)]
pub struct ServerMetrics {
    /// Currently open connections
    pub connections_active: AtomicU64,

    /// Connections accepted since start
    pub connections_total: AtomicU64,

    /// Frames read off the wire
    pub frames_received: AtomicU64,

    /// Accept and connection-level errors
    pub errors: AtomicU64,
}

impl ServerMetrics {
    /// Create new metrics instance
    pub const fn new() -> Self {
        Self {
            connections_active: AtomicU64::new(0),
            connections_total: AtomicU64::new(0),
            frames_received: AtomicU64::new(0),
            errors: AtomicU64::new(0),
        }
    }

    #[inline]
    fn connection_opened(&self) {
        self.connections_active.fetch_add(1, Ordering::Relaxed);
        self.connections_total.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    fn connection_closed(&self) {
        self.connections_active.fetch_sub(1, Ordering::Relaxed);
    }

    #[inline]
    fn frame_received(&self) {
        self.frames_received.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    fn error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a metrics snapshot
    pub fn snapshot(&self) -> ServerMetricsSnapshot {
        ServerMetricsSnapshot {
            connections_active: self.connections_active.load(Ordering::Relaxed),
            connections_total: self.connections_total.load(Ordering::Relaxed),
            frames_received: self.frames_received.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time server metrics
#[derive(Debug, Clone, Copy)]
pub struct ServerMetricsSnapshot {
    pub connections_active: u64,
    pub connections_total: u64,
    pub frames_received: u64,
    pub errors: u64,
}

/// TCP ingest server
///
/// Owns the accept loop; batch semantics live in the pipeline it wraps.
pub struct IngestServer {
    config: IngestServerConfig,
    pipeline: Arc<IngestionPipeline>,
    metrics: Arc<ServerMetrics>,
}

impl IngestServer {
    /// Create a server over a pipeline
    pub fn new(config: IngestServerConfig, pipeline: Arc<IngestionPipeline>) -> Self {
        Self {
            config,
            pipeline,
            metrics: Arc::new(ServerMetrics::new()),
        }
    }

    /// Get a handle to the server metrics
    ///
    /// Remains valid after `run()` consumes the server.
    pub fn metrics(&self) -> Arc<ServerMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Run the server until cancelled
    ///
    /// Binds, accepts, and spawns one task per connection. On cancellation
    /// the listener closes immediately; in-flight connections get the
    /// configured grace period to finish their current batch.
    pub async fn run(self, cancel: CancellationToken) -> Result<(), IngestError> {
        let bind_addr = self.config.bind_address();

        let listener = TcpListener::bind(&bind_addr)
            .await
            .map_err(|e| IngestError::Bind {
                address: bind_addr.clone(),
                source: e,
            })?;

        tracing::info!(address = %bind_addr, "ingest server listening");

        self.accept_loop(listener, cancel).await
    }

    /// Main accept loop
    async fn accept_loop(
        self,
        listener: TcpListener,
        cancel: CancellationToken,
    ) -> Result<(), IngestError> {
        let grace = self.config.shutdown_grace;
        let server = Arc::new(self);
        let tracker = TaskTracker::new();

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    break;
                }
                result = listener.accept() => {
                    match result {
                        Ok((stream, peer_addr)) => {
                            server.metrics.connection_opened();

                            let server = Arc::clone(&server);
                            let conn_cancel = cancel.clone();
                            tracker.spawn(async move {
                                if let Err(e) = server.handle_connection(stream, peer_addr, conn_cancel).await {
                                    if !matches!(e, IngestError::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::UnexpectedEof)
                                    {
                                        tracing::debug!(
                                            peer = %peer_addr,
                                            error = %e,
                                            "connection error"
                                        );
                                        server.metrics.error();
                                    }
                                }
                                server.metrics.connection_closed();
                            });
                        }
                        Err(e) => {
                            // Transient accept errors - log and continue
                            tracing::warn!(error = %e, "accept error");
                            server.metrics.error();
                        }
                    }
                }
            }
        }

        tracker.close();
        if tokio::time::timeout(grace, tracker.wait()).await.is_err() {
            tracing::error!(
                grace_ms = grace.as_millis() as u64,
                active = server.metrics.snapshot().connections_active,
                "shutdown grace period expired with connections still active"
            );
            return Err(IngestError::ShutdownTimeout {
                grace_ms: grace.as_millis() as u64,
            });
        }

        tracing::info!("ingest server stopped");
        Ok(())
    }

    /// Handle a single producer connection
    async fn handle_connection(
        &self,
        stream: TcpStream,
        peer_addr: SocketAddr,
        cancel: CancellationToken,
    ) -> Result<(), IngestError> {
        self.configure_socket(&stream);

        tracing::debug!(peer = %peer_addr, "producer connected");

        let (read_half, mut write_half) = stream.into_split();
        let mut reader = BufReader::new(read_half);
        let mut line = Vec::new();

        loop {
            line.clear();
            // The read itself is capped: one byte past the frame limit stops
            // the read, so a peer streaming garbage with no newline cannot
            // grow the buffer without bound.
            let read = {
                let mut capped = (&mut reader).take(MAX_FRAME_BYTES as u64 + 1);
                tokio::select! {
                    _ = cancel.cancelled() => return Ok(()),
                    read = capped.read_until(b'\n', &mut line) => read?,
                }
            };
            if read == 0 {
                tracing::debug!(peer = %peer_addr, "producer disconnected");
                return Ok(());
            }
            self.metrics.frame_received();

            if line.len() > MAX_FRAME_BYTES {
                let frame = WireFrame::error("frame exceeds size limit");
                write_frame(&mut write_half, &frame).await?;
                return Err(pulse_protocol::ProtocolError::frame_too_large(
                    line.len(),
                    MAX_FRAME_BYTES,
                )
                .into());
            }

            let line = String::from_utf8_lossy(&line);
            let frame = match WireFrame::from_line(&line) {
                Ok(frame) => frame,
                Err(e) => {
                    tracing::debug!(peer = %peer_addr, error = %e, "unparseable frame");
                    let reply = WireFrame::error(format!("invalid frame: {}", e));
                    write_frame(&mut write_half, &reply).await?;
                    continue;
                }
            };

            match frame {
                WireFrame::Batch(batch) => {
                    let reply = match self.pipeline.process_batch(&batch.stream).await {
                        Ok(report) => {
                            tracing::info!(
                                peer = %peer_addr,
                                messages = report.message_count,
                                valid = report.valid_count,
                                invalid = report.invalid_count,
                                saved = report.saved_count,
                                elapsed_ms = report.processing_time_ms,
                                "batch processed"
                            );
                            if batch.message_count != report.message_count {
                                tracing::warn!(
                                    peer = %peer_addr,
                                    declared = batch.message_count,
                                    decoded = report.message_count,
                                    "batch count mismatch"
                                );
                            }
                            WireFrame::ack(report)
                        }
                        Err(e) => {
                            tracing::warn!(peer = %peer_addr, error = %e, "batch rejected");
                            WireFrame::error(e.to_string())
                        }
                    };
                    write_frame(&mut write_half, &reply).await?;
                }
                WireFrame::BatchAck(_) | WireFrame::Error(_) => {
                    // Consumer-to-producer frames have no business here
                    tracing::warn!(peer = %peer_addr, "unexpected frame direction, ignoring");
                }
            }
        }
    }

    /// Configure socket options not exposed by tokio
    fn configure_socket(&self, stream: &TcpStream) {
        let socket = SockRef::from(stream);

        if self.config.nodelay && socket.set_nodelay(true).is_err() {
            tracing::debug!("failed to set TCP_NODELAY");
        }

        if self.config.keepalive {
            let keepalive = TcpKeepalive::new()
                .with_time(Duration::from_secs(60))
                .with_interval(Duration::from_secs(10));

            if let Err(e) = socket.set_tcp_keepalive(&keepalive) {
                tracing::debug!(error = %e, "failed to set TCP keepalive");
            }
        }
    }
}

/// Serialize a frame and write it as one line
async fn write_frame(writer: &mut OwnedWriteHalf, frame: &WireFrame) -> Result<(), IngestError> {
    let line = frame.to_line()?;
    writer.write_all(line.as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}

#[cfg(test)]
#[path = "server_test.rs"]
mod server_test;
