//! Serve command - run the Pulse ingest server

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use pulse_config::Config;
use pulse_crypto::EnvelopeCipher;
use pulse_ingest::{IngestServer, IngestServerConfig, IngestionPipeline, ProcessingStats, StatsReporter};
use pulse_store::MemoryBucketStore;

use crate::cmd::wait_for_shutdown;

/// Serve command arguments
#[derive(Args, Debug, Default)]
pub struct ServeArgs {}

/// Run the serve command
pub async fn run(config: Config, _args: ServeArgs) -> Result<()> {
    info!(
        version = env!("CARGO_PKG_VERSION"),
        address = %config.server.bind_address(),
        "Pulse server starting"
    );

    if config.crypto.is_demo_secret() {
        warn!("running with the built-in demo secret; set [crypto] secret for real deployments");
    }

    let store = Arc::new(MemoryBucketStore::new());
    let stats = Arc::new(ProcessingStats::new());
    let cipher = EnvelopeCipher::new(&config.crypto.secret);

    let pipeline = Arc::new(IngestionPipeline::new(
        cipher,
        store.clone(),
        stats.clone(),
        config.server.persist_timeout,
    ));

    let server = IngestServer::new(
        IngestServerConfig {
            address: config.server.address.clone(),
            port: config.server.port,
            keepalive: config.server.keepalive,
            nodelay: config.server.nodelay,
            shutdown_grace: config.server.shutdown_grace,
        },
        pipeline,
    );

    let reporter = StatsReporter::new(
        stats,
        store,
        config.stats.interval,
        config.stats.enabled,
    );

    let cancel = CancellationToken::new();
    let reporter_task = tokio::spawn(reporter.run(cancel.clone()));
    let mut server_task = tokio::spawn(server.run(cancel.clone()));

    tokio::select! {
        _ = wait_for_shutdown() => {
            info!("shutdown signal received, stopping server...");
            cancel.cancel();
        }
        result = &mut server_task => {
            // Server exited on its own (bind failure, shutdown fault)
            cancel.cancel();
            let _ = reporter_task.await;
            result.context("server task panicked")??;
            return Ok(());
        }
    }

    server_task
        .await
        .context("server task panicked")?
        .context("server shutdown failed")?;
    let _ = reporter_task.await;

    info!("Pulse shutdown complete");
    Ok(())
}
