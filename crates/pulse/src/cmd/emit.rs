//! Emit command - run a producer against an ingest server

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use pulse_config::Config;
use pulse_crypto::EnvelopeCipher;
use pulse_producer::{Producer, ProducerConfig, ReferenceData};

use crate::cmd::wait_for_shutdown;

/// Emit command arguments
#[derive(Args, Debug, Default)]
pub struct EmitArgs {
    /// Server address override (host:port)
    #[arg(short, long)]
    pub target: Option<String>,
}

/// Run the emit command
pub async fn run(config: Config, args: EmitArgs) -> Result<()> {
    let target = args.target.unwrap_or_else(|| config.producer.target.clone());

    info!(
        version = env!("CARGO_PKG_VERSION"),
        target = %target,
        "Pulse producer starting"
    );

    if config.crypto.is_demo_secret() {
        warn!("running with the built-in demo secret; set [crypto] secret for real deployments");
    }

    let reference = Arc::new(
        ReferenceData::new(
            config.reference.names.clone(),
            config.reference.origins.clone(),
            config.reference.destinations.clone(),
        )
        .context("invalid reference data")?,
    );

    let producer = Producer::new(
        ProducerConfig {
            target,
            send_interval: config.producer.send_interval,
            reconnect_interval: config.producer.reconnect_interval,
            max_reconnect_attempts: config.producer.max_reconnect_attempts,
            connect_timeout: config.producer.connect_timeout,
            write_timeout: config.producer.write_timeout,
            read_timeout: config.producer.read_timeout,
            batch_min: config.producer.batch_min,
            batch_max: config.producer.batch_max,
        },
        reference,
        EnvelopeCipher::new(&config.crypto.secret),
    );

    let cancel = CancellationToken::new();
    let mut producer_task = tokio::spawn(producer.run(cancel.clone()));

    tokio::select! {
        _ = wait_for_shutdown() => {
            info!("shutdown signal received, stopping producer...");
            cancel.cancel();
        }
        result = &mut producer_task => {
            // Producer gave up on its own (retries exhausted)
            result.context("producer task panicked")??;
            return Ok(());
        }
    }

    producer_task
        .await
        .context("producer task panicked")?
        .context("producer failed")?;

    info!("Pulse producer shutdown complete");
    Ok(())
}
