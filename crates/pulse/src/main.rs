//! Pulse - encrypted streaming ingestion and minute-bucket aggregation
//!
//! # Usage
//!
//! ```bash
//! # Run the ingest server (default)
//! pulse
//! pulse serve --config configs/pulse.toml
//!
//! # Run a producer against a server
//! pulse emit
//! pulse emit --target 127.0.0.1:50100
//! ```

mod cmd;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pulse_config::{Config, LogFormat};

/// Pulse - encrypted streaming ingestion and minute-bucket aggregation
#[derive(Parser, Debug)]
#[command(name = "pulse")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the ingest server
    Serve(cmd::serve::ServeArgs),

    /// Run a producer that streams generated batches to a server
    Emit(cmd::emit::EmitArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    init_logging(&config, cli.log_level.as_deref())?;

    match cli.command {
        Some(Command::Serve(args)) => cmd::serve::run(config, args).await,
        Some(Command::Emit(args)) => cmd::emit::run(config, args).await,
        // No subcommand = run server (default behavior)
        None => cmd::serve::run(config, cmd::serve::ServeArgs::default()).await,
    }
}

/// Load configuration from an explicit path or the default locations
fn load_config(path: Option<&std::path::Path>) -> Result<Config> {
    match path {
        Some(path) => {
            if !path.exists() {
                return Err(anyhow::anyhow!(
                    "config file not found: {}",
                    path.display()
                ));
            }
            Ok(Config::from_file(path)?)
        }
        None => {
            let default_paths = [
                PathBuf::from("configs/pulse.toml"),
                PathBuf::from("pulse.toml"),
            ];

            for path in &default_paths {
                if path.exists() {
                    return Ok(Config::from_file(path)?);
                }
            }

            Ok(Config::default())
        }
    }
}

/// Initialize the tracing subscriber for logging
///
/// The CLI level overrides the config level when given.
fn init_logging(config: &Config, override_level: Option<&str>) -> Result<()> {
    let level = override_level.unwrap_or_else(|| config.log.level.as_str());
    let filter = EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow::anyhow!("invalid log level: {}", e))?;

    let registry = tracing_subscriber::registry().with(filter);
    match config.log.format {
        LogFormat::Console => {
            registry
                .with(fmt::layer().with_target(true).with_thread_ids(false))
                .init();
        }
        LogFormat::Json => {
            registry.with(fmt::layer().json()).init();
        }
    }

    Ok(())
}
