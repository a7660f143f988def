//! Pulse Configuration
//!
//! TOML-based configuration loading with sensible defaults.
//! Minimal config should just work - only specify what you need to change.
//!
//! # Parsing
//!
//! Use the `FromStr` trait to parse configuration:
//!
//! ```
//! use pulse_config::Config;
//! use std::str::FromStr;
//!
//! let config = Config::from_str("[crypto]\nsecret = \"demo\"").unwrap();
//! ```
//!
//! # Example Minimal Config
//!
//! ```toml
//! [crypto]
//! secret = "change-me"
//!
//! [server]
//! port = 50100
//!
//! [producer]
//! target = "127.0.0.1:50100"
//! ```

mod crypto;
mod error;
mod logging;
mod producer;
mod reference;
mod server;
mod stats;
mod validation;

use std::fs;
use std::path::Path;
use std::str::FromStr;

pub use crypto::{CryptoConfig, DEMO_SECRET};
pub use error::{ConfigError, Result};
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use producer::ProducerConfig;
pub use reference::ReferenceConfig;
pub use server::ServerConfig;
pub use stats::StatsConfig;

use serde::Deserialize;

/// Main configuration structure
///
/// All sections are optional with sensible defaults, except that the crypto
/// secret must be non-empty (the default is a demo secret that `validate`
/// accepts but the serve command warns about).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging configuration
    pub log: LogConfig,

    /// Ingest server (consumer side)
    pub server: ServerConfig,

    /// Producer (emit side)
    pub producer: ProducerConfig,

    /// Shared secret for envelope encryption
    pub crypto: CryptoConfig,

    /// Reference lists feeding the batch generator
    pub reference: ReferenceConfig,

    /// Periodic stats reporting
    pub stats: StatsConfig,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or contains invalid TOML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string
    fn parse(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
