//! Producer configuration

use std::time::Duration;

use serde::Deserialize;

/// Producer configuration
///
/// # Example
///
/// ```toml
/// [producer]
/// target = "127.0.0.1:50100"
/// send_interval = "10s"
/// reconnect_interval = "5s"
/// max_reconnect_attempts = 10
/// batch_min = 49
/// batch_max = 499
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProducerConfig {
    /// Server address to connect to
    /// Default: 127.0.0.1:50100
    pub target: String,

    /// Interval between batch transmissions while connected
    /// Default: 10s
    #[serde(with = "humantime_serde")]
    pub send_interval: Duration,

    /// Delay before a reconnect attempt
    /// Default: 5s
    #[serde(with = "humantime_serde")]
    pub reconnect_interval: Duration,

    /// Give up after this many consecutive failed connects.
    /// 0 means retry forever.
    /// Default: 10
    pub max_reconnect_attempts: u32,

    /// Upper bound on establishing a connection
    /// Default: 5s
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,

    /// Upper bound on writing one batch frame
    /// Default: 5s
    #[serde(with = "humantime_serde")]
    pub write_timeout: Duration,

    /// Upper bound on waiting for the server's reply to a batch
    /// Default: 30s
    #[serde(with = "humantime_serde")]
    pub read_timeout: Duration,

    /// Smallest batch size (inclusive)
    /// Default: 49
    pub batch_min: usize,

    /// Largest batch size (inclusive)
    /// Default: 499
    pub batch_max: usize,
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self {
            target: "127.0.0.1:50100".to_string(),
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
