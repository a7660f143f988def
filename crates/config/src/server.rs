//! Ingest server configuration

use std::time::Duration;

use serde::Deserialize;

/// Ingest server configuration
///
/// # Example
///
/// ```toml
/// [server]
/// address = "0.0.0.0"
/// port = 50100
/// shutdown_grace = "10s"
/// persist_timeout = "5s"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    /// Default: 0.0.0.0
    pub address: String,

    /// Bind port
    /// Default: 50100
    pub port: u16,

    /// Enable TCP keepalive on accepted connections
    /// Default: true
    pub keepalive: bool,

    /// Set TCP_NODELAY on accepted connections
    /// Default: true
    pub nodelay: bool,

    /// How long to wait for in-flight connections during shutdown
    /// Default: 10s
    #[serde(with = "humantime_serde")]
    pub shutdown_grace: Duration,

    /// Upper bound on a single store append
    /// Default: 5s
    #[serde(with = "humantime_serde")]
    pub persist_timeout: Duration,
}

impl ServerConfig {
    /// Full bind address as "address:port"
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "0.0.0.0".to_string(),
            port: 50100,
            keepalive: true,
            nodelay: true,
            shutdown_grace: Duration::from_secs(10),
            persist_timeout: Duration::from_secs(5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_address(), "0.0.0.0:50100");
        assert!(config.keepalive);
        assert!(config.nodelay);
        assert_eq!(config.shutdown_grace, Duration::from_secs(10));
    }

    #[test]
    fn test_deserialize_durations() {
        let toml = r#"
shutdown_grace = "3s"
persist_timeout = "500ms"
"#;
        let config: ServerConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.shutdown_grace, Duration::from_secs(3));
        assert_eq!(config.persist_timeout, Duration::from_millis(500));
    }

    #[test]
    fn test_bind_address() {
        let config: ServerConfig = toml::from_str("address = \"127.0.0.1\"\nport = 9999").unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:9999");
    }
}
