//! Stats reporting configuration

use std::time::Duration;

use serde::Deserialize;

/// Periodic stats reporting configuration
///
/// # Example
///
/// ```toml
/// [stats]
/// enabled = true
/// interval = "60s"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Whether to log a periodic stats summary
    /// Default: true
    pub enabled: bool,

    /// Interval between summaries
    /// Default: 60s
    #[serde(with = "humantime_serde")]
    pub interval: Duration,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: Duration::from_secs(60),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StatsConfig::default();
        assert!(config.enabled);
        assert_eq!(config.interval, Duration::from_secs(60));
    }

    #[test]
    fn test_disabled() {
        let config: StatsConfig = toml::from_str("enabled = false").unwrap();
        assert!(!config.enabled);
    }
}
