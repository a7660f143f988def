//! Crypto configuration

use serde::Deserialize;

/// Default shared secret, for demos only. Deployments must override it.
pub const DEMO_SECRET: &str = "pulse-demo-secret";

/// Crypto configuration
///
/// The producer and the server must share the same secret, otherwise every
/// message fails integrity validation on the server side.
///
/// # Example
///
/// ```toml
/// [crypto]
/// secret = "change-me"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CryptoConfig {
    /// Shared secret the envelope key is derived from
    pub secret: String,
}

impl CryptoConfig {
    /// True when the config still carries the built-in demo secret
    pub fn is_demo_secret(&self) -> bool {
        self.secret == DEMO_SECRET
    }
}

impl Default for CryptoConfig {
    fn default() -> Self {
        Self {
            secret: DEMO_SECRET.to_string(),
        }
    }
}
