//! Configuration validation
//!
//! Runs after parsing; a config that deserializes but fails here never
//! reaches the runtime.

use crate::error::{ConfigError, Result};
use crate::Config;

/// Validate the whole configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_crypto(config)?;
    validate_server(config)?;
    validate_producer(config)?;
    validate_reference(config)?;
    validate_stats(config)?;
    Ok(())
}

fn validate_crypto(config: &Config) -> Result<()> {
    if config.crypto.secret.is_empty() {
        return Err(ConfigError::missing_field("crypto", "secret"));
    }
    Ok(())
}

fn validate_server(config: &Config) -> Result<()> {
    if config.server.address.is_empty() {
        return Err(ConfigError::missing_field("server", "address"));
    }
    if config.server.persist_timeout.is_zero() {
        return Err(ConfigError::invalid_value(
            "server",
            "persist_timeout",
            "must be non-zero",
        ));
    }
    Ok(())
}

fn validate_producer(config: &Config) -> Result<()> {
    let producer = &config.producer;
    if producer.target.is_empty() {
        return Err(ConfigError::missing_field("producer", "target"));
    }
    if producer.send_interval.is_zero() {
        return Err(ConfigError::invalid_value(
            "producer",
            "send_interval",
            "must be non-zero",
        ));
    }
    if producer.reconnect_interval.is_zero() {
        return Err(ConfigError::invalid_value(
            "producer",
            "reconnect_interval",
            "must be non-zero",
        ));
    }
    if producer.read_timeout.is_zero() {
        return Err(ConfigError::invalid_value(
            "producer",
            "read_timeout",
            "must be non-zero",
        ));
    }
    if producer.batch_min == 0 {
        return Err(ConfigError::invalid_value(
            "producer",
            "batch_min",
            "must be at least 1",
        ));
    }
    if producer.batch_min > producer.batch_max {
        return Err(ConfigError::invalid_value(
            "producer",
            "batch_max",
            format!(
                "must be >= batch_min ({} > {})",
                producer.batch_min, producer.batch_max
            ),
        ));
    }
    Ok(())
}

fn validate_reference(config: &Config) -> Result<()> {
    let reference = &config.reference;
    for (field, list) in [
        ("names", &reference.names),
        ("origins", &reference.origins),
        ("destinations", &reference.destinations),
    ] {
        if list.is_empty() {
            return Err(ConfigError::invalid_value(
                "reference",
                field,
                "must not be empty",
            ));
        }
        if list.iter().any(|item| item.is_empty()) {
            return Err(ConfigError::invalid_value(
                "reference",
                field,
                "entries must not be empty strings",
            ));
        }
    }
    Ok(())
}

fn validate_stats(config: &Config) -> Result<()> {
    if config.stats.enabled && config.stats.interval.is_zero() {
        return Err(ConfigError::invalid_value(
            "stats",
            "interval",
            "must be non-zero when stats are enabled",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_empty_secret_rejected() {
        let result = Config::from_str("[crypto]\nsecret = \"\"");
        assert!(matches!(
            result,
            Err(ConfigError::MissingField {
                section: "crypto",
                field: "secret",
            })
        ));
    }

    #[test]
    fn test_zero_send_interval_rejected() {
        let result = Config::from_str("[producer]\nsend_interval = \"0s\"");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_zero_batch_min_rejected() {
        let result = Config::from_str("[producer]\nbatch_min = 0");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_inverted_batch_range_rejected() {
        let result = Config::from_str("[producer]\nbatch_min = 100\nbatch_max = 50");
        let err = result.unwrap_err();
        assert!(err.to_string().contains("batch_max"));
    }

    #[test]
    fn test_empty_reference_list_rejected() {
        let result = Config::from_str("[reference]\nnames = []");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_empty_reference_entry_rejected() {
        let result = Config::from_str("[reference]\norigins = [\"Mumbai\", \"\"]");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_zero_stats_interval_ok_when_disabled() {
        let result = Config::from_str("[stats]\nenabled = false\ninterval = \"0s\"");
        assert!(result.is_ok());
    }
}
