// SPDX-FileCopyrightText: 2026 Vaultgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as URL schemes, positive intervals, and non-empty paths.

use crate::diagnostic::ConfigError;
use crate::model::VaultgateConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &VaultgateConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let address = config.client.address.trim();
    if address.is_empty() {
        errors.push(ConfigError::Validation {
            message: "client.address must not be empty".to_string(),
        });
    } else if !(address.starts_with("http://") || address.starts_with("https://")) {
        errors.push(ConfigError::Validation {
            message: format!("client.address `{address}` must start with http:// or https://"),
        });
    }

    if config.client.request_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "client.request_timeout_secs must be greater than 0".to_string(),
        });
    }

    if config.monitor.poll_interval_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "monitor.poll_interval_secs must be greater than 0".to_string(),
        });
    }

    if config.credentials.path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "credentials.path must not be empty".to_string(),
        });
    }

    if config.token.default_ttl.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "token.default_ttl must not be empty".to_string(),
        });
    }

    let level = config.logging.level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "logging.level `{}` is not one of: {}",
                config.logging.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(validate_config(&VaultgateConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_error() {
        let mut config = VaultgateConfig::default();
        config.client.address = "ftp://vault".into();
        config.monitor.poll_interval_secs = 0;
        config.logging.level = "loud".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors[0].to_string().contains("ftp://vault"));
    }

    #[test]
    fn log_level_is_case_insensitive() {
        let mut config = VaultgateConfig::default();
        config.logging.level = "DEBUG".into();
        assert!(validate_config(&config).is_ok());
    }
}
