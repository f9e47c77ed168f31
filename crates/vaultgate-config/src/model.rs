// SPDX-FileCopyrightText: 2026 Vaultgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Vaultgate client.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Vaultgate configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VaultgateConfig {
    /// Remote vault connection settings.
    #[serde(default)]
    pub client: ClientConfig,

    /// Background status polling settings.
    #[serde(default)]
    pub monitor: MonitorConfig,

    /// Durable credential storage settings.
    #[serde(default)]
    pub credentials: CredentialsConfig,

    /// Secrets catalog settings.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Token minting settings.
    #[serde(default)]
    pub token: TokenConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote vault connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Base address of the vault server, e.g. `http://127.0.0.1:8200`.
    #[serde(default = "default_address")]
    pub address: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_address() -> String {
    "http://127.0.0.1:8200".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// Status monitor configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MonitorConfig {
    /// Seconds between unattended status refreshes.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

fn default_poll_interval_secs() -> u64 {
    10
}

/// Credential storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CredentialsConfig {
    /// Path of the JSON document holding the current access token.
    #[serde(default = "default_credentials_path")]
    pub path: String,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            path: default_credentials_path(),
        }
    }
}

fn default_credentials_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("vaultgate").join("credential.json"))
        .unwrap_or_else(|| std::path::PathBuf::from("credential.json"))
        .to_string_lossy()
        .to_string()
}

/// Secrets catalog configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogConfig {
    /// Prefix sent with every listing. Empty lists everything.
    #[serde(default)]
    pub prefix: String,
}

/// Token minting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TokenConfig {
    /// TTL sent to `token create` when the caller gives none (Go duration syntax).
    #[serde(default = "default_ttl")]
    pub default_ttl: String,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            default_ttl: default_ttl(),
        }
    }
}

fn default_ttl() -> String {
    "24h".to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
