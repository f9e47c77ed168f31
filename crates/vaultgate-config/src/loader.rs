// SPDX-FileCopyrightText: 2026 Vaultgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./vaultgate.toml` > `~/.config/vaultgate/vaultgate.toml`
//! > `/etc/vaultgate/vaultgate.toml`, with `VAULTGATE_*` overrides and the
//! conventional `VAULT_ADDR` variable on top.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::VaultgateConfig;

/// Environment variable conventionally holding the vault server address.
pub const VAULT_ADDR_ENV_VAR: &str = "VAULT_ADDR";

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/vaultgate/vaultgate.toml` (system-wide)
/// 3. `~/.config/vaultgate/vaultgate.toml` (user XDG config)
/// 4. `./vaultgate.toml` (local directory)
/// 5. `VAULTGATE_*` environment variables
/// 6. `VAULT_ADDR`
pub fn load_config() -> Result<VaultgateConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<VaultgateConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VaultgateConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<VaultgateConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VaultgateConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .merge(vault_addr_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(VaultgateConfig::default()))
        .merge(Toml::file("/etc/vaultgate/vaultgate.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("vaultgate/vaultgate.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("vaultgate.toml"))
        .merge(env_provider())
        .merge(vault_addr_provider())
}

/// Create the `VAULTGATE_` provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `VAULTGATE_CLIENT_REQUEST_TIMEOUT_SECS` must map to
/// `client.request_timeout_secs`, not `client.request.timeout.secs`.
fn env_provider() -> Env {
    Env::prefixed("VAULTGATE_").map(|key| {
        let mapped = key
            .as_str()
            .replacen("client_", "client.", 1)
            .replacen("monitor_", "monitor.", 1)
            .replacen("credentials_", "credentials.", 1)
            .replacen("catalog_", "catalog.", 1)
            .replacen("token_", "token.", 1)
            .replacen("logging_", "logging.", 1);
        mapped.into()
    })
}

/// Maps `VAULT_ADDR` onto `client.address`.
fn vault_addr_provider() -> Env {
    Env::raw()
        .only(&[VAULT_ADDR_ENV_VAR])
        .map(|_| "client.address".into())
}
