// SPDX-FileCopyrightText: 2026 Vaultgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by the client, the session layer, and presentation.

use std::collections::BTreeMap;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::VaultgateError;

/// Key/value payload of a single secret.
pub type SecretData = BTreeMap<String, String>;

/// Status as reported by `GET /v1/sys/status`.
///
/// Only ever produced by the remote; the client re-fetches it, never edits it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultStatus {
    pub initialized: bool,
    pub sealed: bool,
}

/// Operational phase derived from the latest status and the local credential.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AccessPhase {
    /// The vault has never been initialized, or its status is not yet known.
    Uninitialized,
    /// Initialized but sealed; an unseal key is required.
    Sealed,
    /// Unsealed, but no credential is held.
    Unauthenticated,
    /// Unsealed and a credential is held.
    Authenticated,
}

/// A fully read secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretEntry {
    pub path: String,
    pub data: SecretData,
    /// Always at least 1; the remote omits it for unversioned stores.
    pub version: u64,
}

/// Normalizes a secret path: surrounding slashes are dropped, empty is rejected.
pub fn normalize_path(path: &str) -> Result<&str, VaultgateError> {
    let trimmed = path.trim().trim_matches('/');
    if trimmed.is_empty() {
        return Err(VaultgateError::Validation(
            "secret path must not be empty".to_string(),
        ));
    }
    Ok(trimmed)
}

/// One-time material returned by `POST /v1/sys/init`.
///
/// Both values are shown to the operator exactly once.
#[derive(Debug, Deserialize)]
pub struct InitResponse {
    pub root_token: SecretString,
    pub unseal_key: SecretString,
}

/// Result of an unseal attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct UnsealResponse {
    pub sealed: bool,
}

/// Health reported by `GET /v1/sys/health`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// The remote answered `ok`.
    Healthy,
    /// The remote answered with some other status string.
    Degraded(String),
}
