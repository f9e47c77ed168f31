// SPDX-FileCopyrightText: 2026 Vaultgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Vaultgate client.

use thiserror::Error;

use crate::types::AccessPhase;

/// The primary error type used across the Vaultgate crates.
#[derive(Debug, Error)]
pub enum VaultgateError {
    /// The remote could not be reached (connection refused, DNS, timeout).
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The remote answered with a non-2xx status.
    #[error("{}", format_remote(.status, .message))]
    Remote { status: Option<u16>, message: String },

    /// Input rejected locally before any remote call was made.
    #[error("validation error: {0}")]
    Validation(String),

    /// The current credential was rejected by the remote during a probe.
    #[error("credential rejected: {0}")]
    StaleCredential(String),

    /// Configuration errors (invalid address, bad TOML values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Durable credential storage failed (I/O, malformed document).
    #[error("credential store error: {message}")]
    Credential {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A 2xx response body did not match the expected wire shape.
    #[error("failed to decode response: {message}")]
    Decode {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An operation was invoked in a phase that does not permit it.
    #[error("operation requires phase `{required}`, vault is `{actual}`")]
    PhaseGate {
        required: AccessPhase,
        actual: AccessPhase,
    },

    /// A mutation was committed remotely but refreshing the local cache failed.
    #[error("{operation} of `{path}` succeeded but the catalog refresh failed: {source}")]
    StaleCache {
        operation: &'static str,
        path: String,
        source: Box<VaultgateError>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

fn format_remote(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("remote error ({code}): {message}"),
        None => format!("remote error: {message}"),
    }
}

impl VaultgateError {
    /// Returns the HTTP status of a remote error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            VaultgateError::Remote { status, .. } => *status,
            _ => None,
        }
    }

    /// True when the remote refused the request's credential.
    ///
    /// Besides 401 and 403, the server reports a bad token with whatever
    /// status the endpoint uses for its other failures (500 on list and
    /// write, 404 on read and delete), so the message is checked too.
    pub fn is_unauthorized(&self) -> bool {
        match self {
            VaultgateError::Remote { status, message } => {
                matches!(status, Some(401 | 403)) || is_token_rejection(message)
            }
            _ => false,
        }
    }

    /// True when the remote reported the addressed resource as missing.
    pub fn is_not_found(&self) -> bool {
        match self {
            VaultgateError::Remote { status, message } => {
                *status == Some(404) && !is_token_rejection(message) && message.trim() != SEALED
            }
            _ => false,
        }
    }
}

/// Messages the server sends when it refuses a token.
const TOKEN_REJECTIONS: &[&str] = &[
    "missing token",
    "invalid token",
    "token expired",
    "token not found",
    "invalid root token",
];

const SEALED: &str = "vault is sealed";

fn is_token_rejection(message: &str) -> bool {
    let message = message.trim();
    TOKEN_REJECTIONS
        .iter()
        .any(|known| message.eq_ignore_ascii_case(known))
}
