// SPDX-FileCopyrightText: 2026 Vaultgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Vaultgate client.
//!
//! This crate provides the error taxonomy, the domain types, and the traits
//! that separate the orchestration layer from the remote API, the credential
//! store, and the presentation layer's confirmation prompt.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::VaultgateError;
pub use types::{
    AccessPhase, HealthStatus, InitResponse, SecretData, SecretEntry, UnsealResponse,
    VaultStatus, normalize_path,
};

pub use traits::{AlwaysConfirm, Confirmation, CredentialStore, NeverConfirm, VaultApi};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_phase_display_and_parse() {
        use std::str::FromStr;

        let phases = [
            AccessPhase::Uninitialized,
            AccessPhase::Sealed,
            AccessPhase::Unauthenticated,
            AccessPhase::Authenticated,
        ];
        for phase in &phases {
            let s = phase.to_string();
            let parsed = AccessPhase::from_str(&s).expect("should parse back");
            assert_eq!(*phase, parsed);
        }
        assert_eq!(AccessPhase::Unauthenticated.to_string(), "unauthenticated");
    }

    #[test]
    fn access_phase_serializes_snake_case() {
        let json = serde_json::to_string(&AccessPhase::Authenticated).unwrap();
        assert_eq!(json, "\"authenticated\"");
    }

    #[test]
    fn remote_error_classification() {
        let unauthorized = VaultgateError::Remote {
            status: Some(403),
            message: "invalid token".into(),
        };
        assert!(unauthorized.is_unauthorized());
        assert!(!unauthorized.is_not_found());

        let missing = VaultgateError::Remote {
            status: Some(404),
            message: "secret not found".into(),
        };
        assert!(missing.is_not_found());
        assert_eq!(missing.to_string(), "remote error (404): secret not found");

        let expired = VaultgateError::Remote {
            status: Some(500),
            message: "token expired".into(),
        };
        assert!(expired.is_unauthorized());

        let unknown_on_read = VaultgateError::Remote {
            status: Some(404),
            message: "invalid token".into(),
        };
        assert!(unknown_on_read.is_unauthorized());
        assert!(!unknown_on_read.is_not_found());

        let sealed = VaultgateError::Remote {
            status: Some(500),
            message: "vault is sealed".into(),
        };
        assert!(!sealed.is_unauthorized());

        let transport = VaultgateError::Transport {
            message: "connection refused".into(),
            source: None,
        };
        assert!(!transport.is_unauthorized());
        assert_eq!(transport.status(), None);
    }

    #[test]
    fn secret_paths_are_normalized() {
        assert_eq!(normalize_path(" /kv/db/ ").unwrap(), "kv/db");
        assert!(matches!(
            normalize_path("//"),
            Err(VaultgateError::Validation(_))
        ));
    }

    #[test]
    fn phase_gate_message_names_both_phases() {
        let err = VaultgateError::PhaseGate {
            required: AccessPhase::Authenticated,
            actual: AccessPhase::Sealed,
        };
        assert_eq!(
            err.to_string(),
            "operation requires phase `authenticated`, vault is `sealed`"
        );
    }

    #[test]
    fn stale_cache_wraps_refresh_error() {
        let err = VaultgateError::StaleCache {
            operation: "write",
            path: "kv/x".into(),
            source: Box::new(VaultgateError::Transport {
                message: "timed out".into(),
                source: None,
            }),
        };
        let text = err.to_string();
        assert!(text.contains("write of `kv/x` succeeded"), "got: {text}");
        assert!(text.contains("timed out"), "got: {text}");
    }

    #[test]
    fn confirmation_helpers() {
        assert!(AlwaysConfirm.confirm("seal?"));
        assert!(!NeverConfirm.confirm("seal?"));
    }

    #[test]
    fn init_response_debug_redacts_material() {
        let init: InitResponse = serde_json::from_str(
            r#"{"root_token":"rt-visible","unseal_key":"uk-visible"}"#,
        )
        .unwrap();
        let debug = format!("{init:?}");
        assert!(!debug.contains("rt-visible"));
        assert!(!debug.contains("uk-visible"));
    }
}
