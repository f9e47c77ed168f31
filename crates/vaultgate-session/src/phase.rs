// SPDX-FileCopyrightText: 2026 Vaultgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Access phase derivation.
//!
//! The phase is never stored. It is recomputed from the most recent remote
//! status and whether a credential is currently held, so it cannot drift
//! from either source.

use vaultgate_core::{AccessPhase, VaultStatus};

/// What the presentation layer should offer the operator in a given phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Offer one-time initialization.
    Initialize,
    /// Ask for the unseal key.
    Unseal,
    /// Ask for an access token.
    Login,
    /// Full secrets management.
    ManageSecrets,
}

/// Derives the phase from a status snapshot and credential presence.
///
/// An unknown status (never fetched) is treated as uninitialized.
pub fn derive_phase(status: Option<VaultStatus>, credential_present: bool) -> AccessPhase {
    match status {
        None
        | Some(VaultStatus {
            initialized: false, ..
        }) => AccessPhase::Uninitialized,
        Some(VaultStatus { sealed: true, .. }) => AccessPhase::Sealed,
        Some(_) if !credential_present => AccessPhase::Unauthenticated,
        Some(_) => AccessPhase::Authenticated,
    }
}

/// The single capability exposed in `phase`.
pub fn capability(phase: AccessPhase) -> Capability {
    match phase {
        AccessPhase::Uninitialized => Capability::Initialize,
        AccessPhase::Sealed => Capability::Unseal,
        AccessPhase::Unauthenticated => Capability::Login,
        AccessPhase::Authenticated => Capability::ManageSecrets,
    }
}
