// SPDX-FileCopyrightText: 2026 Vaultgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential store trait.

use secrecy::SecretString;

use crate::error::VaultgateError;

/// Holder of the single current access token.
///
/// The token's shape is never validated here; only the remote decides
/// whether it is acceptable. Every consumer reads through this trait.
pub trait CredentialStore: Send + Sync {
    /// Persists `token`, replacing any previous value.
    fn set(&self, token: SecretString) -> Result<(), VaultgateError>;

    /// Returns the current token, or `None` when none is held.
    fn get(&self) -> Result<Option<SecretString>, VaultgateError>;

    /// Removes the current token. Clearing an empty store is not an error.
    fn clear(&self) -> Result<(), VaultgateError>;

    /// Whether a token is currently held. Read failures count as absent.
    fn is_present(&self) -> bool {
        matches!(self.get(), Ok(Some(_)))
    }
}
