// SPDX-FileCopyrightText: 2026 Vaultgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Access token stores for the Vaultgate client.
//!
//! [`FileCredentialStore`] keeps the token in a single JSON document so it
//! survives restarts of the client process. [`MemoryCredentialStore`] holds it
//! for the lifetime of the process only.

pub mod file;
pub mod memory;

pub use file::FileCredentialStore;
pub use memory::MemoryCredentialStore;

/// Mask a token for display, keeping only the last four characters.
///
/// Short tokens are masked entirely.
pub fn mask_token(token: &str) -> String {
    let count = token.chars().count();
    if count <= 8 {
        return "****".to_string();
    }
    let tail: String = token.chars().skip(count - 4).collect();
    format!("****{tail}")
}
