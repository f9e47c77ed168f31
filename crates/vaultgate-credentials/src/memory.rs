// SPDX-FileCopyrightText: 2026 Vaultgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-lifetime credential store.

use std::sync::RwLock;

use secrecy::{ExposeSecret, SecretString};
use vaultgate_core::{CredentialStore, VaultgateError};

/// Holds the token in memory behind a lock; nothing touches disk.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    token: RwLock<Option<SecretString>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `token`.
    pub fn with_token(token: &str) -> Self {
        Self {
            token: RwLock::new(Some(SecretString::from(token.to_string()))),
        }
    }
}

fn poisoned<T>(_: T) -> VaultgateError {
    VaultgateError::Internal("credential lock poisoned".to_string())
}

impl CredentialStore for MemoryCredentialStore {
    fn set(&self, token: SecretString) -> Result<(), VaultgateError> {
        *self.token.write().map_err(poisoned)? = Some(token);
        Ok(())
    }

    fn get(&self) -> Result<Option<SecretString>, VaultgateError> {
        let guard = self.token.read().map_err(poisoned)?;
        Ok(guard
            .as_ref()
            .map(|t| SecretString::from(t.expose_secret().to_string())))
    }

    fn clear(&self) -> Result<(), VaultgateError> {
        *self.token.write().map_err(poisoned)? = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_clear_lifecycle() {
        let store = MemoryCredentialStore::new();
        assert!(!store.is_present());

        store.set(SecretString::from("t1".to_string())).unwrap();
        assert_eq!(store.get().unwrap().unwrap().expose_secret(), "t1");

        store.set(SecretString::from("t2".to_string())).unwrap();
        assert_eq!(store.get().unwrap().unwrap().expose_secret(), "t2");

        store.clear().unwrap();
        assert!(store.get().unwrap().is_none());
        store.clear().unwrap();
    }
}
