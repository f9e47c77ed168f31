// SPDX-FileCopyrightText: 2026 Vaultgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable credential store backed by a single JSON document.
//!
//! The document has one key, `vault_token`. Writes go to a sibling temp file
//! that is then renamed over the target, so a reader sees either the old or
//! the new token and never a partial one. On Unix the file is created `0600`.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;
use vaultgate_config::model::CredentialsConfig;
use vaultgate_core::{CredentialStore, VaultgateError};
use zeroize::Zeroizing;

#[derive(Deserialize)]
struct CredentialDocument {
    #[serde(default)]
    vault_token: Option<String>,
}

#[derive(Serialize)]
struct CredentialDocumentRef<'a> {
    vault_token: &'a str,
}

/// Credential store persisted at a fixed path.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &CredentialsConfig) -> Self {
        Self::new(&config.path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "credential".to_string());
        self.path.with_file_name(format!(".{name}.tmp"))
    }

    fn write_document(&self, token: &str) -> Result<(), VaultgateError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| io_error("create credential directory", e))?;
        }

        let doc = CredentialDocumentRef { vault_token: token };
        let body = Zeroizing::new(serde_json::to_string(&doc).map_err(|e| {
            VaultgateError::Credential {
                message: format!("failed to encode credential document: {e}"),
                source: Some(Box::new(e)),
            }
        })?);

        let tmp = self.temp_path();
        let mut file = open_private(&tmp).map_err(|e| io_error("open credential temp file", e))?;
        file.write_all(body.as_bytes())
            .and_then(|()| file.sync_all())
            .map_err(|e| io_error("write credential temp file", e))?;
        fs::rename(&tmp, &self.path).map_err(|e| io_error("replace credential file", e))?;
        Ok(())
    }
}

#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

fn io_error(action: &str, e: std::io::Error) -> VaultgateError {
    VaultgateError::Credential {
        message: format!("failed to {action}: {e}"),
        source: Some(Box::new(e)),
    }
}

impl CredentialStore for FileCredentialStore {
    fn set(&self, token: SecretString) -> Result<(), VaultgateError> {
        self.write_document(token.expose_secret())?;
        debug!(path = %self.path.display(), "credential stored");
        Ok(())
    }

    fn get(&self) -> Result<Option<SecretString>, VaultgateError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => Zeroizing::new(raw),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error("read credential file", e)),
        };
        let doc: CredentialDocument =
            serde_json::from_str(&raw).map_err(|e| VaultgateError::Credential {
                message: format!("malformed credential file {}: {e}", self.path.display()),
                source: Some(Box::new(e)),
            })?;
        Ok(doc
            .vault_token
            .filter(|t| !t.trim().is_empty())
            .map(SecretString::from))
    }

    fn clear(&self) -> Result<(), VaultgateError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "credential cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error("remove credential file", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn token(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    #[test]
    fn missing_file_reads_as_absent() {
        let dir = tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("credential.json"));
        assert!(store.get().unwrap().is_none());
        assert!(!store.is_present());
    }

    #[test]
    fn token_survives_a_new_store_instance() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/credential.json");

        FileCredentialStore::new(&path).set(token("rt1")).unwrap();

        // A fresh instance stands in for a restarted process.
        let reopened = FileCredentialStore::new(&path);
        assert_eq!(reopened.get().unwrap().unwrap().expose_secret(), "rt1");
    }

    #[test]
    fn set_overwrites_previous_token() {
        let dir = tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("credential.json"));
        store.set(token("first")).unwrap();
        store.set(token("second")).unwrap();
        assert_eq!(store.get().unwrap().unwrap().expose_secret(), "second");
        assert!(!store.temp_path().exists(), "temp file must be renamed away");
    }

    #[test]
    fn clear_removes_and_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("credential.json"));
        store.set(token("rt1")).unwrap();
        store.clear().unwrap();
        assert!(store.get().unwrap().is_none());
        store.clear().unwrap();
    }

    #[test]
    fn blank_token_on_disk_reads_as_absent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("credential.json");
        fs::write(&path, r#"{"vault_token":"   "}"#).unwrap();
        assert!(FileCredentialStore::new(&path).get().unwrap().is_none());
    }

    #[test]
    fn malformed_document_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("credential.json");
        fs::write(&path, "not json").unwrap();
        let err = FileCredentialStore::new(&path).get().unwrap_err();
        assert!(matches!(err, VaultgateError::Credential { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn file_is_private_to_owner() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("credential.json"));
        store.set(token("rt1")).unwrap();
        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
