// SPDX-FileCopyrightText: 2026 Vaultgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end testing.
//!
//! `TestHarness` assembles a complete session around a [`MockVault`], with
//! the credential persisted to a file in a temp directory the way the
//! binary persists it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use secrecy::SecretString;
use vaultgate_config::VaultgateConfig;
use vaultgate_core::{Confirmation, CredentialStore, VaultgateError};
use vaultgate_credentials::FileCredentialStore;
use vaultgate_session::{SessionOptions, VaultSession};

use crate::mock_vault::MockVault;

/// Confirmation with a settable answer that remembers every prompt.
#[derive(Debug)]
pub struct ScriptedConfirm {
    answer: AtomicBool,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedConfirm {
    pub fn new(answer: bool) -> Self {
        Self {
            answer: AtomicBool::new(answer),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn set_answer(&self, answer: bool) {
        self.answer.store(answer, Ordering::SeqCst);
    }

    /// Prompts shown so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }
}

impl Confirmation for ScriptedConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        self.answer.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy)]
enum Preset {
    Fresh,
    Sealed,
    Unsealed,
}

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    preset: Preset,
    token: Option<String>,
    confirm: bool,
    config: VaultgateConfig,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            preset: Preset::Fresh,
            token: None,
            confirm: true,
            config: VaultgateConfig::default(),
        }
    }

    /// Start from an initialized but sealed vault.
    pub fn sealed(mut self) -> Self {
        self.preset = Preset::Sealed;
        self
    }

    /// Start from an initialized, unsealed vault.
    pub fn unsealed(mut self) -> Self {
        self.preset = Preset::Unsealed;
        self
    }

    /// Pre-store `token` in the credential file.
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    /// Answer every confirmation prompt with `answer`.
    pub fn confirming(mut self, answer: bool) -> Self {
        self.confirm = answer;
        self
    }

    pub fn with_config(mut self, config: VaultgateConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the harness and apply one status fetch.
    pub async fn build(self) -> Result<TestHarness, VaultgateError> {
        let temp_dir = tempfile::TempDir::new().map_err(|e| VaultgateError::Credential {
            message: "failed to create temp dir".into(),
            source: Some(Box::new(e)),
        })?;
        let store = Arc::new(FileCredentialStore::new(
            temp_dir.path().join("credential.json"),
        ));
        if let Some(token) = self.token {
            store.set(SecretString::from(token))?;
        }
        let credentials: Arc<dyn CredentialStore> = store.clone();

        let vault = Arc::new(match self.preset {
            Preset::Fresh => MockVault::new(credentials.clone()),
            Preset::Sealed => MockVault::initialized_sealed(credentials.clone()),
            Preset::Unsealed => MockVault::initialized_unsealed(credentials.clone()),
        });
        let confirm = Arc::new(ScriptedConfirm::new(self.confirm));

        let session = VaultSession::new(
            vault.clone(),
            credentials,
            confirm.clone(),
            SessionOptions::from_config(&self.config),
        );
        session.refresh().await?;

        Ok(TestHarness {
            vault,
            credentials: store,
            confirm,
            session,
            config: self.config,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete test environment around an in-memory vault.
pub struct TestHarness {
    /// The in-memory vault server.
    pub vault: Arc<MockVault>,
    /// File-backed credential store inside the temp directory.
    pub credentials: Arc<FileCredentialStore>,
    /// Confirmation prompt used by the session.
    pub confirm: Arc<ScriptedConfirm>,
    /// The session under test.
    pub session: VaultSession,
    pub config: VaultgateConfig,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// A second session over the same vault and credential file, as a
    /// restarted client would see it.
    pub async fn reopen(&self) -> Result<VaultSession, VaultgateError> {
        let store: Arc<dyn CredentialStore> =
            Arc::new(FileCredentialStore::new(self.credentials.path()));
        let session = VaultSession::new(
            self.vault.clone(),
            store,
            self.confirm.clone(),
            SessionOptions::from_config(&self.config),
        );
        session.refresh().await?;
        Ok(session)
    }
}
