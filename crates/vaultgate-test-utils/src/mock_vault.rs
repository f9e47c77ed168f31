// SPDX-FileCopyrightText: 2026 Vaultgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory vault server for deterministic testing.
//!
//! `MockVault` implements `VaultApi` the way the real server behaves:
//! a fresh vault is uninitialized and sealed, and secret endpoints demand a
//! valid token. Only a missing token gets a 401. A sealed vault or an
//! unknown token is reported with the endpoint's generic failure status
//! (500 for list and write, 404 for read and delete, 403 for token
//! creation), so callers have to look at the message. The token a request
//! carries is read from the same credential store the code under test
//! writes to.
//!
//! Failures can be injected per operation, the whole server can be made
//! unreachable, and a status fetch can be held back to reorder responses.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::Notify;

use vaultgate_core::types::{HealthStatus, InitResponse, SecretData, SecretEntry, UnsealResponse};
use vaultgate_core::{CredentialStore, VaultApi, VaultStatus, VaultgateError};

/// Root token handed out by [`MockVault::initialize`].
pub const MOCK_ROOT_TOKEN: &str = "rt1";
/// Unseal key handed out by [`MockVault::initialize`].
pub const MOCK_UNSEAL_KEY: &str = "uk1";

/// Remote operations, for failure injection and call counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VaultOp {
    Health,
    Status,
    Init,
    Unseal,
    Seal,
    List,
    Read,
    Write,
    Delete,
    CreateToken,
    Authenticate,
}

/// Releases a status fetch held by [`MockVault::hold_next_status`].
pub struct StatusGate(Arc<Notify>);

impl StatusGate {
    pub fn release(&self) {
        self.0.notify_one();
    }
}

struct StoredSecret {
    path: String,
    data: SecretData,
    version: u64,
}

#[derive(Default)]
struct State {
    initialized: bool,
    sealed: bool,
    tokens: HashSet<String>,
    secrets: Vec<StoredSecret>,
    minted: u32,
    unreachable: bool,
    failures: HashMap<VaultOp, (u16, String)>,
    calls: HashMap<VaultOp, usize>,
    held_status: Option<Arc<Notify>>,
}

/// In-memory stand-in for the vault server.
pub struct MockVault {
    credentials: Arc<dyn CredentialStore>,
    state: Mutex<State>,
    status_calls: AtomicUsize,
}

impl MockVault {
    /// A fresh vault: uninitialized and sealed.
    pub fn new(credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            credentials,
            state: Mutex::new(State {
                sealed: true,
                ..State::default()
            }),
            status_calls: AtomicUsize::new(0),
        }
    }

    /// An initialized, sealed vault whose root token is [`MOCK_ROOT_TOKEN`].
    pub fn initialized_sealed(credentials: Arc<dyn CredentialStore>) -> Self {
        let vault = Self::new(credentials);
        {
            let mut state = vault.lock();
            state.initialized = true;
            state.tokens.insert(MOCK_ROOT_TOKEN.to_string());
        }
        vault
    }

    /// An initialized, unsealed vault whose root token is [`MOCK_ROOT_TOKEN`].
    pub fn initialized_unsealed(credentials: Arc<dyn CredentialStore>) -> Self {
        let vault = Self::initialized_sealed(credentials);
        vault.set_sealed(false);
        vault
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // A panicking test thread must not hide the state from the others.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn set_sealed(&self, sealed: bool) {
        self.lock().sealed = sealed;
    }

    pub fn set_unreachable(&self, unreachable: bool) {
        self.lock().unreachable = unreachable;
    }

    /// Makes the next call of `op` fail with `status` and `message`.
    pub fn fail_next(&self, op: VaultOp, status: u16, message: &str) {
        self.lock().failures.insert(op, (status, message.to_string()));
    }

    /// Accepts `token` as valid from now on.
    pub fn accept_token(&self, token: &str) {
        self.lock().tokens.insert(token.to_string());
    }

    /// Forgets `token`, as a server restart or expiry would.
    pub fn revoke_token(&self, token: &str) {
        self.lock().tokens.remove(token);
    }

    /// Stores a secret directly, bypassing authentication.
    pub fn seed_secret(&self, path: &str, data: SecretData) {
        upsert(&mut self.lock(), path, data);
    }

    /// Removes a secret directly, bypassing authentication.
    pub fn remove_secret(&self, path: &str) {
        self.lock().secrets.retain(|s| s.path != path);
    }

    pub fn secret(&self, path: &str) -> Option<SecretData> {
        self.lock()
            .secrets
            .iter()
            .find(|s| s.path == path)
            .map(|s| s.data.clone())
    }

    pub fn is_sealed(&self) -> bool {
        self.lock().sealed
    }

    pub fn is_initialized(&self) -> bool {
        self.lock().initialized
    }

    /// Number of calls made to `op`, including failed ones.
    pub fn calls(&self, op: VaultOp) -> usize {
        self.lock().calls.get(&op).copied().unwrap_or(0)
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    /// Holds the next status fetch until the returned gate is released.
    ///
    /// The held fetch reads the vault state after it is released.
    pub fn hold_next_status(&self) -> StatusGate {
        let notify = Arc::new(Notify::new());
        self.lock().held_status = Some(notify.clone());
        StatusGate(notify)
    }

    /// Records the call and applies reachability and injected failures.
    fn enter(&self, op: VaultOp) -> Result<MutexGuard<'_, State>, VaultgateError> {
        let mut state = self.lock();
        *state.calls.entry(op).or_default() += 1;
        if state.unreachable {
            return Err(VaultgateError::Transport {
                message: "connection refused".into(),
                source: None,
            });
        }
        if let Some((status, message)) = state.failures.remove(&op) {
            return Err(remote(status, &message));
        }
        Ok(state)
    }

    /// Like [`enter`](Self::enter), then checks the carried token and the seal.
    fn enter_authorized(&self, op: VaultOp) -> Result<MutexGuard<'_, State>, VaultgateError> {
        let token = self.credentials.get()?;
        let state = self.enter(op)?;
        let Some(token) = token else {
            return Err(remote(401, "missing token"));
        };
        if state.sealed {
            return Err(remote(refusal_status(op), "vault is sealed"));
        }
        if !state.tokens.contains(token.expose_secret()) {
            return Err(remote(refusal_status(op), "invalid token"));
        }
        Ok(state)
    }
}

/// Status the server uses for every non-token-header failure of `op`.
fn refusal_status(op: VaultOp) -> u16 {
    match op {
        VaultOp::Read | VaultOp::Delete => 404,
        VaultOp::CreateToken => 403,
        _ => 500,
    }
}

fn remote(status: u16, message: &str) -> VaultgateError {
    VaultgateError::Remote {
        status: Some(status),
        message: message.to_string(),
    }
}

fn upsert(state: &mut State, path: &str, data: SecretData) -> u64 {
    match state.secrets.iter_mut().find(|s| s.path == path) {
        Some(existing) => {
            existing.data = data;
            existing.version += 1;
            existing.version
        }
        None => {
            state.secrets.push(StoredSecret {
                path: path.to_string(),
                data,
                version: 1,
            });
            1
        }
    }
}

#[async_trait]
impl VaultApi for MockVault {
    async fn health(&self) -> Result<HealthStatus, VaultgateError> {
        self.enter(VaultOp::Health)?;
        Ok(HealthStatus::Healthy)
    }

    async fn status(&self) -> Result<VaultStatus, VaultgateError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        let held = self.lock().held_status.take();
        if let Some(notify) = held {
            notify.notified().await;
        }
        let state = self.enter(VaultOp::Status)?;
        Ok(VaultStatus {
            initialized: state.initialized,
            sealed: state.sealed,
        })
    }

    async fn initialize(&self) -> Result<InitResponse, VaultgateError> {
        let mut state = self.enter(VaultOp::Init)?;
        if state.initialized {
            return Err(remote(400, "vault is already initialized"));
        }
        state.initialized = true;
        state.tokens.insert(MOCK_ROOT_TOKEN.to_string());
        Ok(InitResponse {
            root_token: SecretString::from(MOCK_ROOT_TOKEN.to_string()),
            unseal_key: SecretString::from(MOCK_UNSEAL_KEY.to_string()),
        })
    }

    async fn unseal(&self, key: &str) -> Result<UnsealResponse, VaultgateError> {
        let mut state = self.enter(VaultOp::Unseal)?;
        if !state.initialized {
            return Err(remote(400, "vault is not initialized"));
        }
        if !state.sealed {
            return Err(remote(400, "vault is already unsealed"));
        }
        if key != MOCK_UNSEAL_KEY {
            return Err(remote(400, "invalid unseal key"));
        }
        state.sealed = false;
        Ok(UnsealResponse { sealed: false })
    }

    async fn seal(&self) -> Result<(), VaultgateError> {
        let mut state = self.enter(VaultOp::Seal)?;
        if state.sealed {
            return Err(remote(400, "vault is already sealed"));
        }
        state.sealed = true;
        Ok(())
    }

    async fn list_secrets(&self, prefix: &str) -> Result<Vec<String>, VaultgateError> {
        let state = self.enter_authorized(VaultOp::List)?;
        Ok(state
            .secrets
            .iter()
            .filter(|s| s.path.starts_with(prefix))
            .map(|s| s.path.clone())
            .collect())
    }

    async fn read_secret(&self, path: &str) -> Result<SecretEntry, VaultgateError> {
        let state = self.enter_authorized(VaultOp::Read)?;
        state
            .secrets
            .iter()
            .find(|s| s.path == path)
            .map(|s| SecretEntry {
                path: s.path.clone(),
                data: s.data.clone(),
                version: s.version,
            })
            .ok_or_else(|| remote(404, "key not found"))
    }

    async fn write_secret(&self, path: &str, data: &SecretData) -> Result<(), VaultgateError> {
        let mut state = self.enter_authorized(VaultOp::Write)?;
        upsert(&mut state, path, data.clone());
        Ok(())
    }

    async fn delete_secret(&self, path: &str) -> Result<(), VaultgateError> {
        let mut state = self.enter_authorized(VaultOp::Delete)?;
        let before = state.secrets.len();
        state.secrets.retain(|s| s.path != path);
        if state.secrets.len() == before {
            return Err(remote(404, "key not found"));
        }
        Ok(())
    }

    async fn create_token(&self, ttl: &str) -> Result<SecretString, VaultgateError> {
        let mut state = self.enter_authorized(VaultOp::CreateToken)?;
        if ttl.trim().is_empty() {
            return Err(remote(400, "invalid ttl format"));
        }
        state.minted += 1;
        let token = format!("tok-{}", state.minted);
        state.tokens.insert(token.clone());
        Ok(SecretString::from(token))
    }

    async fn authenticate_root(&self) -> Result<(), VaultgateError> {
        let token = self.credentials.get()?;
        let mut state = self.enter(VaultOp::Authenticate)?;
        match token {
            Some(token) if token.expose_secret() == MOCK_ROOT_TOKEN => {
                state.tokens.insert(MOCK_ROOT_TOKEN.to_string());
                Ok(())
            }
            Some(_) => Err(remote(401, "invalid root token")),
            None => Err(remote(401, "missing token")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vaultgate_credentials::MemoryCredentialStore;

    #[tokio::test]
    async fn fresh_vault_is_uninitialized_and_sealed() {
        let vault = MockVault::new(Arc::new(MemoryCredentialStore::new()));
        let status = vault.status().await.unwrap();
        assert!(!status.initialized);
        assert!(status.sealed);
    }

    #[tokio::test]
    async fn init_then_unseal() {
        let vault = MockVault::new(Arc::new(MemoryCredentialStore::new()));
        let init = vault.initialize().await.unwrap();
        assert_eq!(init.root_token.expose_secret(), MOCK_ROOT_TOKEN);

        let err = vault.initialize().await.unwrap_err();
        assert_eq!(err.status(), Some(400));

        assert!(vault.unseal("wrong").await.is_err());
        assert!(!vault.unseal(MOCK_UNSEAL_KEY).await.unwrap().sealed);
        assert!(!vault.is_sealed());
    }

    #[tokio::test]
    async fn secret_endpoints_check_token() {
        let creds = Arc::new(MemoryCredentialStore::new());
        let vault = MockVault::initialized_unsealed(creds.clone());

        assert_eq!(vault.list_secrets("").await.unwrap_err().status(), Some(401));
        creds.set(SecretString::from("bogus".to_string())).unwrap();
        let err = vault.list_secrets("").await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert!(err.is_unauthorized());
        let err = vault.read_secret("a").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert!(err.is_unauthorized());
        assert!(!err.is_not_found());
        creds.set(SecretString::from(MOCK_ROOT_TOKEN.to_string())).unwrap();
        assert!(vault.list_secrets("").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn injected_failure_applies_once() {
        let vault = MockVault::initialized_unsealed(Arc::new(MemoryCredentialStore::new()));
        vault.fail_next(VaultOp::Status, 500, "boom");
        assert_eq!(vault.status().await.unwrap_err().status(), Some(500));
        assert!(vault.status().await.is_ok());
        assert_eq!(vault.calls(VaultOp::Status), 2);
    }

    #[tokio::test]
    async fn rewrite_bumps_version() {
        let creds = Arc::new(MemoryCredentialStore::with_token(MOCK_ROOT_TOKEN));
        let vault = MockVault::initialized_unsealed(creds);
        let data = SecretData::from([("k".to_string(), "v".to_string())]);
        vault.write_secret("a", &data).await.unwrap();
        vault.write_secret("a", &data).await.unwrap();
        assert_eq!(vault.read_secret("a").await.unwrap().version, 2);
    }

    #[tokio::test]
    async fn sealed_vault_is_not_a_token_rejection() {
        let creds = Arc::new(MemoryCredentialStore::with_token(MOCK_ROOT_TOKEN));
        let vault = MockVault::initialized_sealed(creds);
        let err = vault.list_secrets("").await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert!(!err.is_unauthorized());
    }
}
