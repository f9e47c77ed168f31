// SPDX-FileCopyrightText: 2026 Vaultgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session orchestration.
//!
//! [`VaultSession`] wires the remote API, the credential store, the status
//! monitor and the secrets catalog together. Every operation is gated on
//! the access phase derived from the latest status and the credential.
//! Mutations of remote state never update the phase directly: they are
//! followed by an authoritative status fetch.

use std::sync::Arc;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};
use vaultgate_config::VaultgateConfig;
use vaultgate_core::{
    AccessPhase, Confirmation, CredentialStore, HealthStatus, InitResponse, SecretData,
    SecretEntry, VaultApi, VaultgateError,
};

use crate::catalog::SecretsCatalog;
use crate::monitor::{MonitorSnapshot, StatusMonitor};
use crate::phase::derive_phase;

/// Tunables for a session, usually taken from the loaded configuration.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub poll_interval: Duration,
    pub catalog_prefix: String,
    pub default_token_ttl: String,
}

impl SessionOptions {
    pub fn from_config(config: &VaultgateConfig) -> Self {
        Self {
            poll_interval: Duration::from_secs(config.monitor.poll_interval_secs),
            catalog_prefix: config.catalog.prefix.clone(),
            default_token_ttl: config.token.default_ttl.clone(),
        }
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::from_config(&VaultgateConfig::default())
    }
}

/// The client-side state machine for one vault.
pub struct VaultSession {
    api: Arc<dyn VaultApi>,
    credentials: Arc<dyn CredentialStore>,
    confirm: Arc<dyn Confirmation>,
    monitor: Arc<StatusMonitor>,
    catalog: SecretsCatalog,
    default_ttl: String,
}

impl VaultSession {
    pub fn new(
        api: Arc<dyn VaultApi>,
        credentials: Arc<dyn CredentialStore>,
        confirm: Arc<dyn Confirmation>,
        options: SessionOptions,
    ) -> Self {
        let monitor = StatusMonitor::new(api.clone(), credentials.clone(), options.poll_interval);
        let catalog = SecretsCatalog::new(api.clone(), options.catalog_prefix);
        Self {
            api,
            credentials,
            confirm,
            monitor,
            catalog,
            default_ttl: options.default_token_ttl,
        }
    }

    /// Current phase, from the last applied status and the live credential.
    pub fn phase(&self) -> AccessPhase {
        derive_phase(self.monitor.snapshot().status, self.credentials.is_present())
    }

    pub fn snapshot(&self) -> MonitorSnapshot {
        self.monitor.snapshot()
    }

    pub fn monitor(&self) -> &Arc<StatusMonitor> {
        &self.monitor
    }

    pub fn catalog(&self) -> &SecretsCatalog {
        &self.catalog
    }

    pub fn has_credential(&self) -> bool {
        self.credentials.is_present()
    }

    /// Fetches the status now and returns the resulting phase.
    pub async fn refresh(&self) -> Result<AccessPhase, VaultgateError> {
        self.monitor.refresh().await?;
        Ok(self.phase())
    }

    /// Starts background polling on the configured interval.
    pub fn start_monitor(&self) {
        self.monitor.start();
    }

    pub async fn stop_monitor(&self) {
        self.monitor.shutdown().await;
    }

    pub async fn health(&self) -> Result<HealthStatus, VaultgateError> {
        self.api.health().await
    }

    /// Initializes the vault and stores the returned root token.
    ///
    /// The response is handed back so the caller can show both values once.
    pub async fn initialize(&self) -> Result<InitResponse, VaultgateError> {
        self.require(AccessPhase::Uninitialized)?;

        let init = self.api.initialize().await?;
        self.credentials.set(SecretString::from(
            init.root_token.expose_secret().to_string(),
        ))?;
        info!("vault initialized, root token stored");

        self.settle().await;
        Ok(init)
    }

    /// Submits an unseal key and returns the phase the remote now implies.
    pub async fn unseal(&self, key: &str) -> Result<AccessPhase, VaultgateError> {
        self.require(AccessPhase::Sealed)?;
        let key = non_empty(key, "unseal key")?;

        let response = self.api.unseal(key).await?;
        if response.sealed {
            warn!("vault still reports sealed after unseal");
        } else {
            info!("vault unsealed");
        }

        self.settle().await;
        Ok(self.phase())
    }

    /// Seals the vault after confirmation. Returns `false` if declined.
    pub async fn seal(&mut self) -> Result<bool, VaultgateError> {
        self.require(AccessPhase::Authenticated)?;
        if !self
            .confirm
            .confirm("Seal the vault? Secrets stay unavailable until it is unsealed again.")
        {
            debug!("seal declined");
            return Ok(false);
        }

        self.api.seal().await?;
        self.catalog.clear();
        info!("vault sealed");

        self.settle().await;
        Ok(true)
    }

    /// Stores `token` and verifies it against the remote.
    ///
    /// A held credential is superseded, so an expired token can be replaced
    /// without logging out first. If verification fails the store is
    /// cleared rather than restored, so a rejected login never leaves the
    /// session authenticated with either token.
    pub async fn login(&self, token: &str) -> Result<AccessPhase, VaultgateError> {
        let actual = self.phase();
        if !matches!(
            actual,
            AccessPhase::Unauthenticated | AccessPhase::Authenticated
        ) {
            return Err(VaultgateError::PhaseGate {
                required: AccessPhase::Unauthenticated,
                actual,
            });
        }
        let token = non_empty(token, "token")?;

        self.credentials.set(SecretString::from(token.to_string()))?;
        if let Err(e) = self.probe().await {
            self.credentials.clear()?;
            self.settle().await;
            warn!(error = %e, "login rejected, credential cleared");
            return Err(rejected(e));
        }

        info!("login accepted");
        self.settle().await;
        Ok(self.phase())
    }

    /// Forgets the credential and the catalog.
    pub async fn logout(&mut self) -> Result<AccessPhase, VaultgateError> {
        self.credentials.clear()?;
        self.catalog.clear();
        info!("logged out");

        self.settle().await;
        Ok(self.phase())
    }

    /// Re-checks the held credential.
    ///
    /// A credential the remote refuses is cleared and reported as
    /// [`VaultgateError::StaleCredential`]. Other failures leave it in place.
    pub async fn revalidate(&mut self) -> Result<(), VaultgateError> {
        self.require(AccessPhase::Authenticated)?;

        match self.probe().await {
            Ok(()) => Ok(()),
            Err(e) if e.is_unauthorized() => {
                self.credentials.clear()?;
                self.catalog.clear();
                self.settle().await;
                warn!(error = %e, "held credential no longer accepted");
                Err(rejected(e))
            }
            Err(e) => Err(e),
        }
    }

    /// Re-registers the held root token with a restarted server.
    pub async fn register_root_token(&self) -> Result<(), VaultgateError> {
        self.require(AccessPhase::Authenticated)?;
        self.api.authenticate_root().await?;
        info!("root token registered");
        Ok(())
    }

    /// Mints a new token, using the configured TTL when none is given.
    pub async fn create_token(&self, ttl: Option<&str>) -> Result<SecretString, VaultgateError> {
        self.require(AccessPhase::Authenticated)?;
        let ttl = non_empty(ttl.unwrap_or(self.default_ttl.as_str()), "token TTL")?;

        let token = self.api.create_token(ttl).await?;
        info!(ttl, "token created");
        Ok(token)
    }

    pub async fn list_secrets(&mut self) -> Result<&[String], VaultgateError> {
        self.require(AccessPhase::Authenticated)?;
        self.catalog.list().await
    }

    pub async fn select_secret(&mut self, path: &str) -> Result<&SecretEntry, VaultgateError> {
        self.require(AccessPhase::Authenticated)?;
        self.catalog.select(path).await
    }

    pub async fn write_secret(
        &mut self,
        path: &str,
        data: SecretData,
    ) -> Result<(), VaultgateError> {
        self.require(AccessPhase::Authenticated)?;
        self.catalog.write(path, data).await
    }

    /// Deletes `path` after confirmation. Returns `false` if declined.
    pub async fn remove_secret(&mut self, path: &str) -> Result<bool, VaultgateError> {
        self.require(AccessPhase::Authenticated)?;
        if !self.confirm.confirm(&format!("Delete secret `{path}`?")) {
            debug!(path, "delete declined");
            return Ok(false);
        }
        self.catalog.remove(path).await?;
        Ok(true)
    }

    fn require(&self, required: AccessPhase) -> Result<(), VaultgateError> {
        let actual = self.phase();
        if actual != required {
            return Err(VaultgateError::PhaseGate { required, actual });
        }
        Ok(())
    }

    /// Status plus a listing, both of which need an accepted credential
    /// on an unsealed vault.
    async fn probe(&self) -> Result<(), VaultgateError> {
        self.api.status().await?;
        self.api.list_secrets(self.catalog.prefix()).await?;
        Ok(())
    }

    /// Authoritative re-fetch after a mutation. Failure keeps the last
    /// applied status and marks the snapshot unreachable.
    async fn settle(&self) {
        if let Err(e) = self.monitor.refresh().await {
            warn!(error = %e, "status refresh after mutation failed");
        }
    }
}

fn non_empty<'a>(value: &'a str, what: &str) -> Result<&'a str, VaultgateError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(VaultgateError::Validation(format!("{what} must not be empty")));
    }
    Ok(trimmed)
}

fn rejected(e: VaultgateError) -> VaultgateError {
    if e.is_unauthorized() {
        VaultgateError::StaleCredential(e.to_string())
    } else {
        e
    }
}
