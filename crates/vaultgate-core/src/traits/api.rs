// SPDX-FileCopyrightText: 2026 Vaultgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remote vault API trait.

use async_trait::async_trait;
use secrecy::SecretString;

use crate::error::VaultgateError;
use crate::types::{HealthStatus, InitResponse, SecretData, SecretEntry, UnsealResponse, VaultStatus};

/// The remote secrets service, one method per endpoint.
///
/// Implementations attach the current credential when one is held and make
/// exactly one attempt per call. Retrying is the caller's decision.
#[async_trait]
pub trait VaultApi: Send + Sync {
    /// `GET /v1/sys/health`
    async fn health(&self) -> Result<HealthStatus, VaultgateError>;

    /// `GET /v1/sys/status`
    async fn status(&self) -> Result<VaultStatus, VaultgateError>;

    /// `POST /v1/sys/init`
    async fn initialize(&self) -> Result<InitResponse, VaultgateError>;

    /// `POST /v1/sys/unseal`
    async fn unseal(&self, key: &str) -> Result<UnsealResponse, VaultgateError>;

    /// `POST /v1/sys/seal`
    async fn seal(&self) -> Result<(), VaultgateError>;

    /// `GET /v1/secrets/list?prefix=`, in server order.
    async fn list_secrets(&self, prefix: &str) -> Result<Vec<String>, VaultgateError>;

    /// `GET /v1/secret/{path}`
    async fn read_secret(&self, path: &str) -> Result<SecretEntry, VaultgateError>;

    /// `POST /v1/secret/{path}`
    async fn write_secret(&self, path: &str, data: &SecretData) -> Result<(), VaultgateError>;

    /// `DELETE /v1/secret/{path}`
    async fn delete_secret(&self, path: &str) -> Result<(), VaultgateError>;

    /// `POST /v1/auth/token/create`
    async fn create_token(&self, ttl: &str) -> Result<SecretString, VaultgateError>;

    /// `POST /v1/auth/token/authenticate`: re-registers the held root token
    /// with a server that has restarted since initialization.
    async fn authenticate_root(&self) -> Result<(), VaultgateError>;
}
