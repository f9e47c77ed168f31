// SPDX-FileCopyrightText: 2026 Vaultgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the vault server API.
//!
//! Provides [`VaultClient`], which builds requests, attaches the current
//! credential as `X-Vault-Token`, and maps failures onto [`VaultgateError`].
//! Every call is attempted once; there is no retry.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use vaultgate_config::model::ClientConfig;
use vaultgate_core::{
    CredentialStore, HealthStatus, InitResponse, SecretData, SecretEntry, UnsealResponse,
    VaultApi, VaultStatus, VaultgateError, normalize_path,
};

use crate::types::{
    ApiErrorResponse, HealthResponse, ListResponse, ReadResponse, TokenCreateRequest,
    TokenCreateResponse, UnsealRequest, WriteRequest,
};

/// Header carrying the access token.
pub const TOKEN_HEADER: &str = "X-Vault-Token";

/// HTTP client for the vault server.
///
/// The credential is read from the store on every request, so a login or
/// logout is visible to the very next call.
#[derive(Clone)]
pub struct VaultClient {
    client: reqwest::Client,
    base_url: Url,
    credentials: Arc<dyn CredentialStore>,
}

impl std::fmt::Debug for VaultClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultClient")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

impl VaultClient {
    /// Creates a client for the server at `config.address`.
    pub fn new(
        config: &ClientConfig,
        credentials: Arc<dyn CredentialStore>,
    ) -> Result<Self, VaultgateError> {
        let base_url = Url::parse(config.address.trim_end_matches('/')).map_err(|e| {
            VaultgateError::Config(format!("invalid vault address `{}`: {e}", config.address))
        })?;

        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| VaultgateError::Transport {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url,
            credentials,
        })
    }

    /// Returns the server base address.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> Result<Url, VaultgateError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}{endpoint}"))
            .map_err(|e| VaultgateError::Validation(format!("invalid request path `{endpoint}`: {e}")))
    }

    /// `/v1/secret/{path}` with each path segment percent-encoded.
    fn secret_url(&self, path: &str) -> Result<Url, VaultgateError> {
        let mut url = self.url("/v1/secret")?;
        url.path_segments_mut()
            .map_err(|()| {
                VaultgateError::Config(format!(
                    "vault address `{}` cannot carry a path",
                    self.base_url
                ))
            })?
            .extend(path.split('/'));
        Ok(url)
    }

    fn token_header(&self) -> Result<Option<HeaderValue>, VaultgateError> {
        let Some(token) = self.credentials.get()? else {
            return Ok(None);
        };
        let mut value = HeaderValue::from_str(token.expose_secret()).map_err(|_| {
            VaultgateError::Validation(
                "access token contains characters not allowed in an HTTP header".to_string(),
            )
        })?;
        value.set_sensitive(true);
        Ok(Some(value))
    }

    /// Sends one request and returns the raw successful response.
    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<reqwest::Response, VaultgateError> {
        let mut request = self.client.request(method.clone(), url.clone());
        if let Some(token) = self.token_header()? {
            request = request.header(TOKEN_HEADER, token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| VaultgateError::Transport {
            message: format!("{method} {} failed: {e}", url.path()),
            source: Some(Box::new(e)),
        })?;

        let status = response.status();
        debug!(%method, path = url.path(), status = %status, "vault response received");

        if status.is_success() {
            return Ok(response);
        }
        Err(remote_error(status, response).await)
    }

    async fn send_json<B, T>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<T, VaultgateError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(method, url, body).await?;
        let bytes = response.bytes().await.map_err(|e| VaultgateError::Transport {
            message: format!("failed to read response body: {e}"),
            source: Some(Box::new(e)),
        })?;
        serde_json::from_slice(&bytes).map_err(|e| VaultgateError::Decode {
            message: e.to_string(),
            source: Some(Box::new(e)),
        })
    }

    async fn send_empty<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<(), VaultgateError> {
        self.send(method, url, body).await.map(drop)
    }
}

/// Builds a [`VaultgateError::Remote`] from a non-2xx response.
async fn remote_error(status: StatusCode, response: reqwest::Response) -> VaultgateError {
    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
        Ok(api_err) => api_err.error,
        Err(_) if !body.trim().is_empty() => body.trim().to_string(),
        Err(_) => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    };
    VaultgateError::Remote {
        status: Some(status.as_u16()),
        message,
    }
}

const NO_BODY: Option<&()> = None;

#[async_trait]
impl VaultApi for VaultClient {
    async fn health(&self) -> Result<HealthStatus, VaultgateError> {
        let resp: HealthResponse = self
            .send_json(Method::GET, self.url("/v1/sys/health")?, NO_BODY)
            .await?;
        Ok(if resp.status.eq_ignore_ascii_case("ok") {
            HealthStatus::Healthy
        } else {
            HealthStatus::Degraded(resp.status)
        })
    }

    async fn status(&self) -> Result<VaultStatus, VaultgateError> {
        self.send_json(Method::GET, self.url("/v1/sys/status")?, NO_BODY)
            .await
    }

    async fn initialize(&self) -> Result<InitResponse, VaultgateError> {
        self.send_json(Method::POST, self.url("/v1/sys/init")?, NO_BODY)
            .await
    }

    async fn unseal(&self, key: &str) -> Result<UnsealResponse, VaultgateError> {
        self.send_json(
            Method::POST,
            self.url("/v1/sys/unseal")?,
            Some(&UnsealRequest { key }),
        )
        .await
    }

    async fn seal(&self) -> Result<(), VaultgateError> {
        self.send_empty(Method::POST, self.url("/v1/sys/seal")?, NO_BODY)
            .await
    }

    async fn list_secrets(&self, prefix: &str) -> Result<Vec<String>, VaultgateError> {
        let mut url = self.url("/v1/secrets/list")?;
        url.query_pairs_mut().append_pair("prefix", prefix);
        let resp: ListResponse = self.send_json(Method::GET, url, NO_BODY).await?;
        Ok(resp.into_paths())
    }

    async fn read_secret(&self, path: &str) -> Result<SecretEntry, VaultgateError> {
        let path = normalize_path(path)?;
        let resp: ReadResponse = self
            .send_json(Method::GET, self.secret_url(path)?, NO_BODY)
            .await?;
        let version = resp.version.unwrap_or(1).max(1);
        Ok(SecretEntry {
            path: path.to_string(),
            data: resp.into_data(),
            version,
        })
    }

    async fn write_secret(&self, path: &str, data: &SecretData) -> Result<(), VaultgateError> {
        let path = normalize_path(path)?;
        self.send_empty(
            Method::POST,
            self.secret_url(path)?,
            Some(&WriteRequest { data }),
        )
        .await
    }

    async fn delete_secret(&self, path: &str) -> Result<(), VaultgateError> {
        let path = normalize_path(path)?;
        self.send_empty(
            Method::DELETE,
            self.secret_url(path)?,
            NO_BODY,
        )
        .await
    }

    async fn create_token(&self, ttl: &str) -> Result<SecretString, VaultgateError> {
        let resp: TokenCreateResponse = self
            .send_json(
                Method::POST,
                self.url("/v1/auth/token/create")?,
                Some(&TokenCreateRequest { ttl }),
            )
            .await?;
        Ok(SecretString::from(resp.token))
    }

    async fn authenticate_root(&self) -> Result<(), VaultgateError> {
        self.send_empty(
            Method::POST,
            self.url("/v1/auth/token/authenticate")?,
            NO_BODY,
        )
        .await
    }
}
