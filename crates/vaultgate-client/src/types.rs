// SPDX-FileCopyrightText: 2026 Vaultgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the vault server's JSON API.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use vaultgate_core::SecretData;

/// Body of every non-2xx response: `{"error": "..."}`.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: String,
}

/// `GET /v1/sys/health`
#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// `POST /v1/sys/unseal` request.
#[derive(Debug, Serialize)]
pub struct UnsealRequest<'a> {
    pub key: &'a str,
}

/// `GET /v1/secrets/list`. The server has used both field names.
#[derive(Debug, Default, Deserialize)]
pub struct ListResponse {
    #[serde(default)]
    pub keys: Option<Vec<String>>,
    #[serde(default)]
    pub secrets: Option<Vec<String>>,
}

impl ListResponse {
    /// Paths in server order; `keys` wins when both are present.
    pub fn into_paths(self) -> Vec<String> {
        self.keys.or(self.secrets).unwrap_or_default()
    }
}

/// `GET /v1/secret/{path}`
///
/// Values are arbitrary JSON on the wire; non-string values are rendered
/// with their JSON text.
#[derive(Debug, Deserialize)]
pub struct ReadResponse {
    #[serde(default)]
    pub data: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub version: Option<u64>,
}

impl ReadResponse {
    pub fn into_data(self) -> SecretData {
        self.data
            .into_iter()
            .map(|(k, v)| {
                let text = match v {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                };
                (k, text)
            })
            .collect()
    }
}

/// `POST /v1/secret/{path}` request.
#[derive(Debug, Serialize)]
pub struct WriteRequest<'a> {
    pub data: &'a SecretData,
}

/// `POST /v1/auth/token/create` request.
#[derive(Debug, Serialize)]
pub struct TokenCreateRequest<'a> {
    pub ttl: &'a str,
}

/// `POST /v1/auth/token/create` response.
#[derive(Debug, Deserialize)]
pub struct TokenCreateResponse {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_prefers_keys_then_secrets() {
        let both: ListResponse =
            serde_json::from_str(r#"{"keys":["a"],"secrets":["b"]}"#).unwrap();
        assert_eq!(both.into_paths(), vec!["a"]);

        let legacy: ListResponse = serde_json::from_str(r#"{"secrets":["b","a"]}"#).unwrap();
        assert_eq!(legacy.into_paths(), vec!["b", "a"]);

        let null: ListResponse = serde_json::from_str(r#"{"keys":null}"#).unwrap();
        assert!(null.into_paths().is_empty());
    }

    #[test]
    fn read_renders_non_string_values() {
        let resp: ReadResponse =
            serde_json::from_str(r#"{"data":{"port":5432,"host":"db","tls":true}}"#).unwrap();
        assert_eq!(resp.version, None);
        let data = resp.into_data();
        assert_eq!(data["port"], "5432");
        assert_eq!(data["host"], "db");
        assert_eq!(data["tls"], "true");
    }
}
