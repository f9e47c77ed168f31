// SPDX-FileCopyrightText: 2026 Vaultgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local view of the remote secrets tree.
//!
//! The catalog holds the known path set (in the order the remote returned
//! it) and at most one selected entry. It never assumes a mutation's effect:
//! after every successful write or delete it re-lists, and after a write it
//! re-reads the written entry.

use std::sync::Arc;

use tracing::{debug, info};
use vaultgate_core::{SecretData, SecretEntry, VaultApi, VaultgateError, normalize_path};

/// Known secret paths plus the currently selected entry.
pub struct SecretsCatalog {
    api: Arc<dyn VaultApi>,
    prefix: String,
    paths: Vec<String>,
    selected: Option<SecretEntry>,
}

impl SecretsCatalog {
    pub fn new(api: Arc<dyn VaultApi>, prefix: impl Into<String>) -> Self {
        Self {
            api,
            prefix: prefix.into(),
            paths: Vec::new(),
            selected: None,
        }
    }

    /// Known paths, in remote order.
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn selected(&self) -> Option<&SecretEntry> {
        self.selected.as_ref()
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.iter().any(|p| p == path)
    }

    /// Replaces the path set with the remote's listing under `prefix`.
    ///
    /// On failure the previous path set and selection are left untouched.
    pub async fn list(&mut self) -> Result<&[String], VaultgateError> {
        let paths = self.api.list_secrets(&self.prefix).await?;
        debug!(count = paths.len(), prefix = %self.prefix, "secrets listed");
        self.paths = paths;

        if let Some(entry) = &self.selected
            && !self.contains(&entry.path)
        {
            debug!(path = %entry.path, "selected secret no longer listed");
            self.selected = None;
        }
        Ok(&self.paths)
    }

    /// Reads `path` and makes it the selected entry.
    ///
    /// A failed read leaves the previous selection in place. A path the last
    /// listing did not include is appended to the path set, so the selection
    /// is always among the known paths. Until the next [`list`](Self::list)
    /// that appended path sits out of remote order at the end.
    pub async fn select(&mut self, path: &str) -> Result<&SecretEntry, VaultgateError> {
        let path = normalize_path(path)?;
        let entry = self.api.read_secret(path).await?;
        if !self.contains(&entry.path) {
            self.paths.push(entry.path.clone());
        }
        Ok(self.selected.insert(entry))
    }

    /// Writes `data` at `path`, then re-lists and re-selects the path.
    ///
    /// If the write succeeds but the follow-up fails, the error is
    /// [`VaultgateError::StaleCache`]: the remote has the new value even
    /// though the local view does not.
    pub async fn write(&mut self, path: &str, data: SecretData) -> Result<(), VaultgateError> {
        let path = normalize_path(path)?;
        check_data(&data)?;

        self.api.write_secret(path, &data).await?;
        info!(path, keys = data.len(), "secret written");

        if let Err(e) = self.list().await {
            return Err(stale("write", path, e));
        }
        if let Err(e) = self.select(path).await {
            return Err(stale("write", path, e));
        }
        Ok(())
    }

    /// Deletes `path`, then re-lists.
    ///
    /// Deleting a path the remote does not know surfaces the remote's error
    /// and leaves the catalog unchanged.
    pub async fn remove(&mut self, path: &str) -> Result<(), VaultgateError> {
        let path = normalize_path(path)?;
        self.api.delete_secret(path).await?;
        info!(path, "secret deleted");

        if self.selected.as_ref().is_some_and(|e| e.path == path) {
            self.selected = None;
        }
        match self.list().await {
            Ok(_) => Ok(()),
            Err(e) => Err(stale("delete", path, e)),
        }
    }

    /// Forgets everything. Used when access is lost.
    pub fn clear(&mut self) {
        self.paths.clear();
        self.selected = None;
    }
}

fn stale(operation: &'static str, path: &str, source: VaultgateError) -> VaultgateError {
    VaultgateError::StaleCache {
        operation,
        path: path.to_string(),
        source: Box::new(source),
    }
}

fn check_data(data: &SecretData) -> Result<(), VaultgateError> {
    if data.is_empty() {
        return Err(VaultgateError::Validation(
            "a secret needs at least one key/value pair".into(),
        ));
    }
    if data.keys().any(|k| k.trim().is_empty()) {
        return Err(VaultgateError::Validation(
            "secret keys must not be empty".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vaultgate_credentials::MemoryCredentialStore;
    use vaultgate_test_utils::{MockVault, VaultOp};

    fn data(pairs: &[(&str, &str)]) -> SecretData {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn setup() -> (Arc<MockVault>, SecretsCatalog) {
        let creds = Arc::new(MemoryCredentialStore::with_token("rt1"));
        let vault = Arc::new(MockVault::initialized_unsealed(creds));
        let catalog = SecretsCatalog::new(vault.clone(), "");
        (vault, catalog)
    }

    #[tokio::test]
    async fn list_keeps_remote_order() {
        let (vault, mut catalog) = setup();
        vault.seed_secret("b/two", data(&[("k", "v")]));
        vault.seed_secret("a/one", data(&[("k", "v")]));

        let paths = catalog.list().await.unwrap().to_vec();
        assert_eq!(paths, vec!["b/two".to_string(), "a/one".to_string()]);
    }

    #[tokio::test]
    async fn failed_list_leaves_paths_untouched() {
        let (vault, mut catalog) = setup();
        vault.seed_secret("kv/a", data(&[("k", "v")]));
        vault.seed_secret("kv/b", data(&[("k", "v")]));
        catalog.list().await.unwrap();

        vault.fail_next(VaultOp::List, 500, "storage offline");
        let err = catalog.list().await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(catalog.paths(), ["kv/a", "kv/b"]);
    }

    #[tokio::test]
    async fn write_relists_and_selects() {
        let (vault, mut catalog) = setup();
        catalog
            .write("kv/x", data(&[("user", "alice")]))
            .await
            .unwrap();

        assert_eq!(catalog.paths(), ["kv/x"]);
        let selected = catalog.selected().unwrap();
        assert_eq!(selected.path, "kv/x");
        assert_eq!(selected.data, data(&[("user", "alice")]));
        assert_eq!(selected.version, 1);
        assert_eq!(vault.secret("kv/x"), Some(data(&[("user", "alice")])));
    }

    #[tokio::test]
    async fn write_validation_makes_no_remote_call() {
        let (vault, mut catalog) = setup();

        let err = catalog.write("  ", data(&[("k", "v")])).await.unwrap_err();
        assert!(matches!(err, VaultgateError::Validation(_)));
        let err = catalog.write("kv/x", SecretData::new()).await.unwrap_err();
        assert!(matches!(err, VaultgateError::Validation(_)));
        let err = catalog
            .write("kv/x", data(&[(" ", "v")]))
            .await
            .unwrap_err();
        assert!(matches!(err, VaultgateError::Validation(_)));

        assert_eq!(vault.calls(VaultOp::Write), 0);
    }

    #[tokio::test]
    async fn write_with_failed_refresh_reports_stale_cache() {
        let (vault, mut catalog) = setup();
        vault.fail_next(VaultOp::List, 503, "busy");

        let err = catalog
            .write("kv/x", data(&[("k", "v")]))
            .await
            .unwrap_err();
        match err {
            VaultgateError::StaleCache {
                operation, path, ..
            } => {
                assert_eq!(operation, "write");
                assert_eq!(path, "kv/x");
            }
            other => panic!("expected StaleCache, got {other:?}"),
        }
        assert!(vault.secret("kv/x").is_some());
        assert!(catalog.paths().is_empty());
    }

    #[tokio::test]
    async fn remove_clears_selection_and_relists() {
        let (vault, mut catalog) = setup();
        vault.seed_secret("kv/a", data(&[("k", "v")]));
        vault.seed_secret("kv/b", data(&[("k", "v")]));
        catalog.list().await.unwrap();
        catalog.select("kv/a").await.unwrap();

        catalog.remove("kv/a").await.unwrap();
        assert!(catalog.selected().is_none());
        assert_eq!(catalog.paths(), ["kv/b"]);
    }

    #[tokio::test]
    async fn remove_absent_path_surfaces_remote_error() {
        let (vault, mut catalog) = setup();
        vault.seed_secret("kv/a", data(&[("k", "v")]));
        catalog.list().await.unwrap();

        let err = catalog.remove("kv/missing").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(catalog.paths(), ["kv/a"]);
    }

    #[tokio::test]
    async fn failed_select_keeps_previous_selection() {
        let (vault, mut catalog) = setup();
        vault.seed_secret("kv/a", data(&[("k", "v")]));
        catalog.select("kv/a").await.unwrap();

        assert!(catalog.select("kv/nope").await.is_err());
        assert_eq!(catalog.selected().unwrap().path, "kv/a");
    }

    #[tokio::test]
    async fn select_appends_unlisted_path_until_next_list() {
        let (vault, mut catalog) = setup();
        vault.seed_secret("kv/z", data(&[("k", "v")]));
        catalog.list().await.unwrap();

        // Remote order becomes kv/a, kv/z.
        vault.remove_secret("kv/z");
        vault.seed_secret("kv/a", data(&[("k", "v")]));
        vault.seed_secret("kv/z", data(&[("k", "v")]));

        catalog.select("kv/a").await.unwrap();
        assert_eq!(catalog.paths(), ["kv/z", "kv/a"]);

        catalog.list().await.unwrap();
        assert_eq!(catalog.paths(), ["kv/a", "kv/z"]);
        assert_eq!(catalog.selected().unwrap().path, "kv/a");
    }

    #[tokio::test]
    async fn relist_drops_selection_removed_elsewhere() {
        let (vault, mut catalog) = setup();
        vault.seed_secret("kv/a", data(&[("k", "v")]));
        catalog.select("kv/a").await.unwrap();

        vault.remove_secret("kv/a");
        catalog.list().await.unwrap();
        assert!(catalog.selected().is_none());
    }
}
