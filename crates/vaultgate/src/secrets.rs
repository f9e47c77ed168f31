// SPDX-FileCopyrightText: 2026 Vaultgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `vaultgate list`, `read`, `write` and `delete`.

use vaultgate_core::{SecretData, SecretEntry, VaultgateError};
use vaultgate_session::VaultSession;

use crate::output::Output;

/// Parses `KEY=VALUE` arguments. The value may itself contain `=`.
pub fn parse_pairs(pairs: &[String]) -> Result<SecretData, VaultgateError> {
    let mut data = SecretData::new();
    for pair in pairs {
        let Some((key, value)) = pair.split_once('=') else {
            return Err(VaultgateError::Validation(format!(
                "expected KEY=VALUE, got `{pair}`"
            )));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(VaultgateError::Validation(format!(
                "missing key in `{pair}`"
            )));
        }
        data.insert(key.to_string(), value.to_string());
    }
    Ok(data)
}

pub async fn run_list(session: &mut VaultSession, out: &Output) -> Result<(), VaultgateError> {
    let paths = session.list_secrets().await?;

    if out.is_json() {
        return out.json(&serde_json::json!({ "keys": paths }));
    }
    if paths.is_empty() {
        out.info("No secrets found.");
        out.tip("Run `vaultgate write <PATH> KEY=VALUE` to add one.");
        return Ok(());
    }
    for path in paths {
        println!("{path}");
    }
    Ok(())
}

pub async fn run_read(
    session: &mut VaultSession,
    path: &str,
    out: &Output,
) -> Result<(), VaultgateError> {
    let entry = session.select_secret(path).await?;
    if out.is_json() {
        return out.json(entry);
    }
    print_entry(entry, out);
    Ok(())
}

pub async fn run_write(
    session: &mut VaultSession,
    path: &str,
    pairs: &[String],
    out: &Output,
) -> Result<(), VaultgateError> {
    let data = parse_pairs(pairs)?;
    session.write_secret(path, data).await?;

    let Some(entry) = session.catalog().selected() else {
        return Err(VaultgateError::Internal(
            "written secret was not re-read".into(),
        ));
    };
    if out.is_json() {
        return out.json(entry);
    }
    out.success(&format!("Secret written to {}", entry.path));
    print_entry(entry, out);
    Ok(())
}

pub async fn run_delete(
    session: &mut VaultSession,
    path: &str,
    out: &Output,
) -> Result<(), VaultgateError> {
    if !session.remove_secret(path).await? {
        out.info("Cancelled.");
        return Ok(());
    }
    if out.is_json() {
        return out.json(&serde_json::json!({ "deleted": path }));
    }
    out.success(&format!("Secret {path} deleted"));
    Ok(())
}

fn print_entry(entry: &SecretEntry, out: &Output) {
    println!();
    out.field("Path", &entry.path);
    out.field("Version", &entry.version.to_string());
    println!();
    let width = entry.data.keys().map(|k| k.len()).max().unwrap_or(0);
    for (key, value) in &entry.data {
        println!("  {key:<width$}  {value}");
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn pairs_split_on_first_equals() {
        let data = parse_pairs(&args(&["user=alice", "dsn=pg://h/db?x=1"])).unwrap();
        assert_eq!(data["user"], "alice");
        assert_eq!(data["dsn"], "pg://h/db?x=1");
    }

    #[test]
    fn empty_value_is_allowed() {
        let data = parse_pairs(&args(&["flag="])).unwrap();
        assert_eq!(data["flag"], "");
    }

    #[test]
    fn malformed_pairs_are_rejected() {
        assert!(parse_pairs(&args(&["novalue"])).is_err());
        assert!(parse_pairs(&args(&["=v"])).is_err());
    }
}
