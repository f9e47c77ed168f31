// SPDX-FileCopyrightText: 2026 Vaultgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `vaultgate init`, `vaultgate unseal` and `vaultgate seal`.

use secrecy::ExposeSecret;
use serde::Serialize;
use vaultgate_core::{AccessPhase, VaultgateError};
use vaultgate_session::VaultSession;

use crate::output::Output;
use crate::prompt::read_hidden;
use crate::status::next_step;

#[derive(Serialize)]
struct InitOutput<'a> {
    root_token: &'a str,
    unseal_key: &'a str,
    phase: AccessPhase,
}

/// Initializes the vault and shows the root token and unseal key once.
pub async fn run_init(session: &VaultSession, out: &Output) -> Result<(), VaultgateError> {
    let init = session.initialize().await?;
    let phase = session.phase();

    if out.is_json() {
        return out.json(&InitOutput {
            root_token: init.root_token.expose_secret(),
            unseal_key: init.unseal_key.expose_secret(),
            phase,
        });
    }

    out.success("Vault initialized");
    println!();
    out.field("Root token", init.root_token.expose_secret());
    out.field("Unseal key", init.unseal_key.expose_secret());
    println!();
    out.warning("Store both values safely. They will not be shown again.");
    out.info("The root token has been saved as the current credential.");
    out.tip(next_step(phase));
    Ok(())
}

/// Unseals with `key`, prompting for it when absent.
pub async fn run_unseal(
    session: &VaultSession,
    key: Option<String>,
    out: &Output,
) -> Result<(), VaultgateError> {
    let prompted;
    let key = match &key {
        Some(key) => key.as_str(),
        None => {
            prompted = read_hidden("Unseal key")?;
            prompted.expose_secret()
        }
    };
    let phase = session.unseal(key).await?;

    if out.is_json() {
        return out.json(&serde_json::json!({ "phase": phase }));
    }
    if phase == AccessPhase::Sealed {
        out.warning("Vault is still sealed.");
    } else {
        out.success("Vault unsealed");
    }
    out.tip(next_step(phase));
    Ok(())
}

/// Seals the vault once the session's confirmation approves.
pub async fn run_seal(session: &mut VaultSession, out: &Output) -> Result<(), VaultgateError> {
    if !session.seal().await? {
        out.info("Cancelled.");
        return Ok(());
    }
    if out.is_json() {
        return out.json(&serde_json::json!({ "phase": session.phase() }));
    }
    out.success("Vault sealed");
    Ok(())
}
