// SPDX-FileCopyrightText: 2026 Vaultgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `vaultgate login`, `logout`, `auth` and `token-create`.

use secrecy::ExposeSecret;
use vaultgate_core::{AccessPhase, VaultgateError};
use vaultgate_credentials::mask_token;
use vaultgate_session::VaultSession;

use crate::output::Output;
use crate::prompt::login_token;
use crate::status::next_step;

pub async fn run_login(
    session: &VaultSession,
    token: Option<String>,
    out: &Output,
) -> Result<(), VaultgateError> {
    let token = login_token(token)?;
    let phase = session.login(token.expose_secret()).await?;

    if out.is_json() {
        return out.json(&serde_json::json!({ "phase": phase }));
    }
    out.success(&format!(
        "Logged in with token {}",
        mask_token(token.expose_secret().trim())
    ));
    Ok(())
}

pub async fn run_logout(session: &mut VaultSession, out: &Output) -> Result<(), VaultgateError> {
    let phase = session.logout().await?;
    if out.is_json() {
        return out.json(&serde_json::json!({ "phase": phase }));
    }
    out.success("Credential cleared");
    out.tip(next_step(phase));
    Ok(())
}

/// Re-registers the stored root token, then re-checks it.
///
/// Needed after the server restarts, since it keeps tokens in memory.
pub async fn run_auth(session: &mut VaultSession, out: &Output) -> Result<(), VaultgateError> {
    session.register_root_token().await?;
    session.revalidate().await?;

    if out.is_json() {
        return out.json(&serde_json::json!({ "phase": AccessPhase::Authenticated }));
    }
    out.success("Root token registered with the server");
    Ok(())
}

pub async fn run_token_create(
    session: &VaultSession,
    ttl: Option<String>,
    out: &Output,
) -> Result<(), VaultgateError> {
    let token = session.create_token(ttl.as_deref()).await?;

    if out.is_json() {
        return out.json(&serde_json::json!({ "token": token.expose_secret() }));
    }
    out.success("Token created");
    out.field("Token", token.expose_secret());
    Ok(())
}
