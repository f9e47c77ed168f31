// SPDX-FileCopyrightText: 2026 Vaultgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Interactive input: hidden values and confirmations.

use std::io::{BufRead, IsTerminal};

use dialoguer::Confirm;
use secrecy::SecretString;
use tracing::debug;
use vaultgate_core::{Confirmation, VaultgateError};

/// Environment variable consulted by `login` before prompting.
pub const VAULT_TOKEN_ENV_VAR: &str = "VAULT_TOKEN";

/// Confirmation through a terminal yes/no prompt, defaulting to no.
///
/// Without a terminal every prompt is declined; pass `--yes` instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalConfirm;

impl Confirmation for TerminalConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        match Confirm::new().with_prompt(prompt).default(false).interact() {
            Ok(answer) => answer,
            Err(e) => {
                debug!(error = %e, "confirmation prompt unavailable, declining");
                false
            }
        }
    }
}

/// Reads a value without echoing it.
///
/// On a terminal the operator is prompted with `label`; otherwise one line
/// is read from stdin so values can be piped in.
pub fn read_hidden(label: &str) -> Result<SecretString, VaultgateError> {
    let value = if std::io::stdin().is_terminal() {
        eprint!("{label}: ");
        rpassword::read_password()
            .map_err(|e| VaultgateError::Validation(format!("failed to read {label}: {e}")))?
    } else {
        let mut line = String::new();
        std::io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| VaultgateError::Validation(format!("failed to read {label}: {e}")))?;
        line.trim_end_matches(['\r', '\n']).to_string()
    };

    if value.trim().is_empty() {
        return Err(VaultgateError::Validation(format!("{label} must not be empty")));
    }
    Ok(SecretString::from(value))
}

/// Token for `login`: the argument, else `VAULT_TOKEN`, else a hidden prompt.
pub fn login_token(arg: Option<String>) -> Result<SecretString, VaultgateError> {
    if let Some(token) = arg {
        return Ok(SecretString::from(token));
    }
    if let Ok(token) = std::env::var(VAULT_TOKEN_ENV_VAR)
        && !token.trim().is_empty()
    {
        debug!("using token from {VAULT_TOKEN_ENV_VAR}");
        return Ok(SecretString::from(token));
    }
    read_hidden("Token")
}
