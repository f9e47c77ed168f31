// SPDX-FileCopyrightText: 2026 Vaultgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vaultgate - a command-line client for a self-hosted secrets vault.
//!
//! This is the binary entry point. Every command builds one session over
//! the configured vault address and the durable credential file.

mod auth;
mod lifecycle;
mod output;
mod prompt;
mod secrets;
mod shutdown;
mod status;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::debug;
use vaultgate_client::VaultClient;
use vaultgate_config::VaultgateConfig;
use vaultgate_core::{AlwaysConfirm, Confirmation, CredentialStore, VaultgateError};
use vaultgate_credentials::FileCredentialStore;
use vaultgate_session::{SessionOptions, VaultSession};

use crate::output::Output;
use crate::prompt::TerminalConfirm;

/// Vaultgate - a command-line client for a self-hosted secrets vault.
#[derive(Parser, Debug)]
#[command(name = "vaultgate", version, about, long_about = None)]
struct Cli {
    /// Vault address, overriding configuration and VAULT_ADDR.
    #[arg(long, global = true, value_name = "URL")]
    address: Option<String>,

    /// Print machine-readable JSON.
    #[arg(long, global = true)]
    json: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    plain: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the vault status and the current access phase.
    Status,
    /// Check the server health endpoint.
    Health,
    /// Initialize a new vault and store its root token.
    Init,
    /// Unseal the vault. Prompts for the key when omitted.
    Unseal { key: Option<String> },
    /// Seal the vault.
    Seal {
        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },
    /// Store and verify an access token. Falls back to VAULT_TOKEN, then a prompt.
    Login { token: Option<String> },
    /// Forget the stored access token.
    Logout,
    /// Re-register the stored root token after a server restart.
    Auth,
    /// List secret paths.
    List {
        /// Only list paths starting with this prefix.
        prefix: Option<String>,
    },
    /// Read a secret.
    Read { path: String },
    /// Write a secret from KEY=VALUE pairs.
    Write {
        path: String,
        #[arg(required = true, value_name = "KEY=VALUE")]
        pairs: Vec<String>,
    },
    /// Delete a secret.
    Delete {
        path: String,
        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },
    /// Create a new access token.
    TokenCreate {
        /// Lifetime such as `1h` or `30m`. Defaults to `token.default_ttl`.
        ttl: Option<String>,
    },
    /// Poll the vault and print phase changes until interrupted.
    Watch,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut config = match vaultgate_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            vaultgate_config::render_errors(&errors);
            std::process::exit(1);
        }
    };
    if let Some(address) = &cli.address {
        config.client.address = address.clone();
    }

    init_tracing(&config.logging.level);
    debug!(address = %config.client.address, "config loaded");

    let out = Output::new(cli.json, cli.plain);
    if let Err(e) = run(cli.command, &config, &out).await {
        out.error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(command: Commands, config: &VaultgateConfig, out: &Output) -> Result<(), VaultgateError> {
    let confirm: Arc<dyn Confirmation> = match &command {
        Commands::Seal { yes: true } | Commands::Delete { yes: true, .. } => Arc::new(AlwaysConfirm),
        _ => Arc::new(TerminalConfirm),
    };
    let prefix = match &command {
        Commands::List { prefix } => prefix.clone(),
        _ => None,
    };
    let mut session = build_session(config, confirm, prefix)?;
    let address = config.client.address.as_str();

    match command {
        Commands::Status => status::run_status(&session, address, out).await,
        Commands::Health => status::run_health(&session, out).await,
        Commands::Watch => status::run_watch(&session, address, out).await,
        other => {
            // One authoritative fetch so the phase gates see the live status.
            session.refresh().await?;
            match other {
                Commands::Init => lifecycle::run_init(&session, out).await,
                Commands::Unseal { key } => lifecycle::run_unseal(&session, key, out).await,
                Commands::Seal { .. } => lifecycle::run_seal(&mut session, out).await,
                Commands::Login { token } => auth::run_login(&session, token, out).await,
                Commands::Logout => auth::run_logout(&mut session, out).await,
                Commands::Auth => auth::run_auth(&mut session, out).await,
                Commands::TokenCreate { ttl } => auth::run_token_create(&session, ttl, out).await,
                Commands::List { .. } => secrets::run_list(&mut session, out).await,
                Commands::Read { path } => secrets::run_read(&mut session, &path, out).await,
                Commands::Write { path, pairs } => {
                    secrets::run_write(&mut session, &path, &pairs, out).await
                }
                Commands::Delete { path, .. } => {
                    secrets::run_delete(&mut session, &path, out).await
                }
                Commands::Status | Commands::Health | Commands::Watch => Ok(()),
            }
        }
    }
}

/// Wires the HTTP client, the credential file and the session together.
fn build_session(
    config: &VaultgateConfig,
    confirm: Arc<dyn Confirmation>,
    prefix: Option<String>,
) -> Result<VaultSession, VaultgateError> {
    let credentials: Arc<dyn CredentialStore> =
        Arc::new(FileCredentialStore::from_config(&config.credentials));
    let client = VaultClient::new(&config.client, credentials.clone())?;

    let mut options = SessionOptions::from_config(config);
    if let Some(prefix) = prefix {
        options.catalog_prefix = prefix;
    }
    Ok(VaultSession::new(Arc::new(client), credentials, confirm, options))
}

/// Initialize tracing to stderr with `RUST_LOG` taking precedence.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("vaultgate={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
