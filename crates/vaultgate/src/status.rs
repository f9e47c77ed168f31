// SPDX-FileCopyrightText: 2026 Vaultgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `vaultgate status`, `vaultgate health` and `vaultgate watch`.
//!
//! `status` performs one fetch and shows the derived phase. `watch` starts
//! the background monitor and prints every phase change until interrupted.

use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;
use tracing::debug;
use vaultgate_core::{AccessPhase, HealthStatus, VaultgateError};
use vaultgate_session::{Capability, MonitorSnapshot, VaultSession, capability};

use crate::output::Output;
use crate::shutdown::install_signal_handler;

/// Structured status for `--json` mode.
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub address: String,
    pub phase: AccessPhase,
    pub initialized: Option<bool>,
    pub sealed: Option<bool>,
    pub credential_present: bool,
    pub reachable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetched_at: Option<DateTime<Utc>>,
}

impl StatusReport {
    pub fn from_snapshot(address: &str, snapshot: &MonitorSnapshot, credential_present: bool) -> Self {
        Self {
            address: address.to_string(),
            phase: vaultgate_session::derive_phase(snapshot.status, credential_present),
            initialized: snapshot.status.map(|s| s.initialized),
            sealed: snapshot.status.map(|s| s.sealed),
            credential_present,
            reachable: !snapshot.is_unreachable(),
            error: snapshot.unreachable.clone(),
            fetched_at: snapshot.fetched_at,
        }
    }
}

/// What to run next, per phase.
pub fn next_step(phase: AccessPhase) -> &'static str {
    match capability(phase) {
        Capability::Initialize => "Run `vaultgate init` to initialize the vault.",
        Capability::Unseal => "Run `vaultgate unseal` with the unseal key.",
        Capability::Login => "Run `vaultgate login` with an access token.",
        Capability::ManageSecrets => "Run `vaultgate list` to browse secrets.",
    }
}

fn phase_label(phase: AccessPhase, out: &Output) -> String {
    let label = phase.to_string();
    if !out.use_color() {
        return label;
    }
    match phase {
        AccessPhase::Authenticated => label.green().to_string(),
        AccessPhase::Unauthenticated => label.yellow().to_string(),
        AccessPhase::Sealed => label.red().to_string(),
        AccessPhase::Uninitialized => label.cyan().to_string(),
    }
}

pub async fn run_status(
    session: &VaultSession,
    address: &str,
    out: &Output,
) -> Result<(), VaultgateError> {
    // A failed fetch is still reported, from the snapshot.
    if let Err(e) = session.refresh().await {
        debug!(error = %e, "status fetch failed");
    }
    let report = StatusReport::from_snapshot(address, &session.snapshot(), session.has_credential());

    if out.is_json() {
        return out.json(&report);
    }

    println!();
    println!("  vaultgate status");
    println!("  {}", "-".repeat(35));
    out.field("Address", &report.address);
    out.field("Phase", &phase_label(report.phase, out));
    if let (Some(initialized), Some(sealed)) = (report.initialized, report.sealed) {
        out.field("Initialized", &initialized.to_string());
        out.field("Sealed", &sealed.to_string());
    }
    out.field(
        "Credential",
        if report.credential_present { "held" } else { "none" },
    );
    println!();

    match &report.error {
        Some(error) => out.warning(&format!("vault unreachable: {error}")),
        None => out.tip(next_step(report.phase)),
    }
    Ok(())
}

pub async fn run_health(session: &VaultSession, out: &Output) -> Result<(), VaultgateError> {
    let health = session.health().await?;
    if out.is_json() {
        let status = match &health {
            HealthStatus::Healthy => "ok".to_string(),
            HealthStatus::Degraded(s) => s.clone(),
        };
        return out.json(&serde_json::json!({ "status": status }));
    }
    match health {
        HealthStatus::Healthy => out.success("vault is healthy"),
        HealthStatus::Degraded(status) => out.warning(&format!("vault reports `{status}`")),
    }
    Ok(())
}

/// Polls on the configured interval, printing each phase change.
pub async fn run_watch(
    session: &VaultSession,
    address: &str,
    out: &Output,
) -> Result<(), VaultgateError> {
    let cancel = install_signal_handler();
    let mut updates = session.monitor().subscribe();
    session.start_monitor();

    if !out.is_json() {
        out.info(&format!(
            "watching {address} every {}s, Ctrl+C to stop",
            session.monitor().interval().as_secs()
        ));
    }

    let mut last: Option<(AccessPhase, bool)> = None;
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                let report = StatusReport::from_snapshot(address, &snapshot, session.has_credential());
                let key = (report.phase, report.reachable);
                if last == Some(key) {
                    continue;
                }
                last = Some(key);
                print_change(&report, out)?;
            }
        }
    }

    session.stop_monitor().await;
    Ok(())
}

fn print_change(report: &StatusReport, out: &Output) -> Result<(), VaultgateError> {
    if out.is_json() {
        // One object per line for streaming consumers.
        let line = serde_json::to_string(report)
            .map_err(|e| VaultgateError::Internal(format!("failed to render JSON: {e}")))?;
        println!("{line}");
        return Ok(());
    }
    let at = Utc::now().format("%H:%M:%S");
    match &report.error {
        Some(error) => out.warning(&format!("{at} unreachable: {error}")),
        None => out.info(&format!("{at} phase {}", phase_label(report.phase, out))),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vaultgate_core::VaultStatus;

    #[test]
    fn report_from_unreachable_snapshot() {
        let snapshot = MonitorSnapshot {
            status: Some(VaultStatus {
                initialized: true,
                sealed: false,
            }),
            credential_present: true,
            unreachable: Some("transport error: connection refused".into()),
            applied_seq: 3,
            fetched_at: None,
        };
        let report = StatusReport::from_snapshot("http://127.0.0.1:8200", &snapshot, true);
        assert_eq!(report.phase, AccessPhase::Authenticated);
        assert!(!report.reachable);

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"phase\":\"authenticated\""));
        assert!(json.contains("\"reachable\":false"));
        assert!(!json.contains("fetched_at"));
    }

    #[test]
    fn report_before_first_fetch() {
        let report = StatusReport::from_snapshot("http://x", &MonitorSnapshot::default(), false);
        assert_eq!(report.phase, AccessPhase::Uninitialized);
        assert_eq!(report.initialized, None);
    }

    #[test]
    fn next_step_names_a_command() {
        assert!(next_step(AccessPhase::Sealed).contains("unseal"));
        assert!(next_step(AccessPhase::Unauthenticated).contains("login"));
    }
}
