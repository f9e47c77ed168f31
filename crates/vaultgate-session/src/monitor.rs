// SPDX-FileCopyrightText: 2026 Vaultgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Background status monitor.
//!
//! [`StatusMonitor`] fetches `GET /v1/sys/status` on demand and, once
//! started, on a fixed interval. Every fetch carries a sequence number taken
//! when the request is issued; a response is applied only if no later-issued
//! response has been applied already, so an older fetch that resolves last
//! never overwrites a newer one.
//!
//! Snapshots are published through a [`tokio::sync::watch`] channel. The
//! polling task holds only a weak reference to the monitor and is cancelled
//! by [`StatusMonitor::stop`] or when the monitor is dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use vaultgate_core::{AccessPhase, CredentialStore, VaultApi, VaultStatus, VaultgateError};

use crate::phase::derive_phase;

/// The most recently applied status fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorSnapshot {
    /// Last status the remote reported. `None` until a fetch succeeds.
    pub status: Option<VaultStatus>,
    /// Whether a credential was held when this snapshot was applied.
    pub credential_present: bool,
    /// Set when the latest applied fetch failed; the status is then stale.
    pub unreachable: Option<String>,
    /// Sequence number of the fetch that produced this snapshot.
    pub applied_seq: u64,
    /// When `status` was last confirmed by the remote.
    pub fetched_at: Option<DateTime<Utc>>,
}

impl MonitorSnapshot {
    /// Phase as of this snapshot.
    pub fn phase(&self) -> AccessPhase {
        derive_phase(self.status, self.credential_present)
    }

    pub fn is_unreachable(&self) -> bool {
        self.unreachable.is_some()
    }
}

struct Poller {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Keeps the latest remote status fresh.
pub struct StatusMonitor {
    api: Arc<dyn VaultApi>,
    credentials: Arc<dyn CredentialStore>,
    interval: Duration,
    snapshot: watch::Sender<MonitorSnapshot>,
    next_seq: AtomicU64,
    poller: Mutex<Option<Poller>>,
}

impl StatusMonitor {
    pub fn new(
        api: Arc<dyn VaultApi>,
        credentials: Arc<dyn CredentialStore>,
        interval: Duration,
    ) -> Arc<Self> {
        let (snapshot, _) = watch::channel(MonitorSnapshot::default());
        Arc::new(Self {
            api,
            credentials,
            interval,
            snapshot,
            next_seq: AtomicU64::new(0),
            poller: Mutex::new(None),
        })
    }

    /// Issues one status fetch and applies it unless a newer one landed first.
    ///
    /// The caller always receives its own fetch's outcome, even when that
    /// outcome was discarded as stale.
    pub async fn refresh(&self) -> Result<VaultStatus, VaultgateError> {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.api.status().await;
        let credential_present = self.credentials.is_present();

        let applied = self.snapshot.send_if_modified(|snap| {
            if seq <= snap.applied_seq {
                return false;
            }
            snap.applied_seq = seq;
            snap.credential_present = credential_present;
            match &result {
                Ok(status) => {
                    snap.status = Some(*status);
                    snap.unreachable = None;
                    snap.fetched_at = Some(Utc::now());
                }
                Err(e) => snap.unreachable = Some(e.to_string()),
            }
            true
        });

        if !applied {
            debug!(seq, "discarding status fetch overtaken by a newer one");
        }
        result
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> MonitorSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Receiver notified whenever a fetch is applied.
    pub fn subscribe(&self) -> watch::Receiver<MonitorSnapshot> {
        self.snapshot.subscribe()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.poller.lock().map(|p| p.is_some()).unwrap_or(false)
    }

    /// Starts periodic polling. The first fetch is issued immediately.
    ///
    /// Calling `start` on a running monitor does nothing.
    pub fn start(self: &Arc<Self>) {
        let Ok(mut poller) = self.poller.lock() else {
            warn!("status monitor lock poisoned; polling not started");
            return;
        };
        if poller.is_some() {
            return;
        }

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(poll_loop(
            Arc::downgrade(self),
            self.interval,
            cancel.clone(),
        ));
        info!(interval_secs = self.interval.as_secs(), "status monitor started");
        *poller = Some(Poller { cancel, handle });
    }

    /// Stops periodic polling. An in-flight fetch may still land.
    pub fn stop(&self) {
        let taken = self.poller.lock().ok().and_then(|mut p| p.take());
        if let Some(poller) = taken {
            poller.cancel.cancel();
            debug!("status monitor stopped");
        }
    }

    /// Stops polling and waits for the polling task to exit.
    pub async fn shutdown(&self) {
        let taken = self.poller.lock().ok().and_then(|mut p| p.take());
        if let Some(poller) = taken {
            poller.cancel.cancel();
            if let Err(e) = poller.handle.await {
                warn!(error = %e, "status poller task ended abnormally");
            }
        }
    }
}

impl Drop for StatusMonitor {
    fn drop(&mut self) {
        if let Ok(poller) = self.poller.get_mut()
            && let Some(poller) = poller.take()
        {
            poller.cancel.cancel();
        }
    }
}

async fn poll_loop(monitor: Weak<StatusMonitor>, period: Duration, cancel: CancellationToken) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                let Some(monitor) = monitor.upgrade() else { break };
                if let Err(e) = monitor.refresh().await {
                    warn!(error = %e, "status poll failed");
                }
            }
        }
    }
    debug!("status poller exited");
}

#[cfg(test)]
mod tests {
    use super::*;
    use vaultgate_credentials::MemoryCredentialStore;
    use vaultgate_test_utils::MockVault;

    fn monitor_for(vault: &Arc<MockVault>, creds: Arc<MemoryCredentialStore>) -> Arc<StatusMonitor> {
        StatusMonitor::new(vault.clone(), creds, Duration::from_secs(10))
    }

    #[tokio::test]
    async fn refresh_applies_status() {
        let creds = Arc::new(MemoryCredentialStore::new());
        let vault = Arc::new(MockVault::new(creds.clone()));
        let monitor = monitor_for(&vault, creds);

        assert_eq!(monitor.snapshot().phase(), AccessPhase::Uninitialized);
        let status = monitor.refresh().await.unwrap();
        assert!(!status.initialized);

        let snap = monitor.snapshot();
        assert_eq!(snap.applied_seq, 1);
        assert_eq!(snap.status, Some(status));
        assert!(snap.fetched_at.is_some());
        assert!(!snap.is_unreachable());
    }

    #[tokio::test]
    async fn failed_refresh_keeps_last_status() {
        let creds = Arc::new(MemoryCredentialStore::new());
        let vault = Arc::new(MockVault::initialized_unsealed(creds.clone()));
        let monitor = monitor_for(&vault, creds);

        monitor.refresh().await.unwrap();
        vault.set_unreachable(true);
        assert!(monitor.refresh().await.is_err());

        let snap = monitor.snapshot();
        assert_eq!(snap.applied_seq, 2);
        assert!(snap.is_unreachable());
        assert_eq!(
            snap.status,
            Some(VaultStatus {
                initialized: true,
                sealed: false
            })
        );

        vault.set_unreachable(false);
        monitor.refresh().await.unwrap();
        assert!(!monitor.snapshot().is_unreachable());
    }

    #[tokio::test]
    async fn older_fetch_resolving_last_is_discarded() {
        let creds = Arc::new(MemoryCredentialStore::new());
        let vault = Arc::new(MockVault::initialized_unsealed(creds.clone()));
        let monitor = monitor_for(&vault, creds);

        // The first fetch is held back until the second has been applied.
        let gate = vault.hold_next_status();
        let slow = {
            let monitor = monitor.clone();
            tokio::spawn(async move { monitor.refresh().await })
        };
        tokio::task::yield_now().await;

        vault.set_sealed(true);
        monitor.refresh().await.unwrap();
        assert_eq!(monitor.snapshot().applied_seq, 2);

        vault.set_sealed(false);
        gate.release();
        let stale = slow.await.unwrap().unwrap();
        assert!(!stale.sealed);

        let snap = monitor.snapshot();
        assert_eq!(snap.applied_seq, 2);
        assert_eq!(snap.phase(), AccessPhase::Sealed);
    }

    #[tokio::test]
    async fn subscribers_see_applied_snapshots() {
        let creds = Arc::new(MemoryCredentialStore::with_token("rt1"));
        let vault = Arc::new(MockVault::initialized_unsealed(creds.clone()));
        let monitor = monitor_for(&vault, creds);
        let mut rx = monitor.subscribe();

        monitor.refresh().await.unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().phase(), AccessPhase::Authenticated);
    }

    #[tokio::test(start_paused = true)]
    async fn polling_fetches_on_interval_until_stopped() {
        let creds = Arc::new(MemoryCredentialStore::new());
        let vault = Arc::new(MockVault::new(creds.clone()));
        let monitor = monitor_for(&vault, creds);

        monitor.start();
        monitor.start();
        assert!(monitor.is_running());

        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(vault.status_calls(), 1);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(vault.status_calls(), 2);

        monitor.shutdown().await;
        assert!(!monitor.is_running());

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(vault.status_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_monitor_ends_polling() {
        let creds = Arc::new(MemoryCredentialStore::new());
        let vault = Arc::new(MockVault::new(creds.clone()));
        let monitor = monitor_for(&vault, creds);

        monitor.start();
        tokio::time::sleep(Duration::from_millis(1)).await;
        drop(monitor);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(vault.status_calls(), 1);
    }
}
