// SPDX-FileCopyrightText: 2026 Vaultgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client-side state machine for the Vaultgate client.
//!
//! - [`phase`] derives the access phase from status and credential presence.
//! - [`StatusMonitor`] keeps the remote status fresh and discards stale fetches.
//! - [`SecretsCatalog`] caches the secret path set and the selected entry.
//! - [`VaultSession`] gates every operation on the current phase.

pub mod catalog;
pub mod monitor;
pub mod phase;
pub mod session;

pub use catalog::SecretsCatalog;
pub use monitor::{MonitorSnapshot, StatusMonitor};
pub use phase::{capability, derive_phase, Capability};
pub use session::{SessionOptions, VaultSession};
