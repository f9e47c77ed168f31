// SPDX-FileCopyrightText: 2026 Vaultgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Seams between the orchestration layer and its collaborators.
//!
//! The remote API uses `#[async_trait]` for dynamic dispatch; the credential
//! store and the confirmation capability are synchronous.

pub mod api;
pub mod confirm;
pub mod credential;

pub use api::VaultApi;
pub use confirm::{AlwaysConfirm, Confirmation, NeverConfirm};
pub use credential::CredentialStore;
