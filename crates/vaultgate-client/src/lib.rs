// SPDX-FileCopyrightText: 2026 Vaultgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vault server API client for Vaultgate.
//!
//! [`VaultClient`] implements [`vaultgate_core::VaultApi`] over HTTP/JSON.

pub mod client;
pub mod types;

pub use client::{VaultClient, TOKEN_HEADER};
