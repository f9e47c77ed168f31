// SPDX-FileCopyrightText: 2026 Vaultgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Vaultgate integration tests.
//!
//! Provides an in-memory vault server and a harness that wires a complete
//! session around it, for fast, deterministic tests without a live server.
//!
//! # Components
//!
//! - [`MockVault`] - In-memory vault with failure injection
//! - [`TestHarness`] - Session, mock vault and temp credential file
//! - [`ScriptedConfirm`] - Confirmation prompt with a fixed answer that records prompts

pub mod harness;
pub mod mock_vault;

pub use harness::{ScriptedConfirm, TestHarness};
pub use mock_vault::{MOCK_ROOT_TOKEN, MOCK_UNSEAL_KEY, MockVault, StatusGate, VaultOp};
