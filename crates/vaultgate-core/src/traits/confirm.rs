// SPDX-FileCopyrightText: 2026 Vaultgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User confirmation capability supplied by the presentation layer.

/// Asks the operator to approve a destructive action.
pub trait Confirmation: Send + Sync {
    /// Returns `true` when the operator approves `prompt`.
    fn confirm(&self, prompt: &str) -> bool;
}

/// Approves everything. Used for `--yes` and in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl Confirmation for AlwaysConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Declines everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverConfirm;

impl Confirmation for NeverConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        false
    }
}
