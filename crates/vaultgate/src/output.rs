// SPDX-FileCopyrightText: 2026 Vaultgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal output helpers.
//!
//! Commands print through [`Output`] so `--json` and `--plain` behave the
//! same everywhere. Human output goes to stdout, errors and warnings to stderr.

use std::io::IsTerminal;

use colored::Colorize;
use serde::Serialize;
use vaultgate_core::VaultgateError;

#[derive(Debug, Clone, Copy)]
pub struct Output {
    json: bool,
    color: bool,
}

impl Output {
    pub fn new(json: bool, plain: bool) -> Self {
        Self {
            json,
            color: !plain && std::io::stdout().is_terminal(),
        }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    pub fn use_color(&self) -> bool {
        self.color
    }

    pub fn success(&self, msg: &str) {
        if self.color {
            println!("{} {msg}", "✓".green().bold());
        } else {
            println!("[OK] {msg}");
        }
    }

    pub fn info(&self, msg: &str) {
        if self.color {
            println!("{} {msg}", "ℹ".blue().bold());
        } else {
            println!("{msg}");
        }
    }

    pub fn warning(&self, msg: &str) {
        if self.color {
            eprintln!("{} {msg}", "⚠".yellow().bold());
        } else {
            eprintln!("warning: {msg}");
        }
    }

    pub fn error(&self, msg: &str) {
        if self.color {
            eprintln!("{} {msg}", "✗".red().bold());
        } else {
            eprintln!("error: {msg}");
        }
    }

    /// A dimmed follow-up hint. Suppressed in JSON mode.
    pub fn tip(&self, msg: &str) {
        if self.json {
            return;
        }
        if self.color {
            println!("{} {}", "→".dimmed(), msg.dimmed());
        } else {
            println!("-> {msg}");
        }
    }

    /// Prints `value` as pretty JSON on stdout.
    pub fn json<T: Serialize>(&self, value: &T) -> Result<(), VaultgateError> {
        let rendered = serde_json::to_string_pretty(value)
            .map_err(|e| VaultgateError::Internal(format!("failed to render JSON: {e}")))?;
        println!("{rendered}");
        Ok(())
    }

    /// A labelled value, with the value highlighted when color is on.
    pub fn field(&self, label: &str, value: &str) {
        if self.color {
            println!("  {:<12} {}", format!("{label}:"), value.bold());
        } else {
            println!("  {:<12} {value}", format!("{label}:"));
        }
    }
}
