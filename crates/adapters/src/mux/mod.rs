// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal-multiplexer adapters

mod tmux;

pub use tmux::TmuxMux;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeMux, MuxCall};

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// Errors from multiplexer operations
#[derive(Debug, Error)]
pub enum MuxError {
    #[error("session not found: {0}")]
    NotFound(String),
    #[error("spawn failed: {0}")]
    SpawnFailed(String),
    #[error("command failed: {0}")]
    CommandFailed(String),
}

/// Adapter for the terminal multiplexer hosting agent processes.
///
/// Every operation must be idempotent and safe to invoke on a dead
/// session; the watchdog probes and kills based on recorded handles
/// that may no longer exist.
#[async_trait]
pub trait MuxAdapter: Clone + Send + Sync + 'static {
    /// Create a detached session running `command` in `cwd`; returns
    /// the pane pid when the multiplexer reports one.
    async fn create_session(
        &self,
        name: &str,
        cwd: &Path,
        command: &str,
        env: &[(String, String)],
    ) -> Result<Option<u32>, MuxError>;

    /// Whether the session currently exists.
    async fn is_alive(&self, name: &str) -> Result<bool, MuxError>;

    /// Best-effort kill of the session and its process tree.
    async fn kill_session(&self, name: &str) -> Result<(), MuxError>;

    /// Send keystrokes to the session.
    ///
    /// The coordination core deliberately avoids this for attention
    /// signals (see the nudge channel); it exists for the spawn path
    /// and operator tooling.
    async fn send_keys(&self, name: &str, keys: &str) -> Result<(), MuxError>;
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
