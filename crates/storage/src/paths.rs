// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! State directory layout.
//!
//! Directory and file names under the state root are contractual: the
//! dashboard and external tooling read them directly. The root itself
//! defaults to `<project>/.overstory` and can be overridden with
//! `OVERSTORY_STATE_DIR`.

use std::path::{Path, PathBuf};

/// Environment variable overriding the state root.
pub const STATE_DIR_ENV: &str = "OVERSTORY_STATE_DIR";

/// Resolved locations of every store under one state root.
#[derive(Debug, Clone)]
pub struct StateLayout {
    root: PathBuf,
}

impl StateLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve the layout for a project: the `OVERSTORY_STATE_DIR`
    /// override if set and non-empty, else `<project>/.overstory`.
    pub fn discover(project_root: &Path) -> Self {
        match std::env::var(STATE_DIR_ENV) {
            Ok(dir) if !dir.trim().is_empty() => Self::new(dir.trim()),
            _ => Self::new(project_root.join(".overstory")),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn sessions_dir(&self) -> PathBuf {
        self.root.join("sessions")
    }

    pub fn mail_dir(&self) -> PathBuf {
        self.root.join("mail")
    }

    pub fn merge_queue_dir(&self) -> PathBuf {
        self.root.join("merge-queue")
    }

    pub fn pending_nudges_dir(&self) -> PathBuf {
        self.root.join("pending-nudges")
    }

    pub fn events_path(&self) -> PathBuf {
        self.root.join("events.jsonl")
    }

    pub fn metrics_path(&self) -> PathBuf {
        self.root.join("metrics.jsonl")
    }

    pub fn mail_check_state_path(&self) -> PathBuf {
        self.root.join("mail-check-state.json")
    }

    pub fn current_run_path(&self) -> PathBuf {
        self.root.join("current-run")
    }

    pub fn run_complete_marker_path(&self) -> PathBuf {
        self.root.join("run-complete-notified")
    }

    pub fn daemon_pid_path(&self) -> PathBuf {
        self.root.join("daemon.pid")
    }

    pub fn daemon_log_path(&self) -> PathBuf {
        self.root.join("daemon.log")
    }
}

#[cfg(test)]
#[path = "paths_tests.rs"]
mod tests;
