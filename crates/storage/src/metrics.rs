// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Terminated-session metrics.
//!
//! One JSONL row per session that reached a terminal state, with
//! timing and (when the agent reported them) token/cost totals. The
//! watchdog appends fire-and-forget; nothing in the core reads these
//! back.

use crate::lock::StoreLock;
use crate::paths::StateLayout;
use crate::StorageError;
use ovs_core::Capability;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use tracing::warn;

/// One terminated session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsRow {
    pub agent_name: String,
    pub capability: Capability,
    #[serde(default)]
    pub run_id: Option<String>,
    /// Terminal state reached: "completed" or "zombie".
    pub outcome: String,
    pub started_at: u64,
    pub ended_at: u64,
    pub duration_ms: u64,
    #[serde(default)]
    pub total_tokens: Option<u64>,
    #[serde(default)]
    pub total_cost_usd: Option<f64>,
}

/// Append-only metrics log.
#[derive(Debug, Clone)]
pub struct MetricsStore {
    path: PathBuf,
    lock_dir: PathBuf,
}

impl MetricsStore {
    pub fn open(layout: &StateLayout) -> Result<Self, StorageError> {
        fs::create_dir_all(layout.root())?;
        Ok(Self {
            path: layout.metrics_path(),
            lock_dir: layout.root().to_path_buf(),
        })
    }

    pub fn append(&self, row: &MetricsRow) -> Result<(), StorageError> {
        let line = serde_json::to_string(row)?;
        let _lock = StoreLock::acquire(&self.lock_dir)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")?;
        file.sync_all()?;
        Ok(())
    }

    pub fn read_all(&self) -> Result<Vec<MetricsRow>, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut rows = Vec::new();
        for line in content.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str(trimmed) {
                Ok(row) => rows.push(row),
                Err(e) => warn!(path = %self.path.display(), error = %e, "corrupt metrics line, skipping"),
            }
        }
        Ok(rows)
    }
}

#[cfg(test)]
#[path = "metrics_tests.rs"]
mod tests;
