// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only structured event log.
//!
//! One JSON object per line. The core only ever appends; readers (CLI
//! `events tail`, the dashboard) scan the file. Corrupt lines are
//! skipped on read so a torn tail write cannot hide earlier history.

use crate::lock::StoreLock;
use crate::paths::StateLayout;
use crate::StorageError;
use ovs_core::StructuredEvent;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use tracing::warn;

/// Append-only log of [`StructuredEvent`] rows.
#[derive(Debug, Clone)]
pub struct EventsStore {
    path: PathBuf,
    lock_dir: PathBuf,
}

impl EventsStore {
    pub fn open(layout: &StateLayout) -> Result<Self, StorageError> {
        fs::create_dir_all(layout.root())?;
        Ok(Self {
            path: layout.events_path(),
            lock_dir: layout.root().to_path_buf(),
        })
    }

    /// Append one event, stamping `created_at`.
    pub fn append(&self, mut event: StructuredEvent, now_ms: u64) -> Result<(), StorageError> {
        event.created_at = now_ms;
        let line = serde_json::to_string(&event)?;
        let _lock = StoreLock::acquire(&self.lock_dir)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")?;
        file.sync_all()?;
        Ok(())
    }

    /// Every parseable event, in append order.
    pub fn read_all(&self) -> Result<Vec<StructuredEvent>, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut events = Vec::new();
        for line in content.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str(trimmed) {
                Ok(event) => events.push(event),
                Err(e) => warn!(path = %self.path.display(), error = %e, "corrupt event line, skipping"),
            }
        }
        Ok(events)
    }

    /// The most recent `n` events.
    pub fn tail(&self, n: usize) -> Result<Vec<StructuredEvent>, StorageError> {
        let mut events = self.read_all()?;
        let skip = events.len().saturating_sub(n);
        Ok(events.split_off(skip))
    }
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
