// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Merge-queue store.
//!
//! Entries are written by the merger path and read by the dashboard;
//! the coordination core only guarantees the store exists with atomic
//! per-entry updates.

use crate::kv::KvDir;
use crate::lock::StoreLock;
use crate::paths::StateLayout;
use crate::StorageError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Lifecycle of a queued branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeStatus {
    Queued,
    Merging,
    Merged,
    Failed,
}

/// One branch awaiting merge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeEntry {
    pub id: String,
    pub branch: String,
    pub agent_name: String,
    pub status: MergeStatus,
    /// Conflict-resolution tier the merge resolved at.
    #[serde(default)]
    pub tier: u8,
    pub created_at: u64,
    pub updated_at: u64,
}

/// Keyed store of [`MergeEntry`] rows.
#[derive(Debug, Clone)]
pub struct MergeQueueStore {
    kv: KvDir,
    dir: PathBuf,
}

impl MergeQueueStore {
    pub fn open(layout: &StateLayout) -> Result<Self, StorageError> {
        let dir = layout.merge_queue_dir();
        Ok(Self {
            kv: KvDir::open(&dir)?,
            dir,
        })
    }

    pub fn put(&self, entry: &MergeEntry) -> Result<(), StorageError> {
        let _lock = StoreLock::acquire(&self.dir)?;
        self.kv.put(&entry.id, entry)
    }

    pub fn get(&self, id: &str) -> Result<Option<MergeEntry>, StorageError> {
        self.kv.get(id)
    }

    /// Every entry, oldest first.
    pub fn list(&self) -> Result<Vec<MergeEntry>, StorageError> {
        let mut entries: Vec<MergeEntry> = self.kv.read_all()?;
        entries.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(entries)
    }

    pub fn update_status(
        &self,
        id: &str,
        status: MergeStatus,
        tier: u8,
        now_ms: u64,
    ) -> Result<(), StorageError> {
        let _lock = StoreLock::acquire(&self.dir)?;
        let mut entry: MergeEntry = self
            .kv
            .get(id)?
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;
        entry.status = status;
        entry.tier = tier;
        entry.updated_at = now_ms;
        self.kv.put(id, &entry)
    }
}

#[cfg(test)]
#[path = "merge_queue_tests.rs"]
mod tests;
