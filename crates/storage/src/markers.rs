// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Marker files: pending nudges, mail-check debounce state, and run
//! tracking.
//!
//! These are the smallest shared surfaces in the state directory:
//! single files whose whole content is rewritten on update. The nudge
//! store's take operation claims the marker by renaming it before
//! reading, so two concurrent pollers cannot both receive one nudge.

use crate::kv::KvDir;
use crate::lock::StoreLock;
use crate::paths::StateLayout;
use crate::StorageError;
use ovs_core::{sanitize_name, NudgeMarker};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tracing::warn;

/// Per-recipient pending-nudge markers.
#[derive(Debug, Clone)]
pub struct NudgeStore {
    kv: KvDir,
    dir: PathBuf,
}

impl NudgeStore {
    pub fn open(layout: &StateLayout) -> Result<Self, StorageError> {
        let dir = layout.pending_nudges_dir();
        Ok(Self {
            kv: KvDir::open(&dir)?,
            dir,
        })
    }

    /// Write the marker for a recipient, replacing any existing one.
    pub fn write(&self, recipient: &str, marker: &NudgeMarker) -> Result<(), StorageError> {
        self.kv.put(recipient, marker)
    }

    /// Read the marker without clearing it.
    pub fn peek(&self, recipient: &str) -> Result<Option<NudgeMarker>, StorageError> {
        self.kv.get(recipient)
    }

    /// Atomically claim and remove the marker. Rename-then-read means
    /// at most one concurrent caller receives it.
    pub fn take(&self, recipient: &str) -> Result<Option<NudgeMarker>, StorageError> {
        let path = self
            .dir
            .join(format!("{}.json", sanitize_name(recipient)));
        let claim = path.with_extension(format!("claim.{}", std::process::id()));
        match fs::rename(&path, &claim) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        }
        let content = fs::read_to_string(&claim)?;
        let _ = fs::remove_file(&claim);
        match serde_json::from_str(&content) {
            Ok(marker) => Ok(Some(marker)),
            Err(e) => {
                warn!(recipient, error = %e, "corrupt nudge marker, dropping");
                Ok(None)
            }
        }
    }
}

/// Mapping from agent name to last mail-check epoch millis, rewritten
/// in full on every update.
#[derive(Debug, Clone)]
pub struct MailCheckState {
    path: PathBuf,
    lock_dir: PathBuf,
}

impl MailCheckState {
    pub fn open(layout: &StateLayout) -> Result<Self, StorageError> {
        fs::create_dir_all(layout.root())?;
        Ok(Self {
            path: layout.mail_check_state_path(),
            lock_dir: layout.root().to_path_buf(),
        })
    }

    pub fn load(&self) -> Result<HashMap<String, u64>, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str(&content) {
            Ok(map) => Ok(map),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "corrupt mail-check state, resetting");
                Ok(HashMap::new())
            }
        }
    }

    pub fn last_checked(&self, agent: &str) -> Result<Option<u64>, StorageError> {
        Ok(self.load()?.get(agent).copied())
    }

    /// Record that `agent` checked mail at `now_ms`.
    pub fn stamp(&self, agent: &str, now_ms: u64) -> Result<(), StorageError> {
        let _lock = StoreLock::acquire(&self.lock_dir)?;
        let mut map = self.load()?;
        map.insert(agent.to_string(), now_ms);
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec(&map)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Pointer to the active run id.
#[derive(Debug, Clone)]
pub struct CurrentRun {
    path: PathBuf,
}

impl CurrentRun {
    pub fn open(layout: &StateLayout) -> Result<Self, StorageError> {
        fs::create_dir_all(layout.root())?;
        Ok(Self {
            path: layout.current_run_path(),
        })
    }

    /// The active run id, or `None` when the file is absent or empty.
    pub fn read(&self) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                let trimmed = content.trim();
                if trimmed.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(trimmed.to_string()))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn write(&self, run_id: &str) -> Result<(), StorageError> {
        fs::write(&self.path, run_id)?;
        Ok(())
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// The last run id whose completion notification already fired.
#[derive(Debug, Clone)]
pub struct RunCompleteMarker {
    path: PathBuf,
}

impl RunCompleteMarker {
    pub fn open(layout: &StateLayout) -> Result<Self, StorageError> {
        fs::create_dir_all(layout.root())?;
        Ok(Self {
            path: layout.run_complete_marker_path(),
        })
    }

    pub fn read(&self) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                let trimmed = content.trim();
                if trimmed.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(trimmed.to_string()))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn write(&self, run_id: &str) -> Result<(), StorageError> {
        fs::write(&self.path, run_id)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "markers_tests.rs"]
mod tests;
