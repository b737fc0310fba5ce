// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `bd` subprocess tracker adapter

use super::TrackerAdapter;
use crate::subprocess::{run_with_timeout, TRACKER_TIMEOUT};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tokio::process::Command;
use tracing::warn;

/// Directory the tracker keeps its state in; probed before invoking
/// `bd` so projects without beads skip the subprocess entirely.
const BEADS_DIR: &str = ".beads";

#[derive(Debug, Deserialize)]
struct BeadRow {
    id: String,
    status: String,
}

/// Tracker adapter shelling out to `bd`.
#[derive(Clone, Default)]
pub struct BeadsTracker;

impl BeadsTracker {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TrackerAdapter for BeadsTracker {
    async fn closed_ids(&self, project_root: &Path, ids: &[String]) -> HashSet<String> {
        if ids.is_empty() {
            return HashSet::new();
        }
        if !project_root.join(BEADS_DIR).is_dir() {
            return HashSet::new();
        }

        let csv = ids.join(",");
        let mut cmd = Command::new("bd");
        cmd.current_dir(project_root)
            .args(["list", "--all", "--id", &csv, "--json"]);

        let output = match run_with_timeout(cmd, TRACKER_TIMEOUT, "bd list").await {
            Ok(o) => o,
            Err(e) => {
                warn!(error = %e, "bead status query failed");
                return HashSet::new();
            }
        };
        if !output.status.success() {
            warn!(
                code = ?output.status.code(),
                "bd list exited non-zero, treating all beads as open"
            );
            return HashSet::new();
        }

        let rows: Vec<BeadRow> = match serde_json::from_slice(&output.stdout) {
            Ok(rows) => rows,
            Err(e) => {
                warn!(error = %e, "bd list output unparseable");
                return HashSet::new();
            }
        };

        rows.into_iter()
            .filter(|r| r.status == "closed")
            .map(|r| r.id)
            .collect()
    }
}

#[cfg(test)]
#[path = "beads_tests.rs"]
mod tests;
