// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `mulch` subprocess learning-store adapter

use super::{FailureEntry, LearnAdapter, LearnError};
use crate::subprocess::{run_with_timeout, LEARN_TIMEOUT};
use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;

/// Learning-store adapter shelling out to `mulch`.
#[derive(Clone, Default)]
pub struct MulchLearn;

impl MulchLearn {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LearnAdapter for MulchLearn {
    async fn record(
        &self,
        project_root: &Path,
        domain: &str,
        entry: &FailureEntry,
    ) -> Result<(), LearnError> {
        let mut cmd = Command::new("mulch");
        cmd.current_dir(project_root)
            .args(["record", domain])
            .args(["--type", &entry.kind])
            .args(["--description", &entry.description]);
        if !entry.tags.is_empty() {
            cmd.args(["--tags", &entry.tags.join(",")]);
        }
        if let Some(bead) = &entry.evidence_bead {
            cmd.args(["--evidence", bead]);
        }

        let output = run_with_timeout(cmd, LEARN_TIMEOUT, "mulch record")
            .await
            .map_err(LearnError::RecordFailed)?;

        if !output.status.success() {
            return Err(LearnError::RecordFailed(
                String::from_utf8_lossy(&output.stderr).to_string(),
            ));
        }
        Ok(())
    }
}
