// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subprocess triage adapter

use super::{TriageAdapter, TriageRequest, TriageVerdict};
use crate::subprocess::{run_with_timeout, TRIAGE_TIMEOUT};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::warn;

/// Default triage helper binary.
const TRIAGE_BIN: &str = "overstory-triage";

/// Triage adapter shelling out to a helper command.
///
/// The helper receives the agent name and last-activity timestamp and
/// prints exactly one of `retry`, `terminate`, or `extend` on stdout.
#[derive(Clone)]
pub struct CommandTriage {
    bin: String,
}

impl CommandTriage {
    pub fn new() -> Self {
        Self {
            bin: TRIAGE_BIN.to_string(),
        }
    }

    pub fn with_bin(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }
}

impl Default for CommandTriage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TriageAdapter for CommandTriage {
    async fn assess(&self, request: &TriageRequest) -> TriageVerdict {
        let mut cmd = Command::new(&self.bin);
        cmd.current_dir(&request.project_root)
            .args(["--agent", &request.agent_name])
            .args(["--last-activity", &request.last_activity.to_string()]);

        let output = match run_with_timeout(cmd, TRIAGE_TIMEOUT, "triage").await {
            Ok(o) => o,
            Err(e) => {
                warn!(agent = %request.agent_name, error = %e, "triage failed, extending");
                return TriageVerdict::Extend;
            }
        };
        if !output.status.success() {
            warn!(
                agent = %request.agent_name,
                code = ?output.status.code(),
                "triage exited non-zero, extending"
            );
            return TriageVerdict::Extend;
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        match stdout.parse() {
            Ok(verdict) => verdict,
            Err(()) => {
                warn!(agent = %request.agent_name, verdict = %stdout.trim(), "unknown triage verdict, extending");
                TriageVerdict::Extend
            }
        }
    }
}
