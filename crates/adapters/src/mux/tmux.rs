// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tmux multiplexer adapter

use super::{MuxAdapter, MuxError};
use crate::subprocess::{run_with_timeout, TMUX_TIMEOUT};
use async_trait::async_trait;
use ovs_core::sanitize_name;
use std::path::Path;
use tokio::process::Command;

/// Tmux-based multiplexer adapter
#[derive(Clone, Default)]
pub struct TmuxMux;

impl TmuxMux {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MuxAdapter for TmuxMux {
    async fn create_session(
        &self,
        name: &str,
        cwd: &Path,
        command: &str,
        env: &[(String, String)],
    ) -> Result<Option<u32>, MuxError> {
        // Precondition: cwd must exist
        if !cwd.exists() {
            return Err(MuxError::SpawnFailed(format!(
                "working directory does not exist: {}",
                cwd.display()
            )));
        }

        let target = sanitize_name(name);

        let mut cmd = Command::new("tmux");
        cmd.arg("new-session")
            .arg("-d")
            .arg("-s")
            .arg(&target)
            .arg("-c")
            .arg(cwd)
            .arg("-P")
            .arg("-F")
            .arg("#{pane_pid}");

        // Spawning from inside a tmux client would nest sessions;
        // strip the inherited handles so the child starts clean.
        cmd.env_remove("TMUX").env_remove("TMUX_PANE");

        for (key, value) in env {
            cmd.arg("-e").arg(format!("{}={}", key, value));
        }

        cmd.arg(command);

        let output = run_with_timeout(cmd, TMUX_TIMEOUT, "tmux new-session")
            .await
            .map_err(MuxError::SpawnFailed)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::error!(session = %target, stderr = %stderr, "tmux spawn failed");
            return Err(MuxError::SpawnFailed(stderr.to_string()));
        }

        let pid = String::from_utf8_lossy(&output.stdout)
            .trim()
            .parse::<u32>()
            .ok();
        Ok(pid)
    }

    async fn is_alive(&self, name: &str) -> Result<bool, MuxError> {
        let mut cmd = Command::new("tmux");
        cmd.args(["has-session", "-t", &sanitize_name(name)]);
        let output = run_with_timeout(cmd, TMUX_TIMEOUT, "tmux has-session")
            .await
            .map_err(MuxError::CommandFailed)?;
        Ok(output.status.success())
    }

    async fn kill_session(&self, name: &str) -> Result<(), MuxError> {
        let target = sanitize_name(name);

        // Terminate the pane's process tree first; kill-session alone
        // orphans grandchildren that detached from the pane pid.
        let mut panes = Command::new("tmux");
        panes.args(["list-panes", "-t", &target, "-F", "#{pane_pid}"]);
        if let Ok(output) = run_with_timeout(panes, TMUX_TIMEOUT, "tmux list-panes").await {
            if output.status.success() {
                for pid in String::from_utf8_lossy(&output.stdout)
                    .lines()
                    .filter_map(|l| l.trim().parse::<u32>().ok())
                {
                    let mut kill = Command::new("kill");
                    kill.args(["-TERM", &format!("-{pid}")]);
                    let _ = run_with_timeout(kill, TMUX_TIMEOUT, "kill process group").await;
                }
            }
        }

        let mut cmd = Command::new("tmux");
        cmd.args(["kill-session", "-t", &target]);
        let output = run_with_timeout(cmd, TMUX_TIMEOUT, "tmux kill-session")
            .await
            .map_err(MuxError::CommandFailed)?;

        if !output.status.success() {
            // Session might already be dead, which is fine
        }

        Ok(())
    }

    async fn send_keys(&self, name: &str, keys: &str) -> Result<(), MuxError> {
        let mut cmd = Command::new("tmux");
        cmd.args(["send-keys", "-t", &sanitize_name(name), "-l", "--", keys]);
        let output = run_with_timeout(cmd, TMUX_TIMEOUT, "tmux send-keys")
            .await
            .map_err(MuxError::CommandFailed)?;

        if !output.status.success() {
            return Err(MuxError::NotFound(name.to_string()));
        }
        Ok(())
    }
}
