// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake multiplexer adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{MuxAdapter, MuxError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Recorded multiplexer call
#[derive(Debug, Clone, PartialEq)]
pub enum MuxCall {
    CreateSession {
        name: String,
        cwd: PathBuf,
        command: String,
        env: Vec<(String, String)>,
    },
    IsAlive {
        name: String,
    },
    KillSession {
        name: String,
    },
    SendKeys {
        name: String,
        keys: String,
    },
}

#[derive(Debug, Clone)]
struct FakeSessionRow {
    alive: bool,
    pid: Option<u32>,
}

struct FakeMuxState {
    sessions: HashMap<String, FakeSessionRow>,
    calls: Vec<MuxCall>,
    /// When set, liveness probes fail with this error message.
    probe_error: Option<String>,
    next_pid: u32,
}

/// Fake multiplexer adapter for testing
#[derive(Clone)]
pub struct FakeMux {
    inner: Arc<Mutex<FakeMuxState>>,
}

impl Default for FakeMux {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeMuxState {
                sessions: HashMap::new(),
                calls: Vec::new(),
                probe_error: None,
                next_pid: 1000,
            })),
        }
    }
}

impl FakeMux {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<MuxCall> {
        self.inner.lock().calls.clone()
    }

    /// Names of sessions probed for liveness, in call order.
    pub fn probed_sessions(&self) -> Vec<String> {
        self.inner
            .lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                MuxCall::IsAlive { name } => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    /// Names of sessions that were killed.
    pub fn killed_sessions(&self) -> Vec<String> {
        self.inner
            .lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                MuxCall::KillSession { name } => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    /// Add a pre-existing session with scripted liveness.
    pub fn add_session(&self, name: &str, alive: bool) {
        self.inner
            .lock()
            .sessions
            .insert(name.to_string(), FakeSessionRow { alive, pid: None });
    }

    /// Flip a session's liveness.
    pub fn set_alive(&self, name: &str, alive: bool) {
        if let Some(row) = self.inner.lock().sessions.get_mut(name) {
            row.alive = alive;
        }
    }

    /// Make every liveness probe fail with `message`.
    pub fn fail_probes(&self, message: &str) {
        self.inner.lock().probe_error = Some(message.to_string());
    }
}

#[async_trait]
impl MuxAdapter for FakeMux {
    async fn create_session(
        &self,
        name: &str,
        cwd: &Path,
        command: &str,
        env: &[(String, String)],
    ) -> Result<Option<u32>, MuxError> {
        let mut inner = self.inner.lock();
        inner.calls.push(MuxCall::CreateSession {
            name: name.to_string(),
            cwd: cwd.to_path_buf(),
            command: command.to_string(),
            env: env.to_vec(),
        });
        inner.next_pid += 1;
        let pid = inner.next_pid;
        inner.sessions.insert(
            name.to_string(),
            FakeSessionRow {
                alive: true,
                pid: Some(pid),
            },
        );
        Ok(Some(pid))
    }

    async fn is_alive(&self, name: &str) -> Result<bool, MuxError> {
        let mut inner = self.inner.lock();
        inner.calls.push(MuxCall::IsAlive {
            name: name.to_string(),
        });
        if let Some(message) = &inner.probe_error {
            return Err(MuxError::CommandFailed(message.clone()));
        }
        Ok(inner.sessions.get(name).map(|s| s.alive).unwrap_or(false))
    }

    async fn kill_session(&self, name: &str) -> Result<(), MuxError> {
        let mut inner = self.inner.lock();
        inner.calls.push(MuxCall::KillSession {
            name: name.to_string(),
        });
        if let Some(row) = inner.sessions.get_mut(name) {
            row.alive = false;
            row.pid = None;
        }
        Ok(())
    }

    async fn send_keys(&self, name: &str, keys: &str) -> Result<(), MuxError> {
        let mut inner = self.inner.lock();
        inner.calls.push(MuxCall::SendKeys {
            name: name.to_string(),
            keys: keys.to_string(),
        });
        if !inner.sessions.contains_key(name) {
            return Err(MuxError::NotFound(name.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
