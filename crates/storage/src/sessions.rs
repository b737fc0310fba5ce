// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable session store.
//!
//! One row per agent, keyed by `agent_name`. Single-row updates are
//! atomic and serialized through the store lock; readers see either
//! the old or the new row. The terminal-state invariant (completed and
//! zombie rows carry no escalation bookkeeping) is enforced here so no
//! caller can violate it.

use crate::kv::KvDir;
use crate::lock::StoreLock;
use crate::paths::StateLayout;
use crate::StorageError;
use ovs_core::{AgentSession, SessionState};
use std::path::PathBuf;

/// Keyed store of [`AgentSession`] rows.
#[derive(Debug, Clone)]
pub struct SessionStore {
    kv: KvDir,
    dir: PathBuf,
}

impl SessionStore {
    pub fn open(layout: &StateLayout) -> Result<Self, StorageError> {
        let dir = layout.sessions_dir();
        Ok(Self {
            kv: KvDir::open(&dir)?,
            dir,
        })
    }

    /// Insert or replace by `agent_name`.
    pub fn upsert(&self, session: &AgentSession) -> Result<(), StorageError> {
        let _lock = StoreLock::acquire(&self.dir)?;
        self.kv.put(&session.agent_name, session)
    }

    pub fn get_by_name(&self, name: &str) -> Result<Option<AgentSession>, StorageError> {
        self.kv.get(name)
    }

    /// Every session, ordered by agent name for stable output.
    pub fn get_all(&self) -> Result<Vec<AgentSession>, StorageError> {
        let mut sessions: Vec<AgentSession> = self.kv.read_all()?;
        sessions.sort_by(|a, b| a.agent_name.cmp(&b.agent_name));
        Ok(sessions)
    }

    pub fn get_by_run(&self, run_id: &str) -> Result<Vec<AgentSession>, StorageError> {
        let mut sessions = self.get_all()?;
        sessions.retain(|s| s.run_id.as_deref() == Some(run_id));
        Ok(sessions)
    }

    /// Sessions in a non-terminal state (booting, working, stalled).
    pub fn get_active(&self) -> Result<Vec<AgentSession>, StorageError> {
        let mut sessions = self.get_all()?;
        sessions.retain(|s| s.state.is_active());
        Ok(sessions)
    }

    /// Set the lifecycle state. Transitions into a terminal state also
    /// clear `escalation_level` and `stalled_since`.
    pub fn update_state(&self, name: &str, state: SessionState) -> Result<(), StorageError> {
        self.mutate(name, |s| {
            if state.is_terminal() {
                s.enter_terminal(state);
            } else {
                s.state = state;
            }
        })
    }

    /// Touch the activity timestamp without changing state.
    pub fn update_last_activity(&self, name: &str, now_ms: u64) -> Result<(), StorageError> {
        self.mutate(name, |s| s.last_activity = now_ms)
    }

    /// Observable activity heartbeat: touch the timestamp and promote
    /// booting/stalled sessions back to working.
    pub fn record_activity(&self, name: &str, now_ms: u64) -> Result<(), StorageError> {
        self.mutate(name, |s| s.record_activity(now_ms))
    }

    /// Persist the escalation ladder position.
    pub fn update_escalation(
        &self,
        name: &str,
        level: u8,
        stalled_since: Option<u64>,
    ) -> Result<(), StorageError> {
        self.mutate(name, |s| {
            s.escalation_level = level;
            s.stalled_since = stalled_since;
        })
    }

    fn mutate(
        &self,
        name: &str,
        apply: impl FnOnce(&mut AgentSession),
    ) -> Result<(), StorageError> {
        let _lock = StoreLock::acquire(&self.dir)?;
        let mut session: AgentSession = self
            .kv
            .get(name)?
            .ok_or_else(|| StorageError::NotFound(name.to_string()))?;
        apply(&mut session);
        self.kv.put(name, &session)
    }
}

#[cfg(test)]
#[path = "sessions_tests.rs"]
mod tests;
