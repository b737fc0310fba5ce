// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent session record and lifecycle states.
//!
//! An [`AgentSession`] is the durable record of one spawned agent: its
//! identity, worktree, terminal handle, and lifecycle state. The
//! session store persists these keyed by `agent_name`; the watchdog
//! reconciles them against observable reality every tick.

use crate::capability::Capability;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Lifecycle state of an agent session.
///
/// `Completed` and `Zombie` are terminal: nothing transitions out of
/// them except a deliberate reset on reassignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// Spawned but no activity observed yet.
    Booting,
    Working,
    Completed,
    /// Alive but quiet past the stale threshold.
    Stalled,
    /// The underlying process died or was killed.
    Zombie,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Completed | SessionState::Zombie)
    }

    /// Active is the complement of terminal: booting, working, or
    /// stalled. This is the same set the watchdog escalates over.
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Booting => "booting",
            SessionState::Working => "working",
            SessionState::Completed => "completed",
            SessionState::Stalled => "stalled",
            SessionState::Zombie => "zombie",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Durable record of a spawned agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSession {
    pub id: String,
    /// Unique across all sessions; the store key.
    pub agent_name: String,
    pub capability: Capability,
    pub worktree_path: PathBuf,
    pub branch_name: String,
    /// External ticket id; empty when the agent has no ticket.
    #[serde(default)]
    pub bead_id: String,
    /// Opaque terminal-multiplexer session handle.
    pub tmux_session: String,
    pub state: SessionState,
    #[serde(default)]
    pub pid: Option<u32>,
    /// Name of the spawning agent; `None` at the top of the hierarchy.
    #[serde(default)]
    pub parent_agent: Option<String>,
    #[serde(default)]
    pub depth: u32,
    /// Groups sessions belonging to one batch of work.
    #[serde(default)]
    pub run_id: Option<String>,
    pub started_at: u64,
    pub last_activity: u64,
    #[serde(default)]
    pub escalation_level: u8,
    #[serde(default)]
    pub stalled_since: Option<u64>,
}

impl AgentSession {
    /// Create a freshly-spawned session in `Booting` state.
    pub fn new(
        id: impl Into<String>,
        agent_name: impl Into<String>,
        capability: Capability,
        now_ms: u64,
    ) -> Self {
        Self {
            id: id.into(),
            agent_name: agent_name.into(),
            capability,
            worktree_path: PathBuf::new(),
            branch_name: String::new(),
            bead_id: String::new(),
            tmux_session: String::new(),
            state: SessionState::Booting,
            pid: None,
            parent_agent: None,
            depth: 0,
            run_id: None,
            started_at: now_ms,
            last_activity: now_ms,
            escalation_level: 0,
            stalled_since: None,
        }
    }

    /// Observable activity from the agent: refresh `last_activity` and
    /// promote booting/stalled sessions back to working.
    pub fn record_activity(&mut self, now_ms: u64) {
        self.last_activity = now_ms;
        if matches!(self.state, SessionState::Booting | SessionState::Stalled) {
            self.state = SessionState::Working;
            self.reset_escalation();
        }
    }

    /// Move into a terminal state, clearing escalation bookkeeping.
    ///
    /// Escalation level and stalled-since only carry meaning for live,
    /// unhealthy sessions; terminal transitions always reset them.
    pub fn enter_terminal(&mut self, state: SessionState) {
        debug_assert!(state.is_terminal());
        self.state = state;
        self.reset_escalation();
    }

    pub fn reset_escalation(&mut self) {
        self.escalation_level = 0;
        self.stalled_since = None;
    }

    /// Milliseconds since the last observed activity.
    pub fn activity_age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.last_activity)
    }

    pub fn has_bead(&self) -> bool {
        !self.bead_id.is_empty()
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
