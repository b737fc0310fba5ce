// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Health evaluation: reconcile a recorded session against observable
//! reality.
//!
//! The terminal-liveness observation is ground truth. A dead terminal
//! terminates the session no matter what the row says; a live terminal
//! under a `zombie` row is surfaced for investigation but never
//! auto-resurrected. Live sessions are judged by activity age against
//! the stale/zombie thresholds, and everything past stale is handed to
//! the escalation ladder rather than killed outright.

use crate::EngineError;
use ovs_core::{AgentSession, SessionState};

/// Stale/zombie activity-age thresholds. `zombie_ms` must exceed
/// `stale_ms`.
#[derive(Debug, Clone, Copy)]
pub struct HealthThresholds {
    pub stale_ms: u64,
    pub zombie_ms: u64,
}

impl HealthThresholds {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.zombie_ms <= self.stale_ms {
            return Err(EngineError::InvalidThresholds(format!(
                "zombie_ms ({}) must be greater than stale_ms ({})",
                self.zombie_ms, self.stale_ms
            )));
        }
        Ok(())
    }
}

/// What the watchdog should do about one session this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthAction {
    None,
    /// Hand to the escalation ladder.
    Escalate,
    /// The underlying process is gone; kill and record.
    Terminate,
    /// Recorded state conflicts with reality; surface, do not act.
    Investigate,
}

/// Evaluation result: the action, the state the session should be in,
/// and a note when the row disagreed with observation.
#[derive(Debug, Clone)]
pub struct HealthCheck {
    pub action: HealthAction,
    pub new_state: SessionState,
    pub note: Option<String>,
}

/// Evaluate one non-completed session.
pub fn evaluate(
    session: &AgentSession,
    terminal_alive: bool,
    now_ms: u64,
    thresholds: &HealthThresholds,
) -> HealthCheck {
    let age = session.activity_age_ms(now_ms);

    if !terminal_alive {
        if session.state == SessionState::Zombie {
            // Already recorded dead; nothing to reconcile
            return HealthCheck {
                action: HealthAction::None,
                new_state: SessionState::Zombie,
                note: None,
            };
        }
        return HealthCheck {
            action: HealthAction::Terminate,
            new_state: SessionState::Zombie,
            note: Some(format!(
                "terminal session {} missing while recorded {}",
                session.tmux_session, session.state
            )),
        };
    }

    if session.state == SessionState::Zombie {
        return HealthCheck {
            action: HealthAction::Investigate,
            new_state: SessionState::Zombie,
            note: Some(format!(
                "terminal session {} alive but recorded zombie",
                session.tmux_session
            )),
        };
    }

    if age >= thresholds.zombie_ms {
        // Deep stall: the ladder decides termination, not the health check
        return HealthCheck {
            action: HealthAction::Escalate,
            new_state: session.state,
            note: None,
        };
    }

    if age >= thresholds.stale_ms {
        let new_state = match session.state {
            SessionState::Booting | SessionState::Working => SessionState::Stalled,
            other => other,
        };
        return HealthCheck {
            action: HealthAction::Escalate,
            new_state,
            note: None,
        };
    }

    // Fresh activity: healthy, and booting/stalled recover to working
    HealthCheck {
        action: HealthAction::None,
        new_state: SessionState::Working,
        note: None,
    }
}

#[cfg(test)]
#[path = "health_tests.rs"]
mod tests;
