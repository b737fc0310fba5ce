// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Nudge delivery with a mail-check debounce window.
//!
//! A nudge never touches the recipient's terminal. Delivery means
//! writing the per-recipient marker file; the recipient surfaces it on
//! its next inbox poll. An agent that checked mail moments ago is
//! clearly paying attention, so non-forced nudges inside the debounce
//! window are skipped. The watchdog's escalation nudges pass `force`
//! to bypass the window.

use crate::EngineError;
use ovs_core::{Clock, NudgeMarker};
use ovs_storage::{MailCheckState, NudgeStore, SessionStore, StateLayout};

/// Default debounce window: skip non-forced nudges when the recipient
/// checked mail within the last 30 seconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 30_000;

/// Outcome of a delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub delivered: bool,
    pub reason: Option<String>,
}

impl Delivery {
    fn delivered() -> Self {
        Self {
            delivered: true,
            reason: None,
        }
    }

    fn skipped(reason: impl Into<String>) -> Self {
        Self {
            delivered: false,
            reason: Some(reason.into()),
        }
    }
}

/// Writes pending-nudge markers for live recipients.
#[derive(Clone)]
pub struct NudgeSender<C: Clock> {
    sessions: SessionStore,
    nudges: NudgeStore,
    checks: MailCheckState,
    clock: C,
    debounce_ms: u64,
}

impl<C: Clock> NudgeSender<C> {
    pub fn open(layout: &StateLayout, clock: C) -> Result<Self, EngineError> {
        Ok(Self {
            sessions: SessionStore::open(layout)?,
            nudges: NudgeStore::open(layout)?,
            checks: MailCheckState::open(layout)?,
            clock,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        })
    }

    pub fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    /// Write the pending-nudge marker for `recipient`, replacing any
    /// existing one. Skips unknown and terminal recipients, and (when
    /// not forced) recipients inside the debounce window.
    pub fn deliver(
        &self,
        recipient: &str,
        marker: NudgeMarker,
        force: bool,
    ) -> Result<Delivery, EngineError> {
        let Some(session) = self.sessions.get_by_name(recipient)? else {
            return Ok(Delivery::skipped("unknown agent"));
        };
        if session.state.is_terminal() {
            return Ok(Delivery::skipped(format!(
                "agent is {}",
                session.state
            )));
        }

        if !force {
            if let Some(last) = self.checks.last_checked(recipient)? {
                let age = self.clock.now_ms().saturating_sub(last);
                if age < self.debounce_ms {
                    return Ok(Delivery::skipped("debounced: recipient checked mail recently"));
                }
            }
        }

        self.nudges.write(recipient, &marker)?;
        Ok(Delivery::delivered())
    }
}

#[cfg(test)]
#[path = "nudge_tests.rs"]
mod tests;
