// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Progressive escalation ladder.
//!
//! Stalled sessions climb a four-step ladder driven by elapsed time
//! since the stall was first detected, not by tick count, so a slow or
//! restarted watchdog lands on the same rung a healthy one would.
//!
//! | level | action |
//! |---|---|
//! | 0 | warn (structured event only) |
//! | 1 | force a low-priority status-report mail |
//! | 2 | AI triage, when enabled |
//! | 3 | terminate |

use ovs_core::format_age_ms;

/// Highest ladder level; reaching it terminates the session.
pub const MAX_LEVEL: u8 = 3;

/// What a ladder level means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LadderStep {
    Warn,
    Nudge,
    Triage,
    Terminate,
}

impl LadderStep {
    pub fn for_level(level: u8) -> Self {
        match level {
            0 => LadderStep::Warn,
            1 => LadderStep::Nudge,
            2 => LadderStep::Triage,
            _ => LadderStep::Terminate,
        }
    }
}

/// The level a session should be at: one rung per elapsed nudge
/// interval since the stall began, capped at [`MAX_LEVEL`].
pub fn expected_level(now_ms: u64, stalled_since_ms: u64, nudge_interval_ms: u64) -> u8 {
    let interval = nudge_interval_ms.max(1);
    let rungs = now_ms.saturating_sub(stalled_since_ms) / interval;
    rungs.min(u64::from(MAX_LEVEL)) as u8
}

/// Body of the level-1 status-report mail.
pub fn report_request_body(agent: &str, age_ms: u64) -> String {
    format!(
        "No activity observed from {agent} for {}. Reply with a status \
         update, or send worker_done mail if your task is finished.",
        format_age_ms(age_ms)
    )
}

/// Subject of the first-stall courtesy nudge pointing at unread mail.
pub fn unread_mail_subject(unread: usize, agent: &str) -> String {
    let plural = if unread == 1 { "message" } else { "messages" };
    format!("{unread} unread {plural} waiting; check your inbox: ovs mail check {agent}")
}

#[cfg(test)]
#[path = "escalation_tests.rs"]
mod tests;
