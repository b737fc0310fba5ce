// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Structured events emitted by the coordination core.
//!
//! Events are append-only facts for operators and the dashboard; the
//! core never reads them back to make decisions (the run-complete
//! dedup marker exists precisely so it does not have to).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Event types emitted by the watchdog and completion detector.
pub mod event_type {
    pub const BEAD_CLOSED_AUTOCOMPLETE: &str = "bead_closed_autocomplete";
    pub const RUN_COMPLETE: &str = "run_complete";
    pub const HEALTH_CHECK: &str = "health_check";
    pub const ESCALATION: &str = "escalation";
    pub const AGENT_TERMINATED: &str = "agent_terminated";
    pub const WATCHDOG_ERROR: &str = "watchdog_error";
}

/// Severity of a structured event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for EventLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EventLevel::Debug => "debug",
            EventLevel::Info => "info",
            EventLevel::Warn => "warn",
            EventLevel::Error => "error",
        };
        f.write_str(s)
    }
}

/// One structured event row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredEvent {
    #[serde(default)]
    pub run_id: Option<String>,
    pub agent_name: String,
    #[serde(default)]
    pub session_id: Option<String>,
    pub event_type: String,
    #[serde(default)]
    pub tool_name: Option<String>,
    #[serde(default)]
    pub tool_args: Option<String>,
    #[serde(default)]
    pub tool_duration_ms: Option<u64>,
    pub level: EventLevel,
    #[serde(default)]
    pub data: serde_json::Value,
    /// Stamped by the events store on append.
    #[serde(default)]
    pub created_at: u64,
}

impl StructuredEvent {
    pub fn new(
        agent_name: impl Into<String>,
        event_type: impl Into<String>,
        level: EventLevel,
    ) -> Self {
        Self {
            run_id: None,
            agent_name: agent_name.into(),
            session_id: None,
            event_type: event_type.into(),
            tool_name: None,
            tool_args: None,
            tool_duration_ms: None,
            level,
            data: serde_json::Value::Null,
            created_at: 0,
        }
    }

    pub fn with_run_id(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = Some(run_id.into());
        self
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
