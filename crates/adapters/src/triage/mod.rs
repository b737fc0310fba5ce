// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! AI-triage adapter.
//!
//! At escalation level 2 the watchdog can hand a stalled agent to an
//! external triage collaborator, which returns a verdict: retry
//! (deliver a recovery nudge), terminate (kill now), or extend (leave
//! it alone). Unrecognized output degrades to extend so a broken
//! triage helper can never kill agents on its own.

mod command;

pub use command::CommandTriage;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeTriage;

use async_trait::async_trait;
use std::path::PathBuf;
use std::str::FromStr;

/// What triage decided about a stalled agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriageVerdict {
    /// Deliver a recovery nudge and keep watching.
    Retry,
    /// Kill the agent now.
    Terminate,
    /// Give it more time.
    Extend,
}

impl FromStr for TriageVerdict {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "retry" => Ok(TriageVerdict::Retry),
            "terminate" => Ok(TriageVerdict::Terminate),
            "extend" => Ok(TriageVerdict::Extend),
            _ => Err(()),
        }
    }
}

/// Context handed to the triage collaborator.
#[derive(Debug, Clone)]
pub struct TriageRequest {
    pub agent_name: String,
    pub project_root: PathBuf,
    /// Epoch ms of the agent's last observed activity.
    pub last_activity: u64,
}

/// Adapter for the external triage collaborator.
#[async_trait]
pub trait TriageAdapter: Clone + Send + Sync + 'static {
    /// Assess a stalled agent. Fail-open: adapter errors surface as
    /// [`TriageVerdict::Extend`].
    async fn assess(&self, request: &TriageRequest) -> TriageVerdict;
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
