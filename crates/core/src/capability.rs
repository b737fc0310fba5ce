// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent capabilities and group addressing.
//!
//! A capability is the role an agent plays in the hierarchy. It decides
//! which message templates apply, whether the agent counts toward run
//! completion, and whether the long-poll mail wait wakes on a pending
//! nudge.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when parsing an unknown capability string.
#[derive(Debug, Error)]
#[error("unknown capability: {0}")]
pub struct CapabilityParseError(pub String);

/// The role an agent plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Scout,
    Builder,
    Reviewer,
    Lead,
    Merger,
    Coordinator,
    Supervisor,
    Monitor,
}

impl Capability {
    /// Persistent capabilities never count toward run completion:
    /// they outlive the runs they coordinate.
    pub fn is_persistent(&self) -> bool {
        matches!(self, Capability::Coordinator | Capability::Monitor)
    }

    /// Dispatch-coordinating roles wake from the long-poll mail wait
    /// when a pending nudge appears; other roles wait on actual mail.
    pub fn wakes_on_nudge(&self) -> bool {
        matches!(self, Capability::Coordinator | Capability::Lead)
    }

    /// Worker capabilities are addressable via `@workers`.
    pub fn is_worker(&self) -> bool {
        !matches!(
            self,
            Capability::Coordinator | Capability::Supervisor | Capability::Monitor
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Scout => "scout",
            Capability::Builder => "builder",
            Capability::Reviewer => "reviewer",
            Capability::Lead => "lead",
            Capability::Merger => "merger",
            Capability::Coordinator => "coordinator",
            Capability::Supervisor => "supervisor",
            Capability::Monitor => "monitor",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = CapabilityParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scout" => Ok(Capability::Scout),
            "builder" => Ok(Capability::Builder),
            "reviewer" => Ok(Capability::Reviewer),
            "lead" => Ok(Capability::Lead),
            "merger" => Ok(Capability::Merger),
            "coordinator" => Ok(Capability::Coordinator),
            "supervisor" => Ok(Capability::Supervisor),
            "monitor" => Ok(Capability::Monitor),
            other => Err(CapabilityParseError(other.to_string())),
        }
    }
}

/// A group address of the form `@<group>`.
///
/// Group addresses are resolved against the active session set at send
/// time and are never persisted; see the mail broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupAddress {
    /// Every active session except the sender.
    All,
    /// Every active worker-capability session except the sender.
    Workers,
    /// Every active session of one capability except the sender.
    Capability(Capability),
}

impl GroupAddress {
    /// Parse a group address. Returns `None` for anything that is not
    /// a recognized `@<group>` form (callers treat those as direct
    /// recipients or validation errors as appropriate).
    pub fn parse(addr: &str) -> Option<Self> {
        let group = addr.strip_prefix('@')?;
        match group {
            "all" => Some(GroupAddress::All),
            "workers" => Some(GroupAddress::Workers),
            other => other.parse::<Capability>().ok().map(GroupAddress::Capability),
        }
    }

    /// Whether a session of the given capability belongs to this group.
    pub fn includes(&self, capability: Capability) -> bool {
        match self {
            GroupAddress::All => true,
            GroupAddress::Workers => capability.is_worker(),
            GroupAddress::Capability(c) => *c == capability,
        }
    }
}

#[cfg(test)]
#[path = "capability_tests.rs"]
mod tests;
