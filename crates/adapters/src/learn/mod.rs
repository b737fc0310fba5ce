// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Learning-store ("mulch") adapter.
//!
//! The watchdog records structured failure entries when it terminates
//! an agent. Recording is fire-and-forget: callers log and swallow the
//! error, and a lost entry costs nothing but hindsight.

mod mulch;

pub use mulch::MulchLearn;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeLearn;

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// Errors from learning-store operations
#[derive(Debug, Error)]
pub enum LearnError {
    #[error("record failed: {0}")]
    RecordFailed(String),
}

/// A structured failure entry.
#[derive(Debug, Clone, PartialEq)]
pub struct FailureEntry {
    /// Entry type, e.g. "agent-failure".
    pub kind: String,
    pub description: String,
    pub tags: Vec<String>,
    /// Ticket id that evidences the failure, if any.
    pub evidence_bead: Option<String>,
}

/// Adapter for the external learning store.
#[async_trait]
pub trait LearnAdapter: Clone + Send + Sync + 'static {
    async fn record(
        &self,
        project_root: &Path,
        domain: &str,
        entry: &FailureEntry,
    ) -> Result<(), LearnError>;
}
