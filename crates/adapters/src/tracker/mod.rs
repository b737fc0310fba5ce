// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Issue-tracker ("beads") adapter.
//!
//! The watchdog batches one status lookup per tick for every session
//! carrying a ticket id. The adapter is fail-open by contract: any
//! subprocess failure, parse error, or timeout yields the empty set,
//! and the next tick retries naturally.

mod beads;

pub use beads::BeadsTracker;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeTracker;

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::Path;

/// Adapter for the external issue tracker.
#[async_trait]
pub trait TrackerAdapter: Clone + Send + Sync + 'static {
    /// Which of `ids` are currently closed. Fail-open: errors inside
    /// the adapter surface as an empty set.
    async fn closed_ids(&self, project_root: &Path, ids: &[String]) -> HashSet<String>;
}
