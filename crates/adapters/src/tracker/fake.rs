// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake tracker adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::TrackerAdapter;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

/// Fake tracker with a scripted closed set.
#[derive(Clone, Default)]
pub struct FakeTracker {
    inner: Arc<Mutex<FakeTrackerState>>,
}

#[derive(Default)]
struct FakeTrackerState {
    closed: HashSet<String>,
    queries: Vec<Vec<String>>,
}

impl FakeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn close_bead(&self, id: &str) {
        self.inner.lock().closed.insert(id.to_string());
    }

    /// The id batches the watchdog asked about, one per tick.
    pub fn queries(&self) -> Vec<Vec<String>> {
        self.inner.lock().queries.clone()
    }
}

#[async_trait]
impl TrackerAdapter for FakeTracker {
    async fn closed_ids(&self, _project_root: &Path, ids: &[String]) -> HashSet<String> {
        let mut inner = self.inner.lock();
        inner.queries.push(ids.to_vec());
        ids.iter()
            .filter(|id| inner.closed.contains(*id))
            .cloned()
            .collect()
    }
}
