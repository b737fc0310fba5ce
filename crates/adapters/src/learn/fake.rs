// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake learning-store adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{FailureEntry, LearnAdapter, LearnError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;

/// Fake learning store that records entries in memory.
#[derive(Clone, Default)]
pub struct FakeLearn {
    inner: Arc<Mutex<FakeLearnState>>,
}

#[derive(Default)]
struct FakeLearnState {
    records: Vec<(String, FailureEntry)>,
    fail: bool,
}

impl FakeLearn {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded `(domain, entry)` pairs.
    pub fn records(&self) -> Vec<(String, FailureEntry)> {
        self.inner.lock().records.clone()
    }

    /// Make subsequent records fail, for fire-and-forget tests.
    pub fn fail_records(&self) {
        self.inner.lock().fail = true;
    }
}

#[async_trait]
impl LearnAdapter for FakeLearn {
    async fn record(
        &self,
        _project_root: &Path,
        domain: &str,
        entry: &FailureEntry,
    ) -> Result<(), LearnError> {
        let mut inner = self.inner.lock();
        if inner.fail {
            return Err(LearnError::RecordFailed("scripted failure".into()));
        }
        inner.records.push((domain.to_string(), entry.clone()));
        Ok(())
    }
}
