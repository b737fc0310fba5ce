// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake triage adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{TriageAdapter, TriageRequest, TriageVerdict};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

/// Fake triage with a scripted verdict.
#[derive(Clone)]
pub struct FakeTriage {
    inner: Arc<Mutex<FakeTriageState>>,
}

struct FakeTriageState {
    verdict: TriageVerdict,
    requests: Vec<TriageRequest>,
}

impl FakeTriage {
    pub fn returning(verdict: TriageVerdict) -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeTriageState {
                verdict,
                requests: Vec::new(),
            })),
        }
    }

    pub fn set_verdict(&self, verdict: TriageVerdict) {
        self.inner.lock().verdict = verdict;
    }

    pub fn requests(&self) -> Vec<TriageRequest> {
        self.inner.lock().requests.clone()
    }
}

impl Default for FakeTriage {
    fn default() -> Self {
        Self::returning(TriageVerdict::Extend)
    }
}

#[async_trait]
impl TriageAdapter for FakeTriage {
    async fn assess(&self, request: &TriageRequest) -> TriageVerdict {
        let mut inner = self.inner.lock();
        inner.requests.push(request.clone());
        inner.verdict
    }
}
