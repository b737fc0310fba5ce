// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake notification adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{NotifyAdapter, NotifyError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

/// Fake notifier that records `(title, message)` pairs.
#[derive(Clone, Default)]
pub struct FakeNotify {
    sent: Arc<Mutex<Vec<(String, String)>>>,
}

impl FakeNotify {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl NotifyAdapter for FakeNotify {
    async fn notify(&self, title: &str, message: &str) -> Result<(), NotifyError> {
        self.sent
            .lock()
            .push((title.to_string(), message.to_string()));
        Ok(())
    }
}
