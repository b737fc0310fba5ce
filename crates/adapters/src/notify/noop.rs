// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op notification adapter

use super::{NotifyAdapter, NotifyError};
use async_trait::async_trait;

/// Discards every notification. Used in headless environments.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpNotify;

impl NoOpNotify {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotifyAdapter for NoOpNotify {
    async fn notify(&self, _title: &str, _message: &str) -> Result<(), NotifyError> {
        Ok(())
    }
}
