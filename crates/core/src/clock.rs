// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction for testable time handling.
//!
//! All coordination timestamps are epoch milliseconds. Production code
//! uses [`SystemClock`]; tests drive [`FakeClock`] manually so stall
//! thresholds and escalation windows can be crossed deterministically.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of the current time in epoch milliseconds.
pub trait Clock: Clone + Send + Sync + 'static {
    fn now_ms(&self) -> u64;
}

/// Wall-clock time.
#[derive(Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

/// Manually-advanced clock for tests.
#[derive(Clone)]
pub struct FakeClock {
    now: Arc<Mutex<u64>>,
}

impl FakeClock {
    /// Starts at an arbitrary non-zero epoch so age arithmetic never
    /// underflows in tests.
    pub fn new() -> Self {
        Self::at(1_700_000_000_000)
    }

    pub fn at(now_ms: u64) -> Self {
        Self {
            now: Arc::new(Mutex::new(now_ms)),
        }
    }

    pub fn set(&self, now_ms: u64) {
        *self.now.lock() = now_ms;
    }

    pub fn advance(&self, delta_ms: u64) {
        *self.now.lock() += delta_ms;
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now_ms(&self) -> u64 {
        *self.now.lock()
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
