// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ovs-adapters: External collaborators behind capability interfaces.
//!
//! Every process the coordination core talks to (tmux, the `bd` issue
//! tracker, the `mulch` learning store, the triage helper, desktop
//! notifications) sits behind an async trait here. Default
//! implementations construct the real thing; fakes (behind the
//! `test-support` feature) let the watchdog be tested without any of
//! them installed.

pub mod learn;
pub mod mux;
pub mod notify;
pub mod subprocess;
pub mod tracker;
pub mod triage;

pub use learn::{FailureEntry, LearnAdapter, LearnError, MulchLearn};
pub use mux::{MuxAdapter, MuxError, TmuxMux};
pub use notify::{DesktopNotify, NoOpNotify, NotifyAdapter, NotifyError};
pub use tracker::{BeadsTracker, TrackerAdapter};
pub use triage::{CommandTriage, TriageAdapter, TriageRequest, TriageVerdict};

#[cfg(any(test, feature = "test-support"))]
pub use learn::FakeLearn;
#[cfg(any(test, feature = "test-support"))]
pub use mux::{FakeMux, MuxCall};
#[cfg(any(test, feature = "test-support"))]
pub use notify::FakeNotify;
#[cfg(any(test, feature = "test-support"))]
pub use tracker::FakeTracker;
#[cfg(any(test, feature = "test-support"))]
pub use triage::FakeTriage;
