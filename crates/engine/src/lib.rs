// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ovs-engine: The agent coordination core.
//!
//! Five cooperating pieces over the durable stores: the mail broker
//! (broadcast expansion, auto-nudge, activity heartbeat), the nudge
//! sender (debounced out-of-band attention signals), the long-poll
//! mail wait, the watchdog (health evaluation and the progressive
//! escalation ladder), and the run-completion detector.

pub mod broker;
pub mod completion;
pub mod error;
pub mod escalation;
pub mod health;
pub mod nudge;
pub mod wait;
pub mod watchdog;

pub use broker::{MailBroker, SendRequest};
pub use error::EngineError;
pub use escalation::LadderStep;
pub use health::{HealthAction, HealthCheck, HealthThresholds};
pub use nudge::{Delivery, NudgeSender};
pub use wait::{mail_wait, MailWaitOptions, MailWaitOutcome, MailWaitStatus};
pub use watchdog::{HealthReport, Watchdog, WatchdogConfig, WATCHDOG_AGENT};
