// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Long-poll mail wait.
//!
//! Coordination agents that would otherwise busy-poll their inbox use
//! this cooperative wait: sleep-with-backoff between inbox checks,
//! because the producers are separate processes and there is no shared
//! in-memory event to block on. Cancellation is polite, not
//! preemptive: the cancel file is only consulted between sleeps, so
//! worst-case cancellation latency is one poll interval.

use crate::broker::MailBroker;
use crate::EngineError;
use ovs_core::{Capability, Clock, MailMessage, NudgeMarker};
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::Instant;

/// Why the wait returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailWaitStatus {
    /// Mail arrived.
    Message,
    /// No mail, but a pending nudge appeared (wake-on-nudge roles only).
    Nudged,
    Timeout,
    Cancelled,
}

/// Result of a wait.
#[derive(Debug)]
pub struct MailWaitOutcome {
    pub status: MailWaitStatus,
    pub messages: Vec<MailMessage>,
    pub nudge: Option<NudgeMarker>,
}

/// Wait parameters. Defaults: 5 minute timeout, 1 s initial poll
/// growing 1.5x per round to a 10 s cap.
#[derive(Debug, Clone)]
pub struct MailWaitOptions {
    pub agent: String,
    pub timeout_ms: u64,
    pub initial_poll_ms: u64,
    pub max_poll_ms: u64,
    pub backoff: f64,
    pub cancel_file: Option<PathBuf>,
    /// Wake when a pending nudge appears. True for dispatch-
    /// coordinating roles (coordinator, lead).
    pub wake_on_pending_nudge: bool,
}

impl MailWaitOptions {
    pub fn new(agent: impl Into<String>) -> Self {
        Self {
            agent: agent.into(),
            timeout_ms: 300_000,
            initial_poll_ms: 1_000,
            max_poll_ms: 10_000,
            backoff: 1.5,
            cancel_file: None,
            wake_on_pending_nudge: false,
        }
    }

    /// Defaults for an agent of the given capability.
    pub fn for_capability(agent: impl Into<String>, capability: Capability) -> Self {
        let mut opts = Self::new(agent);
        opts.wake_on_pending_nudge = capability.wakes_on_nudge();
        opts
    }

    fn validate(&self) -> Result<(), EngineError> {
        if self.backoff < 1.0 {
            return Err(EngineError::InvalidBackoff(self.backoff));
        }
        Ok(())
    }
}

/// Poll the inbox until mail, a nudge, timeout, or cancellation.
///
/// Every iteration counts as activity for the waiting agent; the
/// broker's check heartbeat keeps the watchdog from declaring a
/// patiently-waiting coordinator stalled.
pub async fn mail_wait<C: Clock>(
    broker: &MailBroker<C>,
    opts: &MailWaitOptions,
) -> Result<MailWaitOutcome, EngineError> {
    opts.validate()?;

    let deadline = Instant::now() + Duration::from_millis(opts.timeout_ms);
    let mut poll_ms = opts.initial_poll_ms.max(1);

    loop {
        if let Some(cancel) = &opts.cancel_file {
            if cancel.exists() {
                return Ok(MailWaitOutcome {
                    status: MailWaitStatus::Cancelled,
                    messages: Vec::new(),
                    nudge: None,
                });
            }
        }

        let nudge = if opts.wake_on_pending_nudge {
            broker.take_nudge(&opts.agent)?
        } else {
            None
        };

        let messages = broker.check(&opts.agent)?;

        if !messages.is_empty() {
            return Ok(MailWaitOutcome {
                status: MailWaitStatus::Message,
                messages,
                nudge,
            });
        }
        if nudge.is_some() {
            return Ok(MailWaitOutcome {
                status: MailWaitStatus::Nudged,
                messages: Vec::new(),
                nudge,
            });
        }

        let now = Instant::now();
        if now >= deadline {
            return Ok(MailWaitOutcome {
                status: MailWaitStatus::Timeout,
                messages: Vec::new(),
                nudge: None,
            });
        }

        let remaining = deadline - now;
        tokio::time::sleep(remaining.min(Duration::from_millis(poll_ms))).await;

        let grown = (poll_ms as f64 * opts.backoff).floor() as u64;
        poll_ms = opts.max_poll_ms.min(opts.initial_poll_ms.max(1).max(grown));
    }
}

#[cfg(test)]
#[path = "wait_tests.rs"]
mod tests;
