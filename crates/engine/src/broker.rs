// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mail broker: send, check, and reply with coordination side effects.
//!
//! The broker layers three behaviors over the raw mail store:
//!
//! - **Broadcast expansion**: `@all`, `@workers`, and `@<capability>`
//!   resolve against currently-active sessions (excluding the sender)
//!   into one stored message per recipient. Group addresses are never
//!   persisted.
//! - **Auto-nudge**: high/urgent priority and attention-demanding
//!   protocol types write a pending-nudge marker per recipient.
//! - **Heartbeat**: any send, check, or reply counts as observable
//!   activity from the acting agent, refreshing `last_activity` and
//!   recovering booting/stalled sessions. This keeps health evaluation
//!   honest even when terminal-level activity hooks are absent.

use crate::nudge::NudgeSender;
use crate::EngineError;
use ovs_core::{
    Clock, GroupAddress, MailMessage, MailPriority, MailType, NudgeMarker,
};
use ovs_storage::{MailCheckState, MailStore, NudgeStore, SessionStore, StateLayout, StorageError};
use tracing::warn;

/// A send operation before expansion.
#[derive(Debug, Clone)]
pub struct SendRequest {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
    pub kind: MailType,
    pub priority: MailPriority,
    pub payload: Option<serde_json::Value>,
    pub thread_id: Option<String>,
}

impl SendRequest {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
        kind: MailType,
        priority: MailPriority,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
            kind,
            priority,
            payload: None,
            thread_id: None,
        }
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn with_thread_id(mut self, thread_id: impl Into<String>) -> Self {
        self.thread_id = Some(thread_id.into());
        self
    }
}

/// Mail operations with coordination side effects.
#[derive(Clone)]
pub struct MailBroker<C: Clock> {
    sessions: SessionStore,
    mail: MailStore,
    nudges: NudgeStore,
    checks: MailCheckState,
    nudger: NudgeSender<C>,
    clock: C,
}

impl<C: Clock> MailBroker<C> {
    pub fn open(layout: &StateLayout, clock: C) -> Result<Self, EngineError> {
        Ok(Self {
            sessions: SessionStore::open(layout)?,
            mail: MailStore::open(layout)?,
            nudges: NudgeStore::open(layout)?,
            checks: MailCheckState::open(layout)?,
            nudger: NudgeSender::open(layout, clock.clone())?,
            clock,
        })
    }

    /// Send one message, expanding group addresses. Returns the stored
    /// message ids (one per resolved recipient). With `force`, a nudge
    /// marker is written for every recipient regardless of priority or
    /// type, bypassing the debounce window.
    pub fn send(&self, request: &SendRequest, force: bool) -> Result<Vec<String>, EngineError> {
        let recipients = self.resolve_recipients(&request.from, &request.to)?;
        let now = self.clock.now_ms();

        let mut ids = Vec::with_capacity(recipients.len());
        for to in recipients {
            let mut message = MailMessage::new(
                request.from.as_str(),
                to.as_str(),
                request.subject.as_str(),
                request.body.as_str(),
                request.kind,
                request.priority,
                now,
            );
            message.thread_id = request.thread_id.clone();
            message.payload = request.payload.clone();
            let id = self.mail.send(message)?;

            if force || request.priority.auto_nudges() || request.kind.auto_nudges() {
                let marker = NudgeMarker::new(
                    request.from.as_str(),
                    request.kind.as_str(),
                    request.subject.as_str(),
                    now,
                )
                .with_message_id(id.as_str());
                if let Err(e) = self.nudger.deliver(&to, marker, force) {
                    warn!(recipient = %to, error = %e, "auto-nudge failed");
                }
            }
            ids.push(id);
        }

        self.heartbeat(&request.from, now);
        Ok(ids)
    }

    /// Fetch and mark read the caller's unread mail, stamping the
    /// mail-check debounce state.
    pub fn check(&self, agent: &str) -> Result<Vec<MailMessage>, EngineError> {
        let messages = self.mail.check(agent)?;
        let now = self.clock.now_ms();
        if let Err(e) = self.checks.stamp(agent, now) {
            warn!(agent, error = %e, "mail-check stamp failed");
        }
        self.heartbeat(agent, now);
        Ok(messages)
    }

    /// Reply to a stored message: recipient is the original sender,
    /// subject gains a `Re: ` prefix, thread id is inherited (or the
    /// original message becomes the thread root). Carries the original
    /// type at normal priority.
    pub fn reply(&self, id: &str, body: &str, from: &str, force: bool) -> Result<String, EngineError> {
        let original = self
            .mail
            .get(id)?
            .ok_or_else(|| EngineError::MessageNotFound(id.to_string()))?;

        let request = SendRequest {
            from: from.to_string(),
            to: original.from.clone(),
            subject: original.reply_subject(),
            body: body.to_string(),
            kind: original.kind,
            priority: MailPriority::Normal,
            payload: None,
            thread_id: Some(original.reply_thread_id()),
        };
        let ids = self.send(&request, force)?;
        Ok(ids.into_iter().next().unwrap_or_default())
    }

    /// Read-and-clear the caller's pending nudge, if any.
    pub fn take_nudge(&self, agent: &str) -> Result<Option<NudgeMarker>, EngineError> {
        Ok(self.nudges.take(agent)?)
    }

    fn resolve_recipients(&self, from: &str, to: &str) -> Result<Vec<String>, EngineError> {
        if !to.starts_with('@') {
            return Ok(vec![to.to_string()]);
        }
        let group =
            GroupAddress::parse(to).ok_or_else(|| EngineError::UnknownGroup(to.to_string()))?;
        let recipients = self
            .sessions
            .get_active()?
            .into_iter()
            .filter(|s| s.agent_name != from && group.includes(s.capability))
            .map(|s| s.agent_name)
            .collect();
        Ok(recipients)
    }

    /// Mail activity from an agent is an observable liveness signal.
    /// Senders without a session row (the operator, the watchdog) are
    /// simply not tracked.
    fn heartbeat(&self, agent: &str, now_ms: u64) {
        match self.sessions.record_activity(agent, now_ms) {
            Ok(()) => {}
            Err(StorageError::NotFound(_)) => {}
            Err(e) => warn!(agent, error = %e, "activity heartbeat failed"),
        }
    }
}

#[cfg(test)]
#[path = "broker_tests.rs"]
mod tests;
