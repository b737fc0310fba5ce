// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pending-nudge marker.
//!
//! A nudge is an out-of-band attention signal. Writing keystrokes into
//! a busy terminal can corrupt a tool call in progress, so the signal
//! is a per-recipient marker file instead: the recipient reads and
//! clears it on its next inbox poll. Only the latest marker matters;
//! a new one overwrites any prior marker for the same recipient.

use serde::{Deserialize, Serialize};

/// Marker content for one recipient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NudgeMarker {
    pub from: String,
    pub reason: String,
    pub subject: String,
    /// Id of the mail message that triggered the nudge, if any.
    #[serde(default)]
    pub message_id: Option<String>,
    pub created_at: u64,
}

impl NudgeMarker {
    pub fn new(
        from: impl Into<String>,
        reason: impl Into<String>,
        subject: impl Into<String>,
        created_at: u64,
    ) -> Self {
        Self {
            from: from.into(),
            reason: reason.into(),
            subject: subject.into(),
            message_id: None,
            created_at,
        }
    }

    pub fn with_message_id(mut self, message_id: impl Into<String>) -> Self {
        self.message_id = Some(message_id.into());
        self
    }
}
