// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mail message types for the inter-agent message bus.
//!
//! Messages are immutable once stored except for the `read` flag.
//! Group addresses (`@all`, `@workers`, `@<capability>`) are expanded
//! by the broker at send time and never appear in a stored `to` field.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error for unknown mail type or priority strings at the validation edge.
#[derive(Debug, Error)]
pub enum ParseMailError {
    #[error("unknown mail type: {0}")]
    UnknownType(String),
    #[error("unknown mail priority: {0}")]
    UnknownPriority(String),
}

/// Delivery priority. High and urgent sends auto-nudge the recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MailPriority {
    Low,
    Normal,
    High,
    Urgent,
}

impl MailPriority {
    pub fn auto_nudges(&self) -> bool {
        matches!(self, MailPriority::High | MailPriority::Urgent)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MailPriority::Low => "low",
            MailPriority::Normal => "normal",
            MailPriority::High => "high",
            MailPriority::Urgent => "urgent",
        }
    }
}

impl fmt::Display for MailPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MailPriority {
    type Err = ParseMailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(MailPriority::Low),
            "normal" => Ok(MailPriority::Normal),
            "high" => Ok(MailPriority::High),
            "urgent" => Ok(MailPriority::Urgent),
            other => Err(ParseMailError::UnknownPriority(other.to_string())),
        }
    }
}

/// Message type: semantic kinds agents use freely, plus protocol kinds
/// the coordination machinery recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MailType {
    Status,
    Question,
    Result,
    Error,
    WorkerDone,
    MergeReady,
    Merged,
    MergeFailed,
    Escalation,
    HealthCheck,
    Dispatch,
    Assign,
}

impl MailType {
    /// Protocol types that write a pending-nudge marker for the
    /// recipient on send, regardless of priority.
    pub fn auto_nudges(&self) -> bool {
        matches!(
            self,
            MailType::WorkerDone
                | MailType::MergeReady
                | MailType::Error
                | MailType::Escalation
                | MailType::MergeFailed
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MailType::Status => "status",
            MailType::Question => "question",
            MailType::Result => "result",
            MailType::Error => "error",
            MailType::WorkerDone => "worker_done",
            MailType::MergeReady => "merge_ready",
            MailType::Merged => "merged",
            MailType::MergeFailed => "merge_failed",
            MailType::Escalation => "escalation",
            MailType::HealthCheck => "health_check",
            MailType::Dispatch => "dispatch",
            MailType::Assign => "assign",
        }
    }
}

impl fmt::Display for MailType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MailType {
    type Err = ParseMailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "status" => Ok(MailType::Status),
            "question" => Ok(MailType::Question),
            "result" => Ok(MailType::Result),
            "error" => Ok(MailType::Error),
            "worker_done" => Ok(MailType::WorkerDone),
            "merge_ready" => Ok(MailType::MergeReady),
            "merged" => Ok(MailType::Merged),
            "merge_failed" => Ok(MailType::MergeFailed),
            "escalation" => Ok(MailType::Escalation),
            "health_check" => Ok(MailType::HealthCheck),
            "dispatch" => Ok(MailType::Dispatch),
            "assign" => Ok(MailType::Assign),
            other => Err(ParseMailError::UnknownType(other.to_string())),
        }
    }
}

/// A stored mail message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailMessage {
    /// Short opaque token assigned by the store.
    pub id: String,
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
    pub priority: MailPriority,
    #[serde(rename = "type")]
    pub kind: MailType,
    #[serde(default)]
    pub thread_id: Option<String>,
    /// Opaque structured payload for protocol messages.
    #[serde(default)]
    pub payload: Option<serde_json::Value>,
    #[serde(default)]
    pub read: bool,
    pub created_at: u64,
}

impl MailMessage {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
        kind: MailType,
        priority: MailPriority,
        created_at: u64,
    ) -> Self {
        Self {
            id: String::new(),
            from: from.into(),
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
            priority,
            kind,
            thread_id: None,
            payload: None,
            read: false,
            created_at,
        }
    }

    /// Subject for a reply: a single `Re: ` prefix.
    pub fn reply_subject(&self) -> String {
        if self.subject.starts_with("Re: ") {
            self.subject.clone()
        } else {
            format!("Re: {}", self.subject)
        }
    }

    /// Thread id a reply should carry: the original's thread, or the
    /// original message itself as the thread root.
    pub fn reply_thread_id(&self) -> String {
        self.thread_id.clone().unwrap_or_else(|| self.id.clone())
    }
}

#[cfg(test)]
#[path = "mail_tests.rs"]
mod tests;
