// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable mail store.
//!
//! One JSON file per message. Messages are immutable except for the
//! `read` flag. `check` fetches and marks read under the store lock so
//! two concurrent checkers can never both receive the same message.
//! Delivery order is `created_at` per recipient, ties broken by id.

use crate::kv::KvDir;
use crate::lock::StoreLock;
use crate::paths::StateLayout;
use crate::StorageError;
use ovs_core::{IdGen, MailMessage, ShortIdGen};
use std::path::PathBuf;

/// Filter for [`MailStore::list`].
#[derive(Debug, Clone, Default)]
pub struct MailFilter {
    pub from: Option<String>,
    pub to: Option<String>,
    /// Matches either endpoint of the conversation.
    pub agent: Option<String>,
    pub unread_only: bool,
    pub limit: Option<usize>,
}

/// Selection for [`MailStore::purge`].
#[derive(Debug, Clone, Default)]
pub struct PurgeOptions {
    pub all: bool,
    /// Purge messages older than this many milliseconds (against `now_ms`).
    pub older_than_ms: Option<u64>,
    /// Purge messages where this agent is either endpoint.
    pub agent: Option<String>,
}

/// Keyed store of [`MailMessage`] rows.
#[derive(Debug, Clone)]
pub struct MailStore {
    kv: KvDir,
    dir: PathBuf,
    ids: ShortIdGen,
}

impl MailStore {
    pub fn open(layout: &StateLayout) -> Result<Self, StorageError> {
        let dir = layout.mail_dir();
        Ok(Self {
            kv: KvDir::open(&dir)?,
            dir,
            ids: ShortIdGen,
        })
    }

    /// Persist a message, assigning an id when the caller left it
    /// empty. Returns the stored id.
    pub fn send(&self, mut message: MailMessage) -> Result<String, StorageError> {
        if message.id.is_empty() {
            message.id = self.ids.next();
        }
        let _lock = StoreLock::acquire(&self.dir)?;
        self.kv.put(&message.id, &message)?;
        Ok(message.id)
    }

    /// Unread messages addressed to `agent`, oldest first, marked read
    /// atomically with the fetch.
    pub fn check(&self, agent: &str) -> Result<Vec<MailMessage>, StorageError> {
        let _lock = StoreLock::acquire(&self.dir)?;
        let mut inbox: Vec<MailMessage> = self.kv.read_all()?;
        inbox.retain(|m| m.to == agent && !m.read);
        sort_by_delivery_order(&mut inbox);
        for message in &mut inbox {
            message.read = true;
            self.kv.put(&message.id, &*message)?;
        }
        Ok(inbox)
    }

    /// Unread messages for `agent` without marking them read.
    pub fn get_unread(&self, agent: &str) -> Result<Vec<MailMessage>, StorageError> {
        let mut inbox: Vec<MailMessage> = self.kv.read_all()?;
        inbox.retain(|m| m.to == agent && !m.read);
        sort_by_delivery_order(&mut inbox);
        Ok(inbox)
    }

    /// Filtered read-only view, oldest first.
    pub fn list(&self, filter: &MailFilter) -> Result<Vec<MailMessage>, StorageError> {
        let mut messages: Vec<MailMessage> = self.kv.read_all()?;
        messages.retain(|m| {
            if let Some(from) = &filter.from {
                if &m.from != from {
                    return false;
                }
            }
            if let Some(to) = &filter.to {
                if &m.to != to {
                    return false;
                }
            }
            if let Some(agent) = &filter.agent {
                if &m.from != agent && &m.to != agent {
                    return false;
                }
            }
            if filter.unread_only && m.read {
                return false;
            }
            true
        });
        sort_by_delivery_order(&mut messages);
        if let Some(limit) = filter.limit {
            messages.truncate(limit);
        }
        Ok(messages)
    }

    pub fn get(&self, id: &str) -> Result<Option<MailMessage>, StorageError> {
        self.kv.get(id)
    }

    /// Mark one message read. Idempotent; returns whether it was
    /// already read.
    pub fn mark_read(&self, id: &str) -> Result<bool, StorageError> {
        let _lock = StoreLock::acquire(&self.dir)?;
        let mut message: MailMessage = self
            .kv
            .get(id)?
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;
        if message.read {
            return Ok(true);
        }
        message.read = true;
        self.kv.put(id, &message)?;
        Ok(false)
    }

    /// Delete matching messages; returns how many were removed.
    pub fn purge(&self, opts: &PurgeOptions, now_ms: u64) -> Result<usize, StorageError> {
        let _lock = StoreLock::acquire(&self.dir)?;
        let messages: Vec<MailMessage> = self.kv.read_all()?;
        let mut removed = 0;
        for message in messages {
            let matches = opts.all
                || opts
                    .older_than_ms
                    .map(|cutoff| now_ms.saturating_sub(message.created_at) > cutoff)
                    .unwrap_or(false)
                || opts
                    .agent
                    .as_deref()
                    .map(|a| message.from == a || message.to == a)
                    .unwrap_or(false);
            if matches && self.kv.remove(&message.id)? {
                removed += 1;
            }
        }
        Ok(removed)
    }
}

fn sort_by_delivery_order(messages: &mut [MailMessage]) {
    messages.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });
}

#[cfg(test)]
#[path = "mail_tests.rs"]
mod tests;
