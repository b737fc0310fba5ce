// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ovs-storage: Durable coordination stores.
//!
//! Everything the fleet shares lives on disk under one state directory:
//! keyed JSON files for sessions, mail, and the merge queue; append-only
//! JSONL logs for events and metrics; single-file markers for nudges,
//! debounce state, and run tracking. Writes are atomic (tmp + rename)
//! and serialized through per-store advisory locks so independent
//! processes (CLI commands from workers, the supervisor's watchdog)
//! can mutate the stores concurrently.

pub mod error;
pub mod events;
pub mod kv;
pub mod lock;
pub mod mail;
pub mod markers;
pub mod merge_queue;
pub mod metrics;
pub mod paths;
pub mod sessions;

pub use error::StorageError;
pub use events::EventsStore;
pub use mail::{MailFilter, MailStore, PurgeOptions};
pub use markers::{CurrentRun, MailCheckState, NudgeStore, RunCompleteMarker};
pub use merge_queue::{MergeEntry, MergeQueueStore, MergeStatus};
pub use metrics::{MetricsRow, MetricsStore};
pub use paths::StateLayout;
pub use sessions::SessionStore;
