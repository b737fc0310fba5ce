// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine error types.

use ovs_storage::StorageError;
use thiserror::Error;

/// Errors from coordination-core operations.
///
/// Validation variants surface immediately to the caller; storage
/// errors are non-fatal inside a watchdog tick and fatal at the CLI
/// edge.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown group address: {0}")]
    UnknownGroup(String),
    #[error("no such message: {0}")]
    MessageNotFound(String),
    #[error("invalid watchdog thresholds: {0}")]
    InvalidThresholds(String),
    #[error("invalid backoff {0} (must be >= 1.0)")]
    InvalidBackoff(f64),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
