// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Supervisor lifecycle: configuration, singleton lock, startup.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use fs2::FileExt;
use ovs_adapters::{BeadsTracker, CommandTriage, DesktopNotify, MulchLearn, TmuxMux};
use ovs_core::SystemClock;
use ovs_engine::{EngineError, Watchdog, WatchdogConfig};
use ovs_storage::StateLayout;
use thiserror::Error;

/// Supervisor watchdog with the real adapter stack.
pub type DaemonWatchdog =
    Watchdog<TmuxMux, BeadsTracker, MulchLearn, CommandTriage, DesktopNotify, SystemClock>;

/// Errors during supervisor startup and shutdown.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("another ovsd already holds the lock at {0}")]
    LockFailed(PathBuf),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Supervisor configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Project the supervisor watches (the current directory).
    pub project_root: PathBuf,
    /// Resolved state layout under the project root.
    pub layout: StateLayout,
    /// Path to the pid/lock file.
    pub lock_path: PathBuf,
    /// Path to the supervisor log file.
    pub log_path: PathBuf,
}

impl Config {
    /// One supervisor per project: state lives in the project's
    /// `.overstory` directory (or `OVERSTORY_STATE_DIR`).
    pub fn load() -> Result<Self, LifecycleError> {
        let project_root = std::env::current_dir()?;
        let layout = StateLayout::discover(&project_root);
        Ok(Self {
            lock_path: layout.daemon_pid_path(),
            log_path: layout.daemon_log_path(),
            project_root,
            layout,
        })
    }
}

/// Pid lock held for the supervisor's lifetime.
///
/// The exclusive flock is released when the file closes, so dropping
/// the guard (on any exit path) frees the singleton slot.
pub struct PidLock {
    // NOTE(lifetime): held to maintain the exclusive lock
    #[allow(dead_code)]
    file: File,
}

/// Acquire the singleton lock and record our pid in it.
pub fn acquire_lock(config: &Config) -> Result<PidLock, LifecycleError> {
    std::fs::create_dir_all(config.layout.root())?;
    let mut file = File::options()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&config.lock_path)?;
    file.try_lock_exclusive()
        .map_err(|_| LifecycleError::LockFailed(config.lock_path.clone()))?;
    file.set_len(0)?;
    writeln!(file, "{}", std::process::id())?;
    file.sync_all()?;
    Ok(PidLock { file })
}

/// Build the watchdog over the real adapter stack.
pub fn startup(config: &Config) -> Result<DaemonWatchdog, LifecycleError> {
    let watchdog_config: WatchdogConfig = crate::env::watchdog_config();
    tracing::info!(
        interval_ms = watchdog_config.interval_ms,
        stale_ms = watchdog_config.stale_ms,
        zombie_ms = watchdog_config.zombie_ms,
        triage = watchdog_config.triage_enabled,
        "starting watchdog"
    );
    let watchdog = Watchdog::open(
        &config.project_root,
        &config.layout,
        watchdog_config,
        TmuxMux::new(),
        BeadsTracker::new(),
        MulchLearn::new(),
        CommandTriage::new(),
        DesktopNotify::new(),
        SystemClock,
    )?;
    Ok(watchdog)
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
