// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Overstory Supervisor Daemon (ovsd)
//!
//! Long-lived process that owns the watchdog ticker for one project.
//! Worker agents never talk to it directly; they mutate the shared
//! stores through the `ovs` CLI and the supervisor reconciles on a
//! fixed interval.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod env;
mod lifecycle;

use std::path::Path;

use lifecycle::{Config, LifecycleError};
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Handle info flags before any config/lock acquisition
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "--version" | "-V" | "-v" => {
                println!("ovsd {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                println!("ovsd {}", env!("CARGO_PKG_VERSION"));
                println!("Overstory supervisor - watches the agent fleet for one project");
                println!();
                println!("USAGE:");
                println!("    ovsd");
                println!();
                println!("Run from the project root. State lives in ./.overstory (or");
                println!("$OVERSTORY_STATE_DIR). Thresholds come from the environment:");
                println!("OVERSTORY_WATCHDOG_INTERVAL_MS, OVERSTORY_STALE_MS,");
                println!("OVERSTORY_ZOMBIE_MS, OVERSTORY_NUDGE_INTERVAL_MS, OVERSTORY_TRIAGE.");
                println!();
                println!("OPTIONS:");
                println!("    -h, --help       Print help information");
                println!("    -v, --version    Print version information");
                return Ok(());
            }
            _ => {
                eprintln!("error: unexpected argument '{arg}'");
                eprintln!("Usage: ovsd [--help | --version]");
                std::process::exit(1);
            }
        }
    }

    let config = Config::load()?;

    rotate_log_if_needed(&config.log_path);
    let log_guard = setup_logging(&config)?;

    let _lock = match lifecycle::acquire_lock(&config) {
        Ok(lock) => lock,
        Err(LifecycleError::LockFailed(path)) => {
            let pid = std::fs::read_to_string(&path).unwrap_or_default();
            eprintln!("ovsd is already running");
            if !pid.trim().is_empty() {
                eprintln!("  pid: {}", pid.trim());
            }
            std::process::exit(1);
        }
        Err(e) => {
            error!("failed to start supervisor: {e}");
            drop(log_guard);
            return Err(e.into());
        }
    };

    info!(project = %config.project_root.display(), "supervisor starting");
    let watchdog = lifecycle::startup(&config)?;

    // Shutdown flows through a watch channel; an in-flight tick always
    // completes before the loop exits.
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    tokio::spawn(async move {
        tokio::select! {
            _ = sigterm.recv() => info!("received SIGTERM, shutting down"),
            _ = sigint.recv() => info!("received SIGINT, shutting down"),
        }
        let _ = shutdown_tx.send(true);
    });

    // Signal ready for whoever spawned us
    println!("READY");

    watchdog.run(shutdown_rx).await;

    info!("supervisor stopped");
    Ok(())
}

/// Maximum log file size before rotation (10 MB).
const MAX_LOG_SIZE: u64 = 10 * 1024 * 1024;

/// Number of rotated log files to keep (daemon.log.1, .2, .3).
const MAX_ROTATED_LOGS: u32 = 3;

/// Rotate the supervisor log if it exceeds [`MAX_LOG_SIZE`].
///
/// Shifts `daemon.log` to `daemon.log.1` to `.2` to `.3`, deleting the
/// oldest. Best-effort: rotation failures never stop startup.
fn rotate_log_if_needed(log_path: &Path) {
    let size = match std::fs::metadata(log_path) {
        Ok(m) => m.len(),
        Err(_) => return,
    };
    if size < MAX_LOG_SIZE {
        return;
    }

    let log_str = log_path.display().to_string();
    for i in (1..MAX_ROTATED_LOGS).rev() {
        let from = format!("{log_str}.{i}");
        let to = format!("{log_str}.{}", i + 1);
        let _ = std::fs::rename(&from, &to);
    }
    let _ = std::fs::rename(log_path, format!("{log_str}.1"));
}

fn setup_logging(
    config: &Config,
) -> Result<tracing_appender::non_blocking::WorkerGuard, LifecycleError> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let dir = config
        .log_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.layout.root().to_path_buf());
    std::fs::create_dir_all(&dir)?;
    let file_name = config
        .log_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "daemon.log".into());

    let file_appender = tracing_appender::rolling::never(&dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking))
        .init();

    Ok(guard)
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
