// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Environment-variable overrides for the supervisor.

use ovs_engine::WatchdogConfig;
use tracing::warn;

pub const INTERVAL_ENV: &str = "OVERSTORY_WATCHDOG_INTERVAL_MS";
pub const STALE_ENV: &str = "OVERSTORY_STALE_MS";
pub const ZOMBIE_ENV: &str = "OVERSTORY_ZOMBIE_MS";
pub const NUDGE_INTERVAL_ENV: &str = "OVERSTORY_NUDGE_INTERVAL_MS";
pub const TRIAGE_ENV: &str = "OVERSTORY_TRIAGE";

/// Watchdog configuration: defaults overridden by environment.
/// Unparseable values are ignored with a warning; validation happens
/// at watchdog construction.
pub fn watchdog_config() -> WatchdogConfig {
    let mut config = WatchdogConfig::default();
    if let Some(v) = parse_u64(INTERVAL_ENV) {
        config.interval_ms = v;
    }
    if let Some(v) = parse_u64(STALE_ENV) {
        config.stale_ms = v;
    }
    if let Some(v) = parse_u64(ZOMBIE_ENV) {
        config.zombie_ms = v;
    }
    if let Some(v) = parse_u64(NUDGE_INTERVAL_ENV) {
        config.nudge_interval_ms = v;
    }
    config.triage_enabled = flag(TRIAGE_ENV);
    config
}

fn parse_u64(name: &str) -> Option<u64> {
    let value = std::env::var(name).ok()?;
    match value.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(name, value = %value, "ignoring unparseable env override");
            None
        }
    }
}

fn flag(name: &str) -> bool {
    matches!(
        std::env::var(name).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
