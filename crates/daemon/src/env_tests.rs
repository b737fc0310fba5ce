// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

fn clear_all() {
    for name in [INTERVAL_ENV, STALE_ENV, ZOMBIE_ENV, NUDGE_INTERVAL_ENV, TRIAGE_ENV] {
        std::env::remove_var(name);
    }
}

#[test]
#[serial]
fn defaults_without_overrides() {
    clear_all();
    let config = watchdog_config();
    assert_eq!(config.interval_ms, 60_000);
    assert_eq!(config.stale_ms, 300_000);
    assert_eq!(config.zombie_ms, 1_200_000);
    assert!(!config.triage_enabled);
}

#[test]
#[serial]
fn overrides_apply() {
    clear_all();
    std::env::set_var(INTERVAL_ENV, "5000");
    std::env::set_var(STALE_ENV, "10000");
    std::env::set_var(TRIAGE_ENV, "true");
    let config = watchdog_config();
    assert_eq!(config.interval_ms, 5_000);
    assert_eq!(config.stale_ms, 10_000);
    assert!(config.triage_enabled);
    clear_all();
}

#[test]
#[serial]
fn unparseable_override_is_ignored() {
    clear_all();
    std::env::set_var(INTERVAL_ENV, "soon");
    let config = watchdog_config();
    assert_eq!(config.interval_ms, 60_000);
    clear_all();
}
