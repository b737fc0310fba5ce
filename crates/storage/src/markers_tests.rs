// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{CurrentRun, MailCheckState, NudgeStore, RunCompleteMarker};
use crate::paths::StateLayout;
use ovs_core::NudgeMarker;

fn layout() -> (tempfile::TempDir, StateLayout) {
    let tmp = tempfile::tempdir().unwrap();
    let layout = StateLayout::new(tmp.path());
    (tmp, layout)
}

fn marker(from: &str, created_at: u64) -> NudgeMarker {
    NudgeMarker::new(from, "mail", "you have mail", created_at)
}

#[test]
fn nudge_write_take_clears() {
    let (_tmp, layout) = layout();
    let store = NudgeStore::open(&layout).unwrap();

    store.write("builder-1", &marker("coordinator", 1)).unwrap();
    let taken = store.take("builder-1").unwrap().unwrap();
    assert_eq!(taken.from, "coordinator");

    // Marker is gone after take
    assert!(store.take("builder-1").unwrap().is_none());
    assert!(store.peek("builder-1").unwrap().is_none());
}

#[test]
fn nudge_overwrite_keeps_only_latest() {
    let (_tmp, layout) = layout();
    let store = NudgeStore::open(&layout).unwrap();

    store.write("builder-1", &marker("a", 1)).unwrap();
    store.write("builder-1", &marker("b", 2)).unwrap();

    let taken = store.take("builder-1").unwrap().unwrap();
    assert_eq!(taken.from, "b");
    assert!(store.take("builder-1").unwrap().is_none());
}

#[test]
fn nudge_peek_leaves_marker() {
    let (_tmp, layout) = layout();
    let store = NudgeStore::open(&layout).unwrap();

    store.write("builder-1", &marker("a", 1)).unwrap();
    assert!(store.peek("builder-1").unwrap().is_some());
    assert!(store.peek("builder-1").unwrap().is_some());
}

#[test]
fn nudges_are_per_recipient() {
    let (_tmp, layout) = layout();
    let store = NudgeStore::open(&layout).unwrap();

    store.write("a", &marker("x", 1)).unwrap();
    assert!(store.take("b").unwrap().is_none());
    assert!(store.take("a").unwrap().is_some());
}

#[test]
fn mail_check_state_stamps_and_loads() {
    let (_tmp, layout) = layout();
    let state = MailCheckState::open(&layout).unwrap();

    assert!(state.last_checked("a").unwrap().is_none());
    state.stamp("a", 1_000).unwrap();
    state.stamp("b", 2_000).unwrap();
    state.stamp("a", 3_000).unwrap();

    assert_eq!(state.last_checked("a").unwrap(), Some(3_000));
    assert_eq!(state.last_checked("b").unwrap(), Some(2_000));
    assert_eq!(state.load().unwrap().len(), 2);
}

#[test]
fn mail_check_state_recovers_from_corruption() {
    let (_tmp, layout) = layout();
    let state = MailCheckState::open(&layout).unwrap();
    std::fs::write(layout.mail_check_state_path(), "{broken").unwrap();

    assert!(state.load().unwrap().is_empty());
    state.stamp("a", 1_000).unwrap();
    assert_eq!(state.last_checked("a").unwrap(), Some(1_000));
}

#[test]
fn current_run_read_write_clear() {
    let (_tmp, layout) = layout();
    let run = CurrentRun::open(&layout).unwrap();

    assert!(run.read().unwrap().is_none());
    run.write("run-42").unwrap();
    assert_eq!(run.read().unwrap().as_deref(), Some("run-42"));
    run.clear().unwrap();
    assert!(run.read().unwrap().is_none());
    run.clear().unwrap();
}

#[test]
fn current_run_trims_whitespace() {
    let (_tmp, layout) = layout();
    let run = CurrentRun::open(&layout).unwrap();

    std::fs::write(layout.current_run_path(), "  run-1\n").unwrap();
    assert_eq!(run.read().unwrap().as_deref(), Some("run-1"));

    std::fs::write(layout.current_run_path(), "   \n").unwrap();
    assert!(run.read().unwrap().is_none());
}

#[test]
fn run_complete_marker_roundtrip() {
    let (_tmp, layout) = layout();
    let marker = RunCompleteMarker::open(&layout).unwrap();

    assert!(marker.read().unwrap().is_none());
    marker.write("run-1").unwrap();
    assert_eq!(marker.read().unwrap().as_deref(), Some("run-1"));
    marker.write("run-2").unwrap();
    assert_eq!(marker.read().unwrap().as_deref(), Some("run-2"));
}
