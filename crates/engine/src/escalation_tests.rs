// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{expected_level, report_request_body, unread_mail_subject, LadderStep};

const MINUTE: u64 = 60_000;

#[yare::parameterized(
    at_detection    = { 0, 0 },
    under_interval  = { MINUTE - 1, 0 },
    one_interval    = { MINUTE, 1 },
    just_after_one  = { MINUTE + 1_000, 1 },
    two_intervals   = { 2 * MINUTE, 2 },
    three_intervals = { 3 * MINUTE, 3 },
    capped_at_three = { 50 * MINUTE, 3 },
)]
fn level_tracks_elapsed_intervals(elapsed_ms: u64, expected: u8) {
    let stalled_since = 1_000_000;
    assert_eq!(
        expected_level(stalled_since + elapsed_ms, stalled_since, MINUTE),
        expected
    );
}

#[test]
fn level_is_monotonic_in_elapsed_time() {
    let stalled_since = 0;
    let mut last = 0;
    for elapsed in (0..10 * MINUTE).step_by(10_000) {
        let level = expected_level(elapsed, stalled_since, MINUTE);
        assert!(level >= last, "level decreased at {elapsed}");
        last = level;
    }
    assert_eq!(last, 3);
}

#[test]
fn zero_interval_does_not_divide_by_zero() {
    assert_eq!(expected_level(5_000, 0, 0), 3);
}

#[yare::parameterized(
    warn      = { 0, LadderStep::Warn },
    nudge     = { 1, LadderStep::Nudge },
    triage    = { 2, LadderStep::Triage },
    terminate = { 3, LadderStep::Terminate },
    beyond    = { 9, LadderStep::Terminate },
)]
fn ladder_steps(level: u8, expected: LadderStep) {
    assert_eq!(LadderStep::for_level(level), expected);
}

#[test]
fn report_body_names_agent_and_age() {
    let body = report_request_body("builder-1", 11 * MINUTE);
    assert!(body.contains("builder-1"));
    assert!(body.contains("11m"));
}

#[test]
fn unread_subject_pluralizes() {
    assert!(unread_mail_subject(1, "b").contains("1 unread message "));
    assert!(unread_mail_subject(3, "b").contains("3 unread messages "));
    assert!(unread_mail_subject(3, "builder-1").ends_with("ovs mail check builder-1"));
}
