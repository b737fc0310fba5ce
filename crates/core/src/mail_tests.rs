// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{MailMessage, MailPriority, MailType};

fn message(subject: &str) -> MailMessage {
    let mut m = MailMessage::new(
        "builder-1",
        "coordinator",
        subject,
        "body",
        MailType::Status,
        MailPriority::Normal,
        1_000,
    );
    m.id = "abc12345".into();
    m
}

#[yare::parameterized(
    low    = { MailPriority::Low, false },
    normal = { MailPriority::Normal, false },
    high   = { MailPriority::High, true },
    urgent = { MailPriority::Urgent, true },
)]
fn priority_auto_nudge(priority: MailPriority, nudges: bool) {
    assert_eq!(priority.auto_nudges(), nudges);
}

#[yare::parameterized(
    status       = { MailType::Status, false },
    question     = { MailType::Question, false },
    result       = { MailType::Result, false },
    merged       = { MailType::Merged, false },
    health_check = { MailType::HealthCheck, false },
    dispatch     = { MailType::Dispatch, false },
    assign       = { MailType::Assign, false },
    error        = { MailType::Error, true },
    worker_done  = { MailType::WorkerDone, true },
    merge_ready  = { MailType::MergeReady, true },
    merge_failed = { MailType::MergeFailed, true },
    escalation   = { MailType::Escalation, true },
)]
fn type_auto_nudge(kind: MailType, nudges: bool) {
    assert_eq!(kind.auto_nudges(), nudges);
}

#[test]
fn type_parse_roundtrip() {
    for kind in [
        MailType::Status,
        MailType::WorkerDone,
        MailType::MergeFailed,
        MailType::Assign,
    ] {
        let parsed: MailType = kind.as_str().parse().unwrap();
        assert_eq!(parsed, kind);
    }
}

#[test]
fn type_parse_rejects_unknown() {
    assert!("gossip".parse::<MailType>().is_err());
    assert!("".parse::<MailPriority>().is_err());
}

#[test]
fn type_serializes_snake_case() {
    let json = serde_json::to_string(&MailType::WorkerDone).unwrap();
    assert_eq!(json, "\"worker_done\"");
}

#[test]
fn kind_field_serializes_as_type() {
    let json = serde_json::to_value(message("hi")).unwrap();
    assert_eq!(json["type"], "status");
    assert!(json.get("kind").is_none());
}

#[test]
fn reply_subject_prefixes_once() {
    assert_eq!(message("build done").reply_subject(), "Re: build done");
    assert_eq!(message("Re: build done").reply_subject(), "Re: build done");
}

#[test]
fn reply_thread_falls_back_to_message_id() {
    let mut m = message("hi");
    assert_eq!(m.reply_thread_id(), "abc12345");
    m.thread_id = Some("thread-1".into());
    assert_eq!(m.reply_thread_id(), "thread-1");
}
