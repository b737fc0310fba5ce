// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{mail_wait, MailWaitOptions, MailWaitStatus};
use crate::broker::{MailBroker, SendRequest};
use crate::EngineError;
use ovs_core::{
    AgentSession, Capability, FakeClock, MailPriority, MailType, NudgeMarker, SessionState,
};
use ovs_storage::{NudgeStore, SessionStore, StateLayout};
use std::time::Duration;

struct Fixture {
    _tmp: tempfile::TempDir,
    layout: StateLayout,
    clock: FakeClock,
    broker: MailBroker<FakeClock>,
}

fn fixture() -> Fixture {
    let tmp = tempfile::tempdir().unwrap();
    let layout = StateLayout::new(tmp.path());
    let clock = FakeClock::at(100_000);
    let broker = MailBroker::open(&layout, clock.clone()).unwrap();
    Fixture {
        _tmp: tmp,
        layout,
        clock,
        broker,
    }
}

fn seed(f: &Fixture, name: &str, capability: Capability) {
    let store = SessionStore::open(&f.layout).unwrap();
    let mut s = AgentSession::new(format!("id-{name}"), name, capability, 1_000);
    s.state = SessionState::Working;
    store.upsert(&s).unwrap();
}

fn status_mail(from: &str, to: &str) -> SendRequest {
    SendRequest::new(from, to, "s", "b", MailType::Status, MailPriority::Normal)
}

#[tokio::test(start_paused = true)]
async fn returns_message_when_mail_is_waiting() {
    let f = fixture();
    f.broker.send(&status_mail("a", "coordinator"), false).unwrap();

    let opts = MailWaitOptions::new("coordinator");
    let outcome = mail_wait(&f.broker, &opts).await.unwrap();
    assert_eq!(outcome.status, MailWaitStatus::Message);
    assert_eq!(outcome.messages.len(), 1);
    assert!(outcome.nudge.is_none());
}

#[tokio::test(start_paused = true)]
async fn wakes_on_mail_arriving_mid_wait() {
    let f = fixture();
    let broker = f.broker.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(3)).await;
        broker.send(&status_mail("a", "coordinator"), false).unwrap();
    });

    let opts = MailWaitOptions::new("coordinator");
    let outcome = mail_wait(&f.broker, &opts).await.unwrap();
    assert_eq!(outcome.status, MailWaitStatus::Message);
}

#[tokio::test(start_paused = true)]
async fn coordinator_wakes_on_nudge() {
    let f = fixture();
    seed(&f, "coordinator", Capability::Coordinator);
    let nudges = NudgeStore::open(&f.layout).unwrap();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(2)).await;
        nudges
            .write(
                "coordinator",
                &NudgeMarker::new("builder-1", "worker_done", "done", 0),
            )
            .unwrap();
    });

    let opts =
        MailWaitOptions::for_capability("coordinator", Capability::Coordinator);
    let outcome = mail_wait(&f.broker, &opts).await.unwrap();
    assert_eq!(outcome.status, MailWaitStatus::Nudged);
    assert_eq!(outcome.nudge.unwrap().from, "builder-1");
    assert!(outcome.messages.is_empty());

    // The wake consumed the marker
    let nudges = NudgeStore::open(&f.layout).unwrap();
    assert!(nudges.peek("coordinator").unwrap().is_none());
}

#[tokio::test(start_paused = true)]
async fn worker_roles_sleep_through_nudges() {
    let f = fixture();
    seed(&f, "builder-1", Capability::Builder);
    let nudges = NudgeStore::open(&f.layout).unwrap();
    nudges
        .write("builder-1", &NudgeMarker::new("x", "mail", "s", 0))
        .unwrap();

    let mut opts = MailWaitOptions::for_capability("builder-1", Capability::Builder);
    opts.timeout_ms = 5_000;
    let outcome = mail_wait(&f.broker, &opts).await.unwrap();
    assert_eq!(outcome.status, MailWaitStatus::Timeout);

    // Marker untouched: builders only wake on actual mail
    assert!(nudges.peek("builder-1").unwrap().is_some());
}

#[tokio::test(start_paused = true)]
async fn times_out_with_no_traffic() {
    let f = fixture();
    let mut opts = MailWaitOptions::new("coordinator");
    opts.timeout_ms = 30_000;

    let started = tokio::time::Instant::now();
    let outcome = mail_wait(&f.broker, &opts).await.unwrap();
    assert_eq!(outcome.status, MailWaitStatus::Timeout);
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(30));
    // Bounded overshoot: the final sleep is clamped to the remaining time
    assert!(elapsed < Duration::from_secs(31));
}

#[tokio::test(start_paused = true)]
async fn cancel_file_stops_the_wait() {
    let f = fixture();
    let cancel = f.layout.root().join("wait.cancel");
    let cancel_for_task = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(2)).await;
        std::fs::write(&cancel_for_task, "").unwrap();
    });

    let mut opts = MailWaitOptions::new("coordinator");
    opts.cancel_file = Some(cancel);
    let outcome = mail_wait(&f.broker, &opts).await.unwrap();
    assert_eq!(outcome.status, MailWaitStatus::Cancelled);
}

#[tokio::test(start_paused = true)]
async fn wait_heartbeats_the_agent() {
    let f = fixture();
    seed(&f, "coordinator", Capability::Coordinator);

    f.clock.set(500_000);
    let mut opts = MailWaitOptions::new("coordinator");
    opts.timeout_ms = 1_000;
    mail_wait(&f.broker, &opts).await.unwrap();

    let sessions = SessionStore::open(&f.layout).unwrap();
    let s = sessions.get_by_name("coordinator").unwrap().unwrap();
    assert_eq!(s.last_activity, 500_000);
}

#[tokio::test]
async fn backoff_below_one_is_rejected() {
    let f = fixture();
    let mut opts = MailWaitOptions::new("coordinator");
    opts.backoff = 0.5;
    assert!(matches!(
        mail_wait(&f.broker, &opts).await,
        Err(EngineError::InvalidBackoff(_))
    ));
}
