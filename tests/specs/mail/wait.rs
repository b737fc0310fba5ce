use crate::prelude::TestProject;

#[test]
fn wait_returns_immediately_when_mail_is_pending() {
    let project = TestProject::new();
    project
        .ovs()
        .args([
            "mail", "send", "--from", "a", "--to", "coordinator", "--subject", "s", "--body", "x",
        ])
        .assert()
        .success();

    let outcome = project.json(&[
        "mail", "wait", "--agent", "coordinator", "--timeout-ms", "5000",
    ]);
    assert_eq!(outcome["status"], "message");
    assert_eq!(outcome["messages"].as_array().unwrap().len(), 1);
}

#[test]
fn wait_times_out_quickly_on_an_empty_inbox() {
    let project = TestProject::new();
    let outcome = project.json(&[
        "mail", "wait", "--agent", "coordinator", "--timeout-ms", "300", "--initial-poll-ms",
        "50",
    ]);
    assert_eq!(outcome["status"], "timeout");
    assert!(outcome["messages"].as_array().unwrap().is_empty());
}

#[test]
fn coordinator_wait_wakes_on_a_preexisting_nudge() {
    let project = TestProject::new();
    project.seed_agent("coordinator", "coordinator");
    project
        .ovs()
        .args([
            "nudge", "send", "coordinator", "--from", "builder-1", "--subject", "done",
            "--force",
        ])
        .assert()
        .success();

    let outcome = project.json(&[
        "mail", "wait", "--agent", "coordinator", "--timeout-ms", "5000",
    ]);
    assert_eq!(outcome["status"], "nudged");
    assert_eq!(outcome["nudge"]["from"], "builder-1");
}

#[test]
fn worker_wait_ignores_nudges() {
    let project = TestProject::new();
    project.seed_agent("builder-1", "builder");
    project
        .ovs()
        .args([
            "nudge", "send", "builder-1", "--from", "coordinator", "--subject", "hi", "--force",
        ])
        .assert()
        .success();

    let outcome = project.json(&[
        "mail", "wait", "--agent", "builder-1", "--timeout-ms", "300", "--initial-poll-ms",
        "50",
    ]);
    assert_eq!(outcome["status"], "timeout");
}
