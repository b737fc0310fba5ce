use crate::prelude::TestProject;

#[test]
fn nudge_unknown_agent_is_not_delivered() {
    let project = TestProject::new();
    let result = project.json(&[
        "nudge", "send", "ghost", "--from", "watchdog", "--subject", "hello",
    ]);
    assert_eq!(result["delivered"], false);
    assert_eq!(result["reason"], "unknown agent");
}

#[test]
fn nudge_check_reads_and_clears() {
    let project = TestProject::new();
    project.seed_agent("builder-1", "builder");
    project
        .ovs()
        .args([
            "nudge", "send", "builder-1", "--from", "coordinator", "--reason", "dispatch",
            "--subject", "new work",
        ])
        .assert()
        .success();

    let marker = project.json(&["nudge", "check", "builder-1"]);
    assert_eq!(marker["from"], "coordinator");
    assert_eq!(marker["reason"], "dispatch");
    assert_eq!(marker["subject"], "new work");

    // Cleared by the read
    let empty = project.json(&["nudge", "check", "builder-1"]);
    assert!(empty.is_null());
}

#[test]
fn newer_nudge_replaces_older() {
    let project = TestProject::new();
    project.seed_agent("builder-1", "builder");
    for subject in ["first", "second"] {
        project
            .ovs()
            .args([
                "nudge", "send", "builder-1", "--from", "coordinator", "--subject", subject,
            ])
            .assert()
            .success();
    }

    let marker = project.json(&["nudge", "check", "builder-1"]);
    assert_eq!(marker["subject"], "second");
    assert!(project.json(&["nudge", "check", "builder-1"]).is_null());
}
