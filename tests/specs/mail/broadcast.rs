use crate::prelude::TestProject;

#[test]
fn high_priority_broadcast_fans_out_with_nudges() {
    let project = TestProject::new();
    project.seed_agent("builder-1", "builder");
    project.seed_agent("builder-2", "builder");
    project.seed_agent("scout-1", "scout");
    project.seed_agent("coordinator", "coordinator");

    let ids = project.json(&[
        "mail", "send", "--from", "coordinator", "--to", "@workers", "--subject",
        "new instructions", "--body", "check the plan", "--priority", "high",
    ]);
    // Three workers; the coordinator is excluded as sender and as
    // non-worker
    assert_eq!(ids.as_array().unwrap().len(), 3);

    for agent in ["builder-1", "builder-2", "scout-1"] {
        let inbox = project.json(&["mail", "check", agent]);
        assert_eq!(inbox.as_array().unwrap().len(), 1, "inbox of {agent}");

        // High priority wrote a pending-nudge marker for each recipient
        let nudge = project.json(&["nudge", "check", agent]);
        assert_eq!(nudge["from"], "coordinator", "nudge of {agent}");
    }

    let own = project.json(&["mail", "check", "coordinator"]);
    assert!(own.as_array().unwrap().is_empty());
}

#[test]
fn capability_group_hits_only_that_capability() {
    let project = TestProject::new();
    project.seed_agent("builder-1", "builder");
    project.seed_agent("reviewer-1", "reviewer");

    let ids = project.json(&[
        "mail", "send", "--from", "coordinator", "--to", "@reviewer", "--subject", "s",
        "--body", "x",
    ]);
    assert_eq!(ids.as_array().unwrap().len(), 1);
    assert_eq!(
        project.json(&["mail", "check", "reviewer-1"]).as_array().unwrap().len(),
        1
    );
    assert!(project.json(&["mail", "check", "builder-1"]).as_array().unwrap().is_empty());
}

#[test]
fn broadcast_with_no_active_members_sends_nothing() {
    let project = TestProject::new();
    let ids = project.json(&[
        "mail", "send", "--from", "coordinator", "--to", "@workers", "--subject", "s",
        "--body", "x",
    ]);
    assert!(ids.as_array().unwrap().is_empty());
}
