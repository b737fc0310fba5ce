use crate::prelude::TestProject;

#[test]
fn send_then_check_roundtrip() {
    let project = TestProject::new();

    let ids = project.json(&[
        "mail", "send", "--from", "coordinator", "--to", "builder-1", "--subject",
        "build the parser", "--body", "see bead ovs-12",
    ]);
    let ids = ids.as_array().unwrap();
    assert_eq!(ids.len(), 1);

    let inbox = project.json(&["mail", "check", "builder-1"]);
    let inbox = inbox.as_array().unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0]["from"], "coordinator");
    assert_eq!(inbox[0]["subject"], "build the parser");
    assert_eq!(inbox[0]["type"], "status");
    assert_eq!(inbox[0]["read"], true);

    // Check marked everything read
    let second = project.json(&["mail", "check", "builder-1"]);
    assert!(second.as_array().unwrap().is_empty());
}

#[test]
fn list_filters_by_agent_and_unread() {
    let project = TestProject::new();
    for (from, to) in [("a", "b"), ("b", "a"), ("c", "d")] {
        project
            .ovs()
            .args([
                "mail", "send", "--from", from, "--to", to, "--subject", "s", "--body", "x",
            ])
            .assert()
            .success();
    }

    let about_a = project.json(&["mail", "list", "--agent", "a"]);
    assert_eq!(about_a.as_array().unwrap().len(), 2);

    project.ovs().args(["mail", "check", "b"]).assert().success();
    let unread = project.json(&["mail", "list", "--unread"]);
    assert_eq!(unread.as_array().unwrap().len(), 2);
}

#[test]
fn show_and_mark_read() {
    let project = TestProject::new();
    let ids = project.json(&[
        "mail", "send", "--from", "a", "--to", "b", "--subject", "s", "--body", "hello",
    ]);
    let id = ids[0].as_str().unwrap();

    let shown = project.json(&["mail", "show", id]);
    assert_eq!(shown["body"], "hello");
    assert_eq!(shown["read"], false);

    let output = project.ovs().args(["mail", "read", id]).output().unwrap();
    assert!(String::from_utf8_lossy(&output.stdout).contains("marked read"));

    // Idempotent: second read reports prior state
    let output = project.ovs().args(["mail", "read", id]).output().unwrap();
    assert!(String::from_utf8_lossy(&output.stdout).contains("already read"));
}

#[test]
fn purge_all_empties_the_store() {
    let project = TestProject::new();
    project
        .ovs()
        .args([
            "mail", "send", "--from", "a", "--to", "b", "--subject", "s", "--body", "x",
        ])
        .assert()
        .success();

    let output = project.ovs().args(["mail", "purge", "--all"]).output().unwrap();
    assert!(String::from_utf8_lossy(&output.stdout).contains("purged 1"));

    let left = project.json(&["mail", "list"]);
    assert!(left.as_array().unwrap().is_empty());
}
