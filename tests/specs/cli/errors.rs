use crate::prelude::TestProject;

fn send_args<'a>(kind: &'a str, priority: &'a str) -> Vec<&'a str> {
    vec![
        "mail", "send", "--from", "a", "--to", "b", "--subject", "s", "--body", "x", "--type",
        kind, "--priority", priority,
    ]
}

#[test]
fn unknown_mail_type_is_rejected() {
    let project = TestProject::new();
    let output = project.ovs().args(send_args("gossip", "normal")).output().unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("gossip"), "stderr: {stderr}");
}

#[test]
fn unknown_priority_is_rejected() {
    let project = TestProject::new();
    let output = project.ovs().args(send_args("status", "asap")).output().unwrap();
    assert!(!output.status.success());
}

#[test]
fn unknown_group_address_is_rejected() {
    let project = TestProject::new();
    let output = project
        .ovs()
        .args([
            "mail", "send", "--from", "a", "--to", "@janitors", "--subject", "s", "--body", "x",
        ])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("@janitors"), "stderr: {stderr}");
}

#[test]
fn reply_to_missing_message_fails() {
    let project = TestProject::new();
    let output = project
        .ovs()
        .args(["mail", "reply", "nope", "--from", "a", "--body", "x"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn purge_without_selector_is_refused() {
    let project = TestProject::new();
    let output = project.ovs().args(["mail", "purge"]).output().unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--all"), "stderr: {stderr}");
}

#[test]
fn invalid_wait_backoff_is_rejected() {
    let project = TestProject::new();
    let output = project
        .ovs()
        .args([
            "mail", "wait", "--agent", "a", "--timeout-ms", "100", "--backoff", "0.5",
        ])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn orphan_depth_is_rejected() {
    let project = TestProject::new();
    let output = project
        .ovs()
        .args([
            "session", "upsert", "--name", "a", "--capability", "builder", "--depth", "2",
        ])
        .output()
        .unwrap();
    assert!(!output.status.success());
}
