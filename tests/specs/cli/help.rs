use crate::prelude::TestProject;
use assert_cmd::Command;

#[test]
fn help_lists_subcommands() {
    let output = Command::cargo_bin("ovs")
        .unwrap()
        .arg("--help")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for subcommand in ["mail", "session", "nudge", "run", "events"] {
        assert!(stdout.contains(subcommand), "missing {subcommand}");
    }
}

#[test]
fn version_prints() {
    Command::cargo_bin("ovs")
        .unwrap()
        .arg("--version")
        .assert()
        .success();
}

#[test]
fn mail_help_shows_send_flags() {
    let project = TestProject::new();
    let output = project.ovs().args(["mail", "send", "--help"]).output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--from"));
    assert!(stdout.contains("--priority"));
    assert!(stdout.contains("--force"));
}
