use crate::prelude::TestProject;

#[test]
fn run_pointer_set_show_clear() {
    let project = TestProject::new();

    let output = project.ovs().args(["run", "show"]).output().unwrap();
    assert!(String::from_utf8_lossy(&output.stdout).contains("no active run"));

    project.ovs().args(["run", "set", "run-42"]).assert().success();
    let output = project.ovs().args(["run", "show"]).output().unwrap();
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "run-42");

    // The pointer is the contractual current-run file
    let content = std::fs::read_to_string(project.state_dir().join("current-run")).unwrap();
    assert_eq!(content.trim(), "run-42");

    project.ovs().args(["run", "clear"]).assert().success();
    let output = project.ovs().args(["run", "show"]).output().unwrap();
    assert!(String::from_utf8_lossy(&output.stdout).contains("no active run"));
}

#[test]
fn events_tail_is_empty_on_a_fresh_project() {
    let project = TestProject::new();
    let events = project.json(&["events", "tail"]);
    assert!(events.as_array().unwrap().is_empty());
}
