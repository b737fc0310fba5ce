use crate::prelude::TestProject;

#[test]
fn upsert_then_show() {
    let project = TestProject::new();
    project
        .ovs()
        .args([
            "session",
            "upsert",
            "--name",
            "builder-1",
            "--capability",
            "builder",
            "--branch",
            "ovs/builder-1",
            "--bead",
            "ovs-12",
            "--tmux",
            "ovs-builder-1",
            "--run",
            "run-1",
        ])
        .assert()
        .success();

    let session = project.json(&["session", "show", "builder-1"]);
    assert_eq!(session["agent_name"], "builder-1");
    assert_eq!(session["capability"], "builder");
    assert_eq!(session["state"], "booting");
    assert_eq!(session["bead_id"], "ovs-12");
    assert_eq!(session["run_id"], "run-1");
    assert_eq!(session["depth"], 0);
    assert_eq!(session["escalation_level"], 0);
}

#[test]
fn upsert_preserves_unspecified_fields() {
    let project = TestProject::new();
    project
        .ovs()
        .args([
            "session", "upsert", "--name", "builder-1", "--capability", "builder", "--bead",
            "ovs-12",
        ])
        .assert()
        .success();
    project
        .ovs()
        .args([
            "session", "upsert", "--name", "builder-1", "--capability", "builder", "--run",
            "run-2",
        ])
        .assert()
        .success();

    let session = project.json(&["session", "show", "builder-1"]);
    assert_eq!(session["bead_id"], "ovs-12");
    assert_eq!(session["run_id"], "run-2");
}

#[test]
fn list_filters_by_run_and_active() {
    let project = TestProject::new();
    project
        .ovs()
        .args([
            "session", "upsert", "--name", "a", "--capability", "builder", "--run", "run-1",
        ])
        .assert()
        .success();
    project.seed_agent("b", "reviewer");

    let run1 = project.json(&["session", "list", "--run", "run-1"]);
    assert_eq!(run1.as_array().unwrap().len(), 1);

    let active = project.json(&["session", "list", "--active"]);
    assert_eq!(active.as_array().unwrap().len(), 2);
}

#[test]
fn touch_promotes_booting_to_working() {
    let project = TestProject::new();
    project.seed_agent("builder-1", "builder");

    project
        .ovs()
        .args(["session", "touch", "builder-1"])
        .assert()
        .success();

    let session = project.json(&["session", "show", "builder-1"]);
    assert_eq!(session["state"], "working");
}

#[test]
fn child_sessions_carry_parent_and_depth() {
    let project = TestProject::new();
    project.seed_agent("lead-1", "lead");
    project
        .ovs()
        .args([
            "session", "upsert", "--name", "builder-1", "--capability", "builder", "--parent",
            "lead-1", "--depth", "1",
        ])
        .assert()
        .success();

    let session = project.json(&["session", "show", "builder-1"]);
    assert_eq!(session["parent_agent"], "lead-1");
    assert_eq!(session["depth"], 1);
}

#[test]
fn show_unknown_agent_fails() {
    let project = TestProject::new();
    let output = project.ovs().args(["session", "show", "ghost"]).output().unwrap();
    assert!(!output.status.success());
}
