use crate::prelude::TestProject;

#[test]
fn reply_derives_recipient_subject_and_thread() {
    let project = TestProject::new();
    let ids = project.json(&[
        "mail", "send", "--from", "coordinator", "--to", "builder-1", "--subject",
        "build the parser", "--body", "go",
    ]);
    let original_id = ids[0].as_str().unwrap();

    project
        .ovs()
        .args([
            "mail", "reply", original_id, "--from", "builder-1", "--body", "done, branch pushed",
        ])
        .assert()
        .success();

    let inbox = project.json(&["mail", "check", "coordinator"]);
    let inbox = inbox.as_array().unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0]["to"], "coordinator");
    assert_eq!(inbox[0]["from"], "builder-1");
    assert_eq!(inbox[0]["subject"], "Re: build the parser");
    assert_eq!(inbox[0]["thread_id"], *original_id);
}

#[test]
fn reply_to_a_reply_stays_in_one_thread() {
    let project = TestProject::new();
    let ids = project.json(&[
        "mail", "send", "--from", "a", "--to", "b", "--subject", "plan", "--body", "x",
    ]);
    let root = ids[0].as_str().unwrap().to_string();

    project
        .ovs()
        .args(["mail", "reply", root.as_str(), "--from", "b", "--body", "ack"])
        .assert()
        .success();
    let reply_id = project.json(&["mail", "list", "--to", "a"])[0]["id"]
        .as_str()
        .unwrap()
        .to_string();

    project
        .ovs()
        .args(["mail", "reply", reply_id.as_str(), "--from", "a", "--body", "thanks"])
        .assert()
        .success();

    let to_b = project.json(&["mail", "list", "--to", "b"]);
    let second_reply = to_b
        .as_array()
        .unwrap()
        .iter()
        .find(|m| m["subject"] == "Re: plan")
        .cloned()
        .unwrap();
    assert_eq!(second_reply["thread_id"], serde_json::json!(root));
}
