//! Shared helpers for CLI specs.

use assert_cmd::Command;
use std::path::PathBuf;

/// A temporary project with its own state directory.
pub struct TestProject {
    root: tempfile::TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().expect("tempdir"),
        }
    }

    pub fn state_dir(&self) -> PathBuf {
        self.root.path().join(".overstory")
    }

    /// An `ovs` invocation rooted in this project.
    pub fn ovs(&self) -> Command {
        let mut cmd = Command::cargo_bin("ovs").expect("ovs binary");
        cmd.current_dir(self.root.path())
            .env("OVERSTORY_STATE_DIR", self.state_dir());
        cmd
    }

    /// Seed an agent session via the spawn-path CLI surface.
    pub fn seed_agent(&self, name: &str, capability: &str) {
        let tmux = format!("ovs-{name}");
        self.ovs()
            .args([
                "session",
                "upsert",
                "--name",
                name,
                "--capability",
                capability,
                "--tmux",
                tmux.as_str(),
            ])
            .assert()
            .success();
    }

    /// Parse the stdout of a successful command as JSON.
    pub fn json(&self, args: &[&str]) -> serde_json::Value {
        let output = self
            .ovs()
            .args(args)
            .arg("-o")
            .arg("json")
            .output()
            .expect("run ovs");
        assert!(
            output.status.success(),
            "ovs {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).expect("json stdout")
    }
}
