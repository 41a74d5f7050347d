#![allow(dead_code)]

use assert_cmd::Command;
use tempfile::TempDir;

/// Isolated treelock home so tests never read the developer's config.
pub struct TestHome {
    dir: TempDir,
}

impl TestHome {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create test home directory"),
        }
    }

    pub fn path(&self) -> &std::path::Path {
        self.dir.path()
    }

    pub fn write_config(&self, contents: &str) -> &Self {
        std::fs::write(self.dir.path().join("config.toml"), contents)
            .expect("Failed to write config.toml");
        self
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("treelock").unwrap();
        cmd.env("TREELOCK_HOME", self.dir.path());
        cmd.env_remove("TREELOCK_ENGINE__UPGRADE_STRATEGY");
        cmd.env_remove("TREELOCK_TREE__REJECT_DUPLICATE_LABELS");
        cmd.env_remove("TREELOCK_OUTPUT__FLUSH_EACH_RESULT");
        cmd.env_remove("RUST_LOG");
        cmd
    }
}
