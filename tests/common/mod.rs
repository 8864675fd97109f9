//! Shared test utilities for integration and E2E tests.
//!
//! This module provides template snippets and a workspace fixture holding a
//! template directory next to any number of repository checkouts.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let ws = Workspace::new()
//!         .with_template("npm", templates::NPM)
//!         .with_repo_file("web", "package.json", "{}");
//!     ws.command().arg("sync").arg(ws.repo_path("web")).assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::templates;
    pub use super::Workspace;
}

/// Template documents used across tests.
#[allow(dead_code)]
pub mod templates {
    pub const NPM: &str = r#"version: 2
updates:
  - package-ecosystem: npm
    directory: /
    schedule:
      interval: weekly
      day: monday
    open-pull-requests-limit: 10
    labels: [dependencies, javascript]
    groups:
      dev-dependencies:
        dependency-type: development
"#;

    pub const DOCKER: &str = r#"version: 2
updates:
  - package-ecosystem: docker
    directory: /
    schedule:
      interval: monthly
    labels: [dependencies, docker]
"#;

    /// Relies on the directory name for its ecosystem tag.
    pub const GOLANG: &str = r#"version: 2
updates:
  - directory: /
    schedule:
      interval: daily
    commit-message:
      prefix: deps
"#;

    pub const INVALID: &str = "updates: [unclosed";
}

/// A temporary directory holding `configs/` and repository checkouts.
pub struct Workspace {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl Workspace {
    pub fn new() -> Self {
        let temp_dir = assert_fs::TempDir::new().expect("Failed to create temp directory");
        temp_dir
            .child("configs")
            .create_dir_all()
            .expect("Failed to create template directory");
        Self { temp_dir }
    }

    /// Add `configs/<name>/default.yml`.
    pub fn with_template(self, name: &str, content: &str) -> Self {
        self.temp_dir
            .child("configs")
            .child(name)
            .child("default.yml")
            .write_str(content)
            .expect("Failed to write template");
        self
    }

    /// Add a file to the checkout `repo`.
    pub fn with_repo_file(self, repo: &str, path: &str, content: &str) -> Self {
        self.temp_dir
            .child("repos")
            .child(repo)
            .child(path)
            .write_str(content)
            .expect("Failed to write repository file");
        self
    }

    /// Add an existing `.github/dependabot.yml` to the checkout `repo`.
    pub fn with_existing_config(self, repo: &str, content: &str) -> Self {
        self.with_repo_file(repo, ".github/dependabot.yml", content)
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn templates_path(&self) -> PathBuf {
        self.temp_dir.path().join("configs")
    }

    pub fn repo_path(&self, repo: &str) -> PathBuf {
        self.temp_dir.path().join("repos").join(repo)
    }

    pub fn config_path(&self, repo: &str) -> PathBuf {
        self.repo_path(repo).join(".github/dependabot.yml")
    }

    /// The written configuration of `repo`, if any.
    pub fn read_config(&self, repo: &str) -> Option<String> {
        std::fs::read_to_string(self.config_path(repo)).ok()
    }

    /// A command running in the workspace with plain output and templates set.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("dependabot-sync");
        cmd.current_dir(self.path())
            .env_remove("RUST_LOG")
            .env_remove("DEPENDABOT_SYNC_CONCURRENCY")
            .env("DEPENDABOT_SYNC_TEMPLATES", self.templates_path())
            .arg("--color")
            .arg("never");
        cmd
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}
