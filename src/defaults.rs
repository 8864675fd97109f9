//! Default values for dependabot-sync.
//!
//! This module provides centralized default values used across commands and
//! the merge engine, ensuring consistency and avoiding duplication.

use std::path::PathBuf;

/// Where a repository keeps its dependabot configuration
pub const CONFIG_FILE: &str = ".github/dependabot.yml";

/// Accepted alternative spelling, only consulted when reading
pub const CONFIG_FILE_ALT: &str = ".github/dependabot.yaml";

/// Interval of the rule synthesized for ecosystems without a template
pub const DEFAULT_INTERVAL: &str = "weekly";

/// Labels of the rule synthesized for ecosystems without a template
pub const DEFAULT_LABELS: &[&str] = &["dependencies"];

/// Open pull request limit of the rule synthesized for ecosystems without a template
pub const DEFAULT_OPEN_PULL_REQUESTS_LIMIT: u32 = 10;

/// Number of repositories processed at once
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Upper bound accepted for `--concurrency`
pub const MAX_CONCURRENCY: usize = 50;

/// Returns the default template directory.
///
/// This can be overridden by the `--templates` CLI flag or the
/// `DEPENDABOT_SYNC_TEMPLATES` environment variable.
pub fn default_templates_dir() -> PathBuf {
    PathBuf::from("./configs")
}
