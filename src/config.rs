//! # Configuration Model
//!
//! This module defines the typed representation of a dependabot configuration
//! document (`.github/dependabot.yml`) and the functions that read and write it.
//! The same types describe the organization's template documents, so a template
//! is simply a `DependabotConfig` whose rules carry the organization's policy.
//!
//! ## Key Components
//!
//! - **`DependabotConfig`**: The document itself, a schema version plus an
//!   ordered list of update rules. Equality is a deep, field-for-field
//!   comparison and is what callers use to decide whether a merged document
//!   differs from what is already stored.
//!
//! - **`UpdateRule`**: One package-ecosystem/directory combination, with its
//!   schedule, limits, labels, groups and the repository-specific trust lists.
//!
//! ## Serialization
//!
//! Keys are serialized in kebab-case exactly as dependabot expects. Optional
//! fields that hold their zero value are omitted so that a merged document
//! round-trips through `parse` and `to_yaml_string` without gaining keys.
//! Parsing is lenient: unknown keys are ignored and missing fields take their
//! defaults, so partial documents can still be merged.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Schema version written into every document this tool creates.
pub const SCHEMA_VERSION: u32 = 2;

fn default_version() -> u32 {
    SCHEMA_VERSION
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// A complete dependabot configuration document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependabotConfig {
    /// Schema version of the document
    #[serde(default = "default_version")]
    pub version: u32,
    /// Update rules, one per ecosystem/directory
    #[serde(default)]
    pub updates: Vec<UpdateRule>,
}

impl Default for DependabotConfig {
    fn default() -> Self {
        Self {
            version: SCHEMA_VERSION,
            updates: Vec::new(),
        }
    }
}

impl DependabotConfig {
    /// Create an empty document at the current schema version
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document at the current schema version holding `updates`
    pub fn with_updates(updates: Vec<UpdateRule>) -> Self {
        Self {
            version: SCHEMA_VERSION,
            updates,
        }
    }

    /// Iterate over the rules for one ecosystem tag
    pub fn rules_for<'a>(&'a self, ecosystem: &'a str) -> impl Iterator<Item = &'a UpdateRule> {
        self.updates
            .iter()
            .filter(move |rule| rule.package_ecosystem == ecosystem)
    }

    /// Serialize the document to YAML, always ending with a newline
    pub fn to_yaml_string(&self) -> Result<String> {
        let mut content = serde_yaml::to_string(self)?;
        if !content.ends_with('\n') {
            content.push('\n');
        }
        Ok(content)
    }
}

/// One package-ecosystem/directory combination to monitor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UpdateRule {
    /// Ecosystem tag, e.g. `npm` or `gomod`
    #[serde(default)]
    pub package_ecosystem: String,
    /// Directory the manifests live in, `/` for the repository root
    #[serde(default)]
    pub directory: String,
    #[serde(default)]
    pub schedule: Schedule,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub open_pull_requests_limit: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reviewers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assignees: Vec<String>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub milestone: u32,
    /// Dependency groups keyed by group name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub groups: BTreeMap<String, GroupConfig>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub versioning_strategy: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_message: Option<CommitMessage>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub target_branch: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub vendor: bool,
    #[serde(
        default,
        rename = "insecure-external-code-execution",
        skip_serializing_if = "String::is_empty"
    )]
    pub insecure: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub rebase_strategy: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore: Vec<IgnoreRule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allow: Vec<AllowRule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub registries: Vec<String>,
}

impl UpdateRule {
    /// Create a rule for `ecosystem` in `directory` with every other field unset
    pub fn new(ecosystem: impl Into<String>, directory: impl Into<String>) -> Self {
        Self {
            package_ecosystem: ecosystem.into(),
            directory: directory.into(),
            ..Self::default()
        }
    }
}

/// How often dependabot checks for updates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// `daily`, `weekly` or `monthly`
    #[serde(default)]
    pub interval: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub day: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub time: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub timezone: String,
}

impl Schedule {
    /// A schedule with only an interval set
    pub fn every(interval: impl Into<String>) -> Self {
        Self {
            interval: interval.into(),
            ..Self::default()
        }
    }
}

/// A dependency group definition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GroupConfig {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub dependency_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub patterns: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_patterns: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub update_types: Vec<String>,
}

/// Commit message conventions for update pull requests
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CommitMessage {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub prefix: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub prefix_development: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub include: String,
}

/// A dependency ignore rule
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct IgnoreRule {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub dependency_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub versions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub update_types: Vec<String>,
}

/// A dependency allow rule
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AllowRule {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub dependency_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub dependency_type: String,
}

/// Parse a dependabot configuration document from YAML
///
/// # Examples
///
/// ```
/// use dependabot_sync::config;
///
/// let doc = config::parse("version: 2\nupdates:\n  - package-ecosystem: npm\n    directory: /\n").unwrap();
/// assert_eq!(doc.updates.len(), 1);
/// assert_eq!(doc.updates[0].package_ecosystem, "npm");
/// ```
pub fn parse(content: &str) -> Result<DependabotConfig> {
    if content.trim().is_empty() {
        return Err(Error::ConfigParse {
            message: "document is empty".to_string(),
            hint: Some("A dependabot file needs at least 'version: 2'".to_string()),
        });
    }

    serde_yaml::from_str(content).map_err(|err| Error::ConfigParse {
        message: err.to_string(),
        hint: parse_hint(&err),
    })
}

fn parse_hint(err: &serde_yaml::Error) -> Option<String> {
    let message = err.to_string();
    if message.starts_with("invalid type: sequence") {
        Some("The document root must be a mapping with 'version' and 'updates'".to_string())
    } else if message.starts_with("updates:") {
        Some("'updates' must be a list of rules, each with 'package-ecosystem'".to_string())
    } else {
        None
    }
}

/// Read and parse a dependabot configuration file
pub fn from_file(path: &Path) -> Result<DependabotConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content).map_err(|err| match err {
        Error::ConfigParse { message, hint } => Error::ConfigParse {
            message: format!("{}: {}", path.display(), message),
            hint,
        },
        other => other,
    })
}
