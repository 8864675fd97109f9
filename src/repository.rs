//! # Repository Sources
//!
//! The detector and merge engine never touch a repository directly. Everything
//! they need from one, its file tree, its topics and its current dependabot
//! configuration, comes through the [`RepositorySource`] trait, and the merged
//! document goes back out through it.
//!
//! ## Design
//!
//! The trait separates the synchronization pipeline from where repositories
//! actually live. [`LocalRepository`] serves a checkout on disk, which is what
//! the CLI uses. Tests swap in in-memory implementations to simulate listing
//! failures, missing files and recorded writes without a filesystem.

use crate::config::{self, DependabotConfig};
use crate::defaults::{CONFIG_FILE, CONFIG_FILE_ALT};
use crate::error::{Error, Result};
use log::debug;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Everything the synchronization pipeline needs from one repository
pub trait RepositorySource: Send + Sync {
    /// Human-readable identifier used in logs and reports
    fn name(&self) -> String;

    /// Every file in the repository as a `/`-separated path relative to its root
    fn list_files(&self) -> Result<Vec<String>>;

    /// Topics the repository is tagged with
    fn topics(&self) -> Vec<String>;

    /// The current dependabot configuration, `None` when the repository has none
    fn read_config(&self) -> Result<Option<DependabotConfig>>;

    /// Store a new dependabot configuration
    fn write_config(&self, config: &DependabotConfig) -> Result<()>;
}

/// A repository checked out on the local filesystem
#[derive(Debug, Clone)]
pub struct LocalRepository {
    root: PathBuf,
    name: String,
    topics: Vec<String>,
}

impl LocalRepository {
    /// Serve the checkout at `root`, named after its final path component
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| root.display().to_string());
        Self {
            root,
            name,
            topics: Vec::new(),
        }
    }

    /// Attach topics, normally taken from `--topic`
    pub fn with_topics(mut self, topics: Vec<String>) -> Self {
        self.topics = topics;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The configuration file that exists, preferring `dependabot.yml`
    fn existing_config_path(&self) -> Option<PathBuf> {
        [CONFIG_FILE, CONFIG_FILE_ALT]
            .iter()
            .map(|rel| self.root.join(rel))
            .find(|path| path.is_file())
    }

    /// Where the configuration is written: the existing file, else `dependabot.yml`
    pub fn config_path(&self) -> PathBuf {
        self.existing_config_path()
            .unwrap_or_else(|| self.root.join(CONFIG_FILE))
    }

    fn not_a_checkout(&self) -> Error {
        Error::Repository {
            repository: self.name.clone(),
            message: format!("{} is not a directory", self.root.display()),
        }
    }
}

impl RepositorySource for LocalRepository {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn list_files(&self) -> Result<Vec<String>> {
        if !self.root.is_dir() {
            return Err(self.not_a_checkout());
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.file_name() != ".git");

        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            let parts: Vec<String> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            files.push(parts.join("/"));
        }

        debug!("Listed {} files in {}", files.len(), self.name);
        Ok(files)
    }

    fn topics(&self) -> Vec<String> {
        self.topics.clone()
    }

    fn read_config(&self) -> Result<Option<DependabotConfig>> {
        match self.existing_config_path() {
            Some(path) => config::from_file(&path).map(Some),
            None => Ok(None),
        }
    }

    fn write_config(&self, config: &DependabotConfig) -> Result<()> {
        if !self.root.is_dir() {
            return Err(self.not_a_checkout());
        }
        let path = self.config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, config.to_yaml_string()?)?;
        debug!("Wrote {}", path.display());
        Ok(())
    }
}
