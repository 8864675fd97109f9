//! # Ecosystem Detector
//!
//! Infers which package ecosystems a repository uses from the paths in its
//! file tree. No file contents are needed: every path is tested against the
//! indicators of every ecosystem in the [`IndicatorCatalog`], and each match
//! contributes evidence.
//!
//! ## Scoring
//!
//! An ecosystem's confidence is the **maximum** weight among its matching
//! indicators. A lock file (weight 1.0) next to a bare manifest (0.8) yields
//! 1.0, never a sum.
//!
//! ## Directories
//!
//! Every match records the directory that contains the file, so a monorepo
//! with `package.json` at the root and in `packages/ui` yields one npm
//! ecosystem with directories `/` and `/packages/ui`. Root-only ecosystems
//! (container images, workflows, infrastructure code, submodules) always
//! record `/` no matter where the file was found.
//!
//! ## Exclusion
//!
//! [`has_exclusion_topic`] is a separate check run before detection: a
//! repository tagged with an exclusion topic is not processed at all.

pub mod catalog;

pub use catalog::{EcosystemIndicators, Indicator, IndicatorCatalog};

use crate::error::{Error, Result};
use crate::path::{containing_directory, ROOT_DIRECTORY};
use crate::repository::RepositorySource;
use log::debug;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// Topics that opt a repository out of dependabot management
pub const DEFAULT_EXCLUSION_TOPICS: &[&str] =
    &["no-dependabot", "skip-dependabot", "exclude-dependabot"];

/// An ecosystem found in a repository
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectedEcosystem {
    /// Detector-internal identifier
    pub name: String,
    /// Tag written to `package-ecosystem`
    pub ecosystem: String,
    /// Directories holding evidence, `/`-rooted
    pub directories: BTreeSet<String>,
    /// Strongest indicator weight seen, in [0, 1]
    pub confidence: f64,
}

impl DetectedEcosystem {
    /// An ecosystem detected with the given directories
    pub fn new<I, S>(ecosystem: &str, directories: I, confidence: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: ecosystem.to_string(),
            ecosystem: ecosystem.to_string(),
            directories: directories.into_iter().map(Into::into).collect(),
            confidence,
        }
    }
}

/// Detects ecosystems against a fixed catalog
#[derive(Debug, Clone, Default)]
pub struct Detector {
    catalog: IndicatorCatalog,
}

impl Detector {
    pub fn new(catalog: IndicatorCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &IndicatorCatalog {
        &self.catalog
    }

    /// Detect ecosystems from a flat list of repository paths
    ///
    /// The result is ordered by descending confidence, ties broken by tag.
    /// An empty or indicator-free tree yields an empty list.
    ///
    /// # Examples
    ///
    /// ```
    /// use dependabot_sync::detector::Detector;
    ///
    /// let detector = Detector::default();
    /// let found = detector.detect(&["package-lock.json", "package.json", "web/package.json"]);
    /// assert_eq!(found.len(), 1);
    /// assert_eq!(found[0].ecosystem, "npm");
    /// assert_eq!(found[0].confidence, 1.0);
    /// assert_eq!(found[0].directories.len(), 2);
    /// ```
    pub fn detect<S: AsRef<str>>(&self, paths: &[S]) -> Vec<DetectedEcosystem> {
        let mut found: BTreeMap<&str, DetectedEcosystem> = BTreeMap::new();

        for path in paths {
            let path = path.as_ref();
            let directory = containing_directory(path);

            for entry in self.catalog.entries() {
                for indicator in &entry.indicators {
                    if !indicator.matches(path) {
                        continue;
                    }

                    let detected = found
                        .entry(entry.ecosystem.as_str())
                        .or_insert_with(|| DetectedEcosystem {
                            name: entry.ecosystem.clone(),
                            ecosystem: entry.ecosystem.clone(),
                            directories: BTreeSet::new(),
                            confidence: 0.0,
                        });
                    detected.confidence = detected.confidence.max(indicator.weight);

                    let recorded = if entry.root_only {
                        ROOT_DIRECTORY.to_string()
                    } else {
                        directory.clone()
                    };
                    detected.directories.insert(recorded);
                }
            }
        }

        let mut result: Vec<DetectedEcosystem> = found.into_values().collect();
        result.sort_by(by_confidence_then_tag);

        for eco in &result {
            debug!(
                "Detected {} (confidence {:.2}) in {:?}",
                eco.ecosystem, eco.confidence, eco.directories
            );
        }

        result
    }

    /// List a repository's tree and detect ecosystems in it
    ///
    /// A listing failure is returned as `Error::DetectionFailed` carrying the
    /// underlying cause.
    pub fn detect_tree(&self, source: &dyn RepositorySource) -> Result<Vec<DetectedEcosystem>> {
        let paths = source.list_files().map_err(|err| Error::DetectionFailed {
            repository: source.name(),
            source: Box::new(err),
        })?;
        Ok(self.detect(&paths))
    }
}

fn by_confidence_then_tag(a: &DetectedEcosystem, b: &DetectedEcosystem) -> Ordering {
    b.confidence
        .total_cmp(&a.confidence)
        .then_with(|| a.ecosystem.cmp(&b.ecosystem))
}

/// Whether any topic is in the exclusion vocabulary
///
/// # Examples
///
/// ```
/// use dependabot_sync::detector::{has_exclusion_topic, DEFAULT_EXCLUSION_TOPICS};
///
/// assert!(has_exclusion_topic(&["frontend", "skip-dependabot"], DEFAULT_EXCLUSION_TOPICS));
/// assert!(!has_exclusion_topic(&["frontend", "backend"], DEFAULT_EXCLUSION_TOPICS));
/// ```
pub fn has_exclusion_topic<T, V>(topics: &[T], vocabulary: &[V]) -> bool
where
    T: AsRef<str>,
    V: AsRef<str>,
{
    topics
        .iter()
        .any(|topic| vocabulary.iter().any(|ex| ex.as_ref() == topic.as_ref()))
}
