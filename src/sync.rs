//! # Synchronization Pipeline
//!
//! Drives the detector and the merge engine over one or many repositories:
//!
//! 1. **Exclusion**: a repository tagged with an exclusion topic is skipped
//!    before anything else is read.
//! 2. **Detection**: the file tree is listed and scanned for ecosystems. A
//!    repository with none is skipped.
//! 3. **Merge**: the current configuration, if any, is merged with the
//!    templates for the detected ecosystems.
//! 4. **Write**: the merged document is stored unless it equals the current
//!    one or this is a dry run.
//!
//! Many repositories are processed on a dedicated rayon pool whose size bounds
//! how many are in flight at once. A failing repository is reported alongside
//! the others and never aborts the batch.

use crate::config::DependabotConfig;
use crate::defaults::{DEFAULT_CONCURRENCY, MAX_CONCURRENCY};
use crate::detector::{has_exclusion_topic, Detector, DEFAULT_EXCLUSION_TOPICS};
use crate::error::Result;
use crate::merge::Merger;
use crate::repository::RepositorySource;
use log::info;
use rayon::prelude::*;

/// Knobs for a synchronization run
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Topics that opt a repository out
    pub exclusion_topics: Vec<String>,
    /// Compute changes without writing them
    pub dry_run: bool,
    /// Repositories processed at once, clamped to 1..=50
    pub concurrency: usize,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            exclusion_topics: DEFAULT_EXCLUSION_TOPICS
                .iter()
                .map(|t| t.to_string())
                .collect(),
            dry_run: false,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

/// What happened to one repository
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// Tagged with an exclusion topic
    Excluded,
    /// No ecosystem was detected
    NoEcosystems,
    /// The merged document equals the current one
    Unchanged,
    /// The merged document was written
    Written {
        config: DependabotConfig,
        created: bool,
    },
    /// The merged document differs but was not written
    DryRun {
        config: DependabotConfig,
        created: bool,
    },
}

impl SyncOutcome {
    /// Whether the repository's configuration differs from the merged one
    pub fn is_change(&self) -> bool {
        matches!(self, Self::Written { .. } | Self::DryRun { .. })
    }

    /// The merged document, when one was produced
    pub fn config(&self) -> Option<&DependabotConfig> {
        match self {
            Self::Written { config, .. } | Self::DryRun { config, .. } => Some(config),
            _ => None,
        }
    }
}

/// Result of synchronizing one repository within a batch
#[derive(Debug)]
pub struct SyncReport {
    pub repository: String,
    pub result: Result<SyncOutcome>,
}

/// Runs the detect, merge and write pipeline
#[derive(Debug, Clone)]
pub struct Synchronizer {
    detector: Detector,
    merger: Merger,
    options: SyncOptions,
}

impl Synchronizer {
    pub fn new(detector: Detector, merger: Merger, options: SyncOptions) -> Self {
        Self {
            detector,
            merger,
            options,
        }
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    /// Synchronize a single repository
    pub fn sync_repository(&self, source: &dyn RepositorySource) -> Result<SyncOutcome> {
        let name = source.name();

        if has_exclusion_topic(&source.topics(), &self.options.exclusion_topics) {
            info!("{}: excluded by topic", name);
            return Ok(SyncOutcome::Excluded);
        }

        let detected = self.detector.detect_tree(source)?;
        if detected.is_empty() {
            info!("{}: no ecosystems detected", name);
            return Ok(SyncOutcome::NoEcosystems);
        }

        let existing = source.read_config()?;
        let merged = self.merger.merge(existing.as_ref(), &detected);
        if existing.as_ref() == Some(&merged) {
            info!("{}: configuration is up to date", name);
            return Ok(SyncOutcome::Unchanged);
        }

        let created = existing.is_none();
        if self.options.dry_run {
            info!("{}: would write {} rules", name, merged.updates.len());
            return Ok(SyncOutcome::DryRun {
                config: merged,
                created,
            });
        }

        source.write_config(&merged)?;
        info!("{}: wrote {} rules", name, merged.updates.len());
        Ok(SyncOutcome::Written {
            config: merged,
            created,
        })
    }

    /// Synchronize many repositories in parallel
    ///
    /// Reports come back in the order of `sources`. Only failing to start the
    /// worker pool is an error; per-repository failures are in the reports.
    pub fn sync_all<R: RepositorySource>(&self, sources: &[R]) -> Result<Vec<SyncReport>> {
        let threads = self.options.concurrency.clamp(1, MAX_CONCURRENCY);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()?;

        let reports = pool.install(|| {
            sources
                .par_iter()
                .map(|source| SyncReport {
                    repository: source.name(),
                    result: self.sync_repository(source),
                })
                .collect()
        });
        Ok(reports)
    }
}
