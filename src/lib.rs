//! # Dependabot Sync Library
//!
//! This library keeps `.github/dependabot.yml` files standardized across the
//! repositories of an organization. It is designed to be used by the
//! `dependabot-sync` command-line tool but can also be embedded in other
//! automation that already knows how to reach repositories.
//!
//! ## Quick Example
//!
//! ```
//! use dependabot_sync::detector::Detector;
//! use dependabot_sync::merge::Merger;
//! use dependabot_sync::templates::TemplateSet;
//!
//! let detector = Detector::default();
//! let detected = detector.detect(&["package.json", "web/package.json", "Dockerfile"]);
//!
//! let merger = Merger::new(TemplateSet::new(), detector.catalog().root_only_tags());
//! let config = merger.merge(None, &detected);
//!
//! let rules: Vec<(&str, &str)> = config
//!     .updates
//!     .iter()
//!     .map(|r| (r.package_ecosystem.as_str(), r.directory.as_str()))
//!     .collect();
//! assert_eq!(rules, vec![("docker", "/"), ("npm", "/"), ("npm", "/web")]);
//! ```
//!
//! ## Core Concepts
//!
//! - **Configuration (`config`)**: The typed dependabot document, its parser
//!   and serializer. Equality is deep and decides whether anything changed.
//! - **Detection (`detector`, `path`)**: Infers package ecosystems from a flat
//!   list of file paths using a weighted indicator catalog, with monorepo
//!   directory tracking and root-only ecosystems.
//! - **Merging (`merge`)**: Combines organization templates with a
//!   repository's existing configuration through a per-field policy table. The
//!   result is sorted and idempotent.
//! - **Collaborators (`templates`, `repository`, `sync`)**: Load templates from
//!   disk, abstract where repositories live, and drive the whole pipeline over
//!   many repositories on a bounded worker pool.
//!
//! ## Execution Flow
//!
//! For every repository the [`sync::Synchronizer`] runs:
//!
//! 1.  **Exclusion**: Skip repositories tagged with an exclusion topic.
//! 2.  **Detection**: List the file tree and detect ecosystems.
//! 3.  **Merge**: Merge templates with the existing configuration.
//! 4.  **Write**: Store the result when it differs from what is there.

pub mod config;
pub mod defaults;
pub mod detector;
pub mod error;
pub mod merge;
pub mod output;
pub mod path;
pub mod repository;
pub mod suggestions;
pub mod sync;
pub mod templates;

#[cfg(test)]
mod path_proptest;
