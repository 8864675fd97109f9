//! # Error Handling
//!
//! This module defines the centralized error type for the `dependabot-sync`
//! library. It uses `thiserror` to build a single `Error` enum covering every
//! failure the collaborators around the core can hit, with descriptive
//! messages.
//!
//! The detector and the merge engine themselves are close to total: the merge
//! engine has no failure mode at all, and the detector only fails when the
//! repository file tree cannot be listed (`Error::DetectionFailed`). Every
//! other variant belongs to the boundary code that loads templates, reads and
//! writes configuration files, walks a checkout or runs the worker pool.
//!
//! The `Result` alias is used throughout the library.

use thiserror::Error;

/// Main error type for dependabot-sync operations
#[derive(Error, Debug)]
pub enum Error {
    /// The repository file tree could not be listed, so detection could not run.
    #[error("Ecosystem detection failed for {repository}: {source}")]
    DetectionFailed {
        repository: String,
        #[source]
        source: Box<Error>,
    },

    /// An existing dependabot configuration or a template could not be parsed.
    ///
    /// Includes an optional hint about how to fix it.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// A template file or the template directory could not be loaded.
    #[error("Template loading error: {path} - {message}")]
    TemplateLoad { path: String, message: String },

    /// An indicator catalog entry is invalid.
    #[error("Indicator catalog error for '{ecosystem}': {message}")]
    Catalog { ecosystem: String, message: String },

    /// A repository source could not be accessed.
    #[error("Repository error for {repository}: {message}")]
    Repository { repository: String, message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A glob pattern error, wrapped from `glob::PatternError`.
    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),

    /// A directory traversal error, wrapped from `walkdir::Error`.
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// The worker pool for parallel synchronization could not be started.
    #[error("Worker pool error: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
