//! # CLI Command Implementations
//!
//! Each subcommand of `dependabot-sync` lives in its own file with:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and performs the
//!   command's logic by calling into the `dependabot_sync` library.

pub mod completions;
pub mod detect;
pub mod sync;
pub mod validate;

use anyhow::Result;
use std::path::Path;

use dependabot_sync::detector::IndicatorCatalog;
use dependabot_sync::suggestions;

/// The catalog from `--catalog`, or the built-in one
pub(crate) fn load_catalog(path: Option<&Path>) -> Result<IndicatorCatalog> {
    match path {
        Some(path) => {
            IndicatorCatalog::from_file(path).map_err(|err| suggestions::invalid_catalog(path, &err))
        }
        None => Ok(IndicatorCatalog::builtin()),
    }
}
