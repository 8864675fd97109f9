//! # Detect Command Implementation
//!
//! This module implements the `detect` subcommand, which reports the package
//! ecosystems found in a local checkout without reading or writing any
//! dependabot configuration. Useful for checking a custom indicator catalog
//! before running `sync` with it.

use anyhow::Result;
use clap::{Args, ValueEnum};
use std::path::PathBuf;

use dependabot_sync::detector::{DetectedEcosystem, Detector};
use dependabot_sync::output::{emoji, OutputConfig};
use dependabot_sync::repository::LocalRepository;
use dependabot_sync::suggestions;

use super::load_catalog;

/// Output formats for detection results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DetectFormat {
    /// One line per ecosystem
    Text,
    /// A JSON array
    Json,
}

/// Show the package ecosystems detected in a repository checkout
#[derive(Args, Debug)]
pub struct DetectArgs {
    /// Local repository checkout to scan
    #[arg(value_name = "REPO", default_value = ".")]
    pub repository: PathBuf,

    /// YAML file replacing the built-in indicator catalog
    #[arg(long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = DetectFormat::Text)]
    pub format: DetectFormat,
}

/// Execute the `detect` command.
pub fn execute(args: DetectArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);

    if !args.repository.is_dir() {
        return Err(suggestions::repository_not_found(&args.repository));
    }

    let detector = Detector::new(load_catalog(args.catalog.as_deref())?);
    let repo = LocalRepository::new(&args.repository);
    let detected = detector.detect_tree(&repo)?;

    match args.format {
        DetectFormat::Json => println!("{}", serde_json::to_string_pretty(&detected)?),
        DetectFormat::Text => {
            if detected.is_empty() {
                println!(
                    "{} No ecosystems detected in {}",
                    emoji(&out, "🔍", "[SCAN]"),
                    args.repository.display()
                );
            }
            for eco in &detected {
                println!("{}", text_line(eco));
            }
        }
    }

    Ok(())
}

fn text_line(eco: &DetectedEcosystem) -> String {
    let directories: Vec<&str> = eco.directories.iter().map(String::as_str).collect();
    format!(
        "{:<16} {:.2}  {}",
        eco.ecosystem,
        eco.confidence,
        directories.join(", ")
    )
}
