//! # Sync Command Implementation
//!
//! This module implements the `sync` subcommand, which brings the dependabot
//! configuration of one or more local checkouts in line with the
//! organization's templates.
//!
//! ## Functionality
//!
//! - **Detection**: Scans each checkout for package ecosystems.
//! - **Merge**: Combines the templates with any existing `.github/dependabot.yml`.
//! - **Write**: Stores the result when it changed, unless `--dry-run` is set.
//! - **Parallelism**: Processes up to `--concurrency` checkouts at a time.
//!
//! A failure in one checkout is reported and the others continue; the command
//! exits non-zero if any checkout failed.

use anyhow::{Context, Result};
use clap::builder::RangedU64ValueParser;
use clap::Args;
use std::path::PathBuf;

use dependabot_sync::defaults::{self, DEFAULT_CONCURRENCY};
use dependabot_sync::detector::{Detector, DEFAULT_EXCLUSION_TOPICS};
use dependabot_sync::merge::Merger;
use dependabot_sync::output::{emoji, report_line, OutputConfig, Summary};
use dependabot_sync::repository::LocalRepository;
use dependabot_sync::suggestions;
use dependabot_sync::sync::{SyncOptions, Synchronizer};
use dependabot_sync::templates::TemplateSet;

use super::load_catalog;

/// Merge the organization templates into repository checkouts
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Local repository checkouts to synchronize
    #[arg(value_name = "REPO", required = true)]
    pub repositories: Vec<PathBuf>,

    /// Directory holding one template per ecosystem.
    ///
    /// Defaults to `./configs`.
    #[arg(short, long, value_name = "DIR", env = "DEPENDABOT_SYNC_TEMPLATES")]
    pub templates: Option<PathBuf>,

    /// YAML file replacing the built-in indicator catalog
    #[arg(long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Comma-separated topics that opt a repository out
    #[arg(long, value_name = "TOPICS", value_delimiter = ',')]
    pub exclude_topics: Vec<String>,

    /// Topic the checkouts are tagged with (repeatable)
    #[arg(long = "topic", value_name = "TOPIC")]
    pub topics: Vec<String>,

    /// Number of checkouts processed at once (1-50)
    #[arg(
        short = 'j',
        long,
        value_name = "N",
        env = "DEPENDABOT_SYNC_CONCURRENCY",
        default_value_t = DEFAULT_CONCURRENCY,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..=defaults::MAX_CONCURRENCY as u64)
    )]
    pub concurrency: usize,

    /// Show what would change without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Only print failures
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print the merged configuration of every changed checkout
    #[arg(short, long)]
    pub verbose: bool,
}

impl SyncArgs {
    fn exclusion_topics(&self) -> Vec<String> {
        if self.exclude_topics.is_empty() {
            DEFAULT_EXCLUSION_TOPICS
                .iter()
                .map(|t| t.to_string())
                .collect()
        } else {
            self.exclude_topics
                .iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect()
        }
    }
}

/// Execute the `sync` command.
///
/// # Arguments
/// * `args` - The command arguments
/// * `color_flag` - The value of the global --color flag ("always", "never", or "auto")
pub fn execute(args: SyncArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);

    let templates_dir = args
        .templates
        .clone()
        .unwrap_or_else(defaults::default_templates_dir);
    if !templates_dir.is_dir() {
        return Err(suggestions::templates_not_found(&templates_dir));
    }

    let catalog = load_catalog(args.catalog.as_deref())?;
    let templates = TemplateSet::load_dir(&templates_dir)
        .with_context(|| format!("Failed to load templates from {}", templates_dir.display()))?;

    let options = SyncOptions {
        exclusion_topics: args.exclusion_topics(),
        dry_run: args.dry_run,
        concurrency: args.concurrency,
    };
    let template_count = templates.len();
    let merger = Merger::new(templates, catalog.root_only_tags());
    let synchronizer = Synchronizer::new(Detector::new(catalog), merger, options);

    let sources: Vec<LocalRepository> = args
        .repositories
        .iter()
        .map(|path| LocalRepository::new(path).with_topics(args.topics.clone()))
        .collect();

    if !args.quiet {
        println!(
            "{} Synchronizing {} repositories ({} templates from {}){}",
            emoji(&out, "🔄", "[SYNC]"),
            sources.len(),
            template_count,
            templates_dir.display(),
            if args.dry_run { " [dry run]" } else { "" }
        );
    }

    let reports = synchronizer.sync_all(&sources)?;

    for report in &reports {
        if args.quiet && report.result.is_ok() {
            continue;
        }
        println!("{}", report_line(&out, report));

        if args.verbose {
            if let Some(config) = report.result.as_ref().ok().and_then(|o| o.config()) {
                for line in config.to_yaml_string()?.lines() {
                    println!("    {}", line);
                }
            }
        }
    }

    let summary = Summary::from_reports(&reports);
    if !args.quiet {
        println!("\n{}", summary.line(&out));
    }

    if summary.failed > 0 {
        anyhow::bail!(
            "{} of {} repositories failed to synchronize",
            summary.failed,
            reports.len()
        );
    }

    Ok(())
}
