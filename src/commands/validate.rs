//! # Validate Command Implementation
//!
//! This module implements the `validate` subcommand, which checks a
//! dependabot configuration file and/or a template directory without syncing
//! anything.
//!
//! ## Checks
//!
//! - **Parsing**: The document must be well-formed YAML of the right shape.
//! - **Uniqueness**: No two rules may share an ecosystem and directory (or an
//!   ecosystem alone, for root-only ecosystems).
//! - **Root-only placement**: Container, workflow, infrastructure and submodule
//!   rules should live at `/`.
//! - **Ecosystem tags**: Tags unknown to the indicator catalog are reported,
//!   with a suggestion when one is close.
//! - **Schedule time**: `schedule.time` must be `HH:MM`.
//!
//! This command is a safe, read-only operation that does not modify any files.

use anyhow::{Context, Result};
use clap::Args;
use regex::Regex;
use std::collections::BTreeSet;
use std::path::PathBuf;

use dependabot_sync::config::{self, DependabotConfig};
use dependabot_sync::defaults::CONFIG_FILE;
use dependabot_sync::detector::IndicatorCatalog;
use dependabot_sync::output::{emoji, OutputConfig};
use dependabot_sync::suggestions;
use dependabot_sync::templates::TemplateSet;

use super::load_catalog;

const SCHEDULE_TIME_PATTERN: &str = r"^([01][0-9]|2[0-3]):[0-5][0-9]$";

/// Validate a dependabot configuration file or template directory
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Dependabot configuration file to validate.
    ///
    /// Defaults to `.github/dependabot.yml` when no template directory is given.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Template directory to validate
    #[arg(short, long, value_name = "DIR")]
    pub templates: Option<PathBuf>,

    /// YAML file replacing the built-in indicator catalog
    #[arg(long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Use strict validation (fail on warnings).
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Finding {
    severity: Severity,
    message: String,
}

impl Finding {
    fn error(message: String) -> Self {
        Self {
            severity: Severity::Error,
            message,
        }
    }

    fn warning(message: String) -> Self {
        Self {
            severity: Severity::Warning,
            message,
        }
    }
}

/// Execute the `validate` command.
///
/// # Arguments
/// * `args` - The command arguments
/// * `color_flag` - The value of the global --color flag ("always", "never", or "auto")
pub fn execute(args: ValidateArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let catalog = load_catalog(args.catalog.as_deref())?;
    let time_format = Regex::new(SCHEDULE_TIME_PATTERN).context("Invalid schedule time pattern")?;

    let mut documents: Vec<(String, DependabotConfig)> = Vec::new();

    let config_path = match (&args.config, &args.templates) {
        (Some(path), _) => Some(path.clone()),
        (None, None) => Some(PathBuf::from(CONFIG_FILE)),
        (None, Some(_)) => None,
    };

    if let Some(path) = config_path {
        println!(
            "{} Validating configuration: {}",
            emoji(&out, "🔍", "[SCAN]"),
            path.display()
        );
        match config::from_file(&path) {
            Ok(doc) => documents.push((path.display().to_string(), doc)),
            Err(e) => {
                println!(
                    "{} Configuration parsing failed: {}",
                    emoji(&out, "❌", "[ERR]"),
                    e
                );
                return Err(anyhow::anyhow!("Configuration parsing failed: {}", e));
            }
        }
    }

    if let Some(dir) = &args.templates {
        println!(
            "{} Validating templates: {}",
            emoji(&out, "🔍", "[SCAN]"),
            dir.display()
        );
        if !dir.is_dir() {
            return Err(suggestions::templates_not_found(dir));
        }
        let templates = TemplateSet::load_dir(dir)
            .with_context(|| format!("Failed to load templates from {}", dir.display()))?;
        if templates.is_empty() {
            println!(
                "{} No templates found in {}",
                emoji(&out, "⚠️", "[WARN]"),
                dir.display()
            );
        }
        for (tag, doc) in templates.iter() {
            documents.push((format!("template '{}'", tag), doc.clone()));
        }
    }

    let mut has_errors = false;
    let mut has_warnings = false;

    for (label, doc) in &documents {
        println!(
            "\n{} {} ({} rules)",
            emoji(&out, "📄", "[DOC]"),
            label,
            doc.updates.len()
        );

        let findings = check_document(doc, &catalog, &time_format);
        if findings.is_empty() {
            println!("{} No problems found", emoji(&out, "✅", "[OK]"));
        }
        for finding in findings {
            match finding.severity {
                Severity::Error => {
                    has_errors = true;
                    println!("{} {}", emoji(&out, "❌", "[ERR]"), finding.message);
                }
                Severity::Warning => {
                    has_warnings = true;
                    println!("{} {}", emoji(&out, "⚠️", "[WARN]"), finding.message);
                }
            }
        }
    }

    println!("\n{} Validation Result:", emoji(&out, "🎯", "[RESULT]"));

    if has_errors {
        println!(
            "{} Configuration has errors that must be fixed",
            emoji(&out, "❌", "[ERR]")
        );
        return Err(anyhow::anyhow!("Configuration validation failed"));
    }

    if has_warnings && args.strict {
        println!(
            "{} Configuration has warnings (strict mode enabled)",
            emoji(&out, "❌", "[ERR]")
        );
        return Err(anyhow::anyhow!(
            "Configuration validation failed in strict mode"
        ));
    }

    if has_warnings {
        println!(
            "{} Configuration is valid but has warnings",
            emoji(&out, "⚠️", "[WARN]")
        );
    } else {
        println!("{} Configuration is valid", emoji(&out, "✅", "[OK]"));
    }

    Ok(())
}

fn check_document(
    doc: &DependabotConfig,
    catalog: &IndicatorCatalog,
    time_format: &Regex,
) -> Vec<Finding> {
    let mut findings = Vec::new();
    let known: Vec<&str> = catalog.tags().collect();
    let mut seen: BTreeSet<(String, String)> = BTreeSet::new();

    for (idx, rule) in doc.updates.iter().enumerate() {
        let tag = rule.package_ecosystem.as_str();
        let position = idx + 1;

        if tag.is_empty() {
            findings.push(Finding::error(format!(
                "Rule {} has no package-ecosystem",
                position
            )));
            continue;
        }

        let root_only = catalog.is_root_only(tag);
        let key_directory = if root_only { "/" } else { rule.directory.as_str() };
        if !seen.insert((tag.to_string(), key_directory.to_string())) {
            let what = if root_only {
                format!("'{}'", tag)
            } else {
                format!("'{}' in '{}'", tag, rule.directory)
            };
            findings.push(Finding::error(format!(
                "Rule {} duplicates an earlier rule for {}",
                position, what
            )));
        }

        if root_only && rule.directory != "/" {
            findings.push(Finding::warning(format!(
                "Rule {} places root-only ecosystem '{}' in '{}'; it will be moved to '/'",
                position, tag, rule.directory
            )));
        }

        if catalog.get(tag).is_none() {
            let hint = suggestions::find_similar(tag, &known)
                .map(|s| format!(" (did you mean '{}'?)", s))
                .unwrap_or_default();
            findings.push(Finding::warning(format!(
                "Rule {} uses unknown package-ecosystem '{}'{}",
                position, tag, hint
            )));
        }

        let time = rule.schedule.time.as_str();
        if !time.is_empty() && !time_format.is_match(time) {
            findings.push(Finding::error(format!(
                "Rule {} has schedule time '{}', expected HH:MM",
                position, time
            )));
        }
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use dependabot_sync::config::{Schedule, UpdateRule};

    fn check(rules: Vec<UpdateRule>) -> Vec<Finding> {
        let time_format = Regex::new(SCHEDULE_TIME_PATTERN).unwrap();
        check_document(
            &DependabotConfig::with_updates(rules),
            &IndicatorCatalog::builtin(),
            &time_format,
        )
    }

    #[test]
    fn test_clean_document_has_no_findings() {
        let mut npm = UpdateRule::new("npm", "/");
        npm.schedule = Schedule {
            interval: "weekly".to_string(),
            time: "04:30".to_string(),
            ..Schedule::default()
        };
        assert!(check(vec![npm, UpdateRule::new("docker", "/")]).is_empty());
    }

    #[test]
    fn test_duplicate_rules_are_errors() {
        let findings = check(vec![
            UpdateRule::new("npm", "/web"),
            UpdateRule::new("npm", "/web"),
            UpdateRule::new("npm", "/"),
        ]);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Error);
        assert!(findings[0].message.contains("Rule 2 duplicates"));
    }

    #[test]
    fn test_root_only_duplicates_ignore_directory() {
        let findings = check(vec![
            UpdateRule::new("docker", "/"),
            UpdateRule::new("docker", "/api"),
        ]);
        assert!(findings
            .iter()
            .any(|f| f.severity == Severity::Error && f.message.contains("'docker'")));
        assert!(findings
            .iter()
            .any(|f| f.severity == Severity::Warning && f.message.contains("moved to '/'")));
    }

    #[test]
    fn test_unknown_ecosystem_suggestion() {
        let findings = check(vec![UpdateRule::new("dokcer", "/")]);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Warning);
        assert!(findings[0].message.contains("did you mean 'docker'?"));
    }

    #[test]
    fn test_schedule_time_format() {
        for (time, valid) in [("00:00", true), ("23:59", true), ("24:00", false), ("4:00", false), ("noon", false)] {
            let mut rule = UpdateRule::new("npm", "/");
            rule.schedule.time = time.to_string();
            assert_eq!(check(vec![rule]).is_empty(), valid, "{}", time);
        }
    }

    #[test]
    fn test_missing_ecosystem() {
        let findings = check(vec![UpdateRule::new("", "/")]);
        assert_eq!(findings[0].severity, Severity::Error);
        assert!(findings[0].message.contains("no package-ecosystem"));
    }
}
