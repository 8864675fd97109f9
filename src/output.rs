//! # Output Configuration
//!
//! Controls how the CLI reports results: whether colors and emoji are used,
//! and how a synchronization outcome is rendered as one line of text.
//!
//! ## Respecting User Preferences
//!
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals

use crate::sync::{SyncOutcome, SyncReport};
use console::style;
use std::env;

/// Output configuration for controlling colors and emojis.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and emojis should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// `always` forces colors on (overriding `NO_COLOR`), `never` forces them
    /// off, and anything else detects support from the environment.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        // Presence alone disables, even when empty
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    /// Create a configuration with colors always enabled.
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    /// Create a configuration with colors always disabled.
    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// The emoji when colors are enabled, the plain alternative otherwise.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}

/// One line describing what happened to a repository
///
/// # Examples
///
/// ```
/// use dependabot_sync::output::{report_line, OutputConfig};
/// use dependabot_sync::sync::{SyncOutcome, SyncReport};
///
/// let report = SyncReport { repository: "acme/web".to_string(), result: Ok(SyncOutcome::Unchanged) };
/// let line = report_line(&OutputConfig::without_color(), &report);
/// assert_eq!(line, "[OK] acme/web: up to date");
/// ```
pub fn report_line(config: &OutputConfig, report: &SyncReport) -> String {
    let name = &report.repository;
    match &report.result {
        Ok(SyncOutcome::Excluded) => format!(
            "{} {}: excluded by topic",
            emoji(config, "⏭️", "[SKIP]"),
            name
        ),
        Ok(SyncOutcome::NoEcosystems) => format!(
            "{} {}: no ecosystems detected",
            emoji(config, "⏭️", "[SKIP]"),
            name
        ),
        Ok(SyncOutcome::Unchanged) => {
            format!("{} {}: up to date", emoji(config, "✅", "[OK]"), name)
        }
        Ok(SyncOutcome::Written { config: doc, created }) => format!(
            "{} {}: {} ({} rules)",
            emoji(config, "📝", "[WRITE]"),
            name,
            paint(config, if *created { "created" } else { "updated" }, Tone::Good),
            doc.updates.len()
        ),
        Ok(SyncOutcome::DryRun { config: doc, created }) => format!(
            "{} {}: would be {} ({} rules)",
            emoji(config, "🔍", "[DRY-RUN]"),
            name,
            if *created { "created" } else { "updated" },
            doc.updates.len()
        ),
        Err(err) => format!(
            "{} {}: {}",
            emoji(config, "❌", "[ERR]"),
            name,
            paint(config, &err.to_string(), Tone::Bad)
        ),
    }
}

/// Totals over a batch of reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub changed: usize,
    pub unchanged: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl Summary {
    pub fn from_reports(reports: &[SyncReport]) -> Self {
        let mut summary = Self::default();
        for report in reports {
            match &report.result {
                Ok(outcome) if outcome.is_change() => summary.changed += 1,
                Ok(SyncOutcome::Unchanged) => summary.unchanged += 1,
                Ok(_) => summary.skipped += 1,
                Err(_) => summary.failed += 1,
            }
        }
        summary
    }

    pub fn line(&self, config: &OutputConfig) -> String {
        format!(
            "{} {} changed, {} unchanged, {} skipped, {} failed",
            emoji(config, "📊", "[SUMMARY]"),
            self.changed,
            self.unchanged,
            self.skipped,
            self.failed
        )
    }
}

enum Tone {
    Good,
    Bad,
}

fn paint(config: &OutputConfig, text: &str, tone: Tone) -> String {
    if !config.use_color {
        return text.to_string();
    }
    let styled = match tone {
        Tone::Good => style(text).green(),
        Tone::Bad => style(text).red(),
    };
    styled.force_styling(true).to_string()
}
