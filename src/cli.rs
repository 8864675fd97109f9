//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;

/// Dependabot Sync - Keep dependabot configuration standardized across repositories
#[derive(Parser, Debug)]
#[command(name = "dependabot-sync")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(
        long,
        global = true,
        value_name = "LEVEL",
        default_value = "warn",
        value_parser = ["error", "warn", "info", "debug", "trace"]
    )]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Merge the organization templates into one or more repository checkouts
    Sync(commands::sync::SyncArgs),

    /// Show the package ecosystems detected in a repository checkout
    Detect(commands::detect::DetectArgs),

    /// Validate a dependabot configuration file or a template directory
    Validate(commands::validate::ValidateArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);

        match self.command {
            Commands::Sync(args) => commands::sync::execute(args, &self.color),
            Commands::Detect(args) => commands::detect::execute(args, &self.color),
            Commands::Validate(args) => commands::validate::execute(args, &self.color),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

/// Install env_logger, letting RUST_LOG override the flag
fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    // A logger may already be installed when running under a test harness
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_sync_with_globals() {
        let cli = Cli::try_parse_from([
            "dependabot-sync",
            "--log-level",
            "debug",
            "sync",
            "--dry-run",
            "repo-a",
            "repo-b",
        ])
        .unwrap();
        assert_eq!(cli.log_level, "debug");
        assert!(matches!(cli.command, Commands::Sync(_)));
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        let result = Cli::try_parse_from(["dependabot-sync", "--log-level", "loud", "detect", "."]);
        assert!(result.is_err());
    }
}
