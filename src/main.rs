//! # Dependabot Sync CLI
//!
//! This is the binary entry point for the `dependabot-sync` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Installing the logger and executing the selected command.
//! - Handing errors back to the runtime, which prints them and exits non-zero.
//!
//! Detection, merging and synchronization live in the library crate; the
//! binary only wires them to flags and terminal output.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
