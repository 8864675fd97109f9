//! End-to-end tests for the `validate` command.
//!
//! These tests invoke the actual CLI binary and validate the behavior of the
//! `validate` subcommand from a user's perspective.

mod common;
use common::prelude::*;

const VALID_CONFIG: &str = r#"version: 2
updates:
  - package-ecosystem: npm
    directory: /
    schedule:
      interval: weekly
      time: "04:00"
  - package-ecosystem: docker
    directory: /
    schedule:
      interval: monthly
"#;

#[test]
fn test_validate_valid_config() {
    let temp = TempDir::new().unwrap();
    let config_file = temp.child("dependabot.yml");
    config_file.write_str(VALID_CONFIG).unwrap();

    cargo_bin_cmd!("dependabot-sync")
        .arg("--color")
        .arg("never")
        .arg("validate")
        .arg("--config")
        .arg(config_file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("[OK] Configuration is valid"));
}

#[test]
fn test_validate_defaults_to_github_config() {
    let temp = TempDir::new().unwrap();
    temp.child(".github/dependabot.yml")
        .write_str(VALID_CONFIG)
        .unwrap();

    cargo_bin_cmd!("dependabot-sync")
        .current_dir(temp.path())
        .arg("validate")
        .assert()
        .success();
}

#[test]
fn test_validate_invalid_yaml() {
    let temp = TempDir::new().unwrap();
    let config_file = temp.child("dependabot.yml");
    config_file.write_str("version: 2\nupdates: [unclosed\n").unwrap();

    cargo_bin_cmd!("dependabot-sync")
        .arg("validate")
        .arg("--config")
        .arg(config_file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration parsing failed"));
}

#[test]
fn test_validate_duplicate_rules_fail() {
    let temp = TempDir::new().unwrap();
    let config_file = temp.child("dependabot.yml");
    config_file
        .write_str(
            r#"version: 2
updates:
  - package-ecosystem: npm
    directory: /
  - package-ecosystem: npm
    directory: /
"#,
        )
        .unwrap();

    cargo_bin_cmd!("dependabot-sync")
        .arg("--color")
        .arg("never")
        .arg("validate")
        .arg("--config")
        .arg(config_file.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("Rule 2 duplicates"));
}

#[test]
fn test_validate_bad_schedule_time_fails() {
    let temp = TempDir::new().unwrap();
    let config_file = temp.child("dependabot.yml");
    config_file
        .write_str(
            "version: 2\nupdates:\n  - package-ecosystem: pip\n    directory: /\n    schedule:\n      interval: daily\n      time: \"25:00\"\n",
        )
        .unwrap();

    cargo_bin_cmd!("dependabot-sync")
        .arg("validate")
        .arg("--config")
        .arg(config_file.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("expected HH:MM"));
}

#[test]
fn test_validate_warnings_fail_only_in_strict_mode() {
    let temp = TempDir::new().unwrap();
    let config_file = temp.child("dependabot.yml");
    config_file
        .write_str("version: 2\nupdates:\n  - package-ecosystem: dokcer\n    directory: /\n")
        .unwrap();

    cargo_bin_cmd!("dependabot-sync")
        .arg("--color")
        .arg("never")
        .arg("validate")
        .arg("--config")
        .arg(config_file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("did you mean 'docker'?"))
        .stdout(predicate::str::contains("valid but has warnings"));

    cargo_bin_cmd!("dependabot-sync")
        .arg("validate")
        .arg("--strict")
        .arg("--config")
        .arg(config_file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("strict mode"));
}

#[test]
fn test_validate_template_directory() {
    let ws = Workspace::new()
        .with_template("npm", templates::NPM)
        .with_template("golang", templates::GOLANG);

    ws.command()
        .arg("validate")
        .arg("--templates")
        .arg(ws.templates_path())
        .assert()
        .success()
        .stdout(predicate::str::contains("template 'gomod'"))
        .stdout(predicate::str::contains("template 'npm'"));
}

#[test]
fn test_validate_invalid_template_directory() {
    let ws = Workspace::new().with_template("npm", templates::INVALID);

    ws.command()
        .arg("validate")
        .arg("--templates")
        .arg(ws.templates_path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load templates"));
}
