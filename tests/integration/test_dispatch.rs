//! Dispatcher-level failures: bad grammar, missing config, CI-only flows
//!
//! All of these must fail before any step runs, so no marker file may
//! appear in the project directory.

use crate::helpers::{run_shipway, stderr_of, TestProject};
use anyhow::Result;

const CONFIG: &str = r#"
[module]
name = "widget"
version = "1.2.0"

[metadata]
description = "A widget"
license = "MIT"
scm_url = "https://github.com/example/widget"

[registry]
url = "{registry}"

[build]
test = "touch tested.txt"
publish = "touch published.txt"
promote = "touch promoted.txt"
"#;

#[test]
fn test_unknown_release_process_fails_without_side_effects() -> Result<()> {
  let project = TestProject::new()?;
  project.write_config(CONFIG)?;

  let output = run_shipway(&project.path, &["release-module", "release-process", "bogus"], &[])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr_of(&output).contains("Unexpected release process 'bogus'"));
  assert!(!project.file_exists("tested.txt"));
  assert!(!project.file_exists("published.txt"));
  Ok(())
}

#[test]
fn test_missing_release_process_token() -> Result<()> {
  let project = TestProject::new()?;
  project.write_config(CONFIG)?;

  let output = run_shipway(&project.path, &["release-module", "nightly"], &[])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr_of(&output).contains("release-process"));
  Ok(())
}

#[test]
fn test_version_option_requires_value() -> Result<()> {
  let project = TestProject::new()?;
  project.write_config(CONFIG)?;

  let output = run_shipway(
    &project.path,
    &["release-module", "release-process", "nightly", "version"],
    &[],
  )?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr_of(&output).contains("requires a value"));
  Ok(())
}

#[test]
fn test_missing_config_names_expected_file() -> Result<()> {
  let project = TestProject::new()?;

  let output = run_shipway(&project.path, &["release-nightly"], &[])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr_of(&output).contains("shipway.toml"));
  Ok(())
}

#[test]
fn test_stable_outside_ci_is_rejected() -> Result<()> {
  let project = TestProject::new()?;
  project.write_config(CONFIG)?;

  let output = run_shipway(&project.path, &["release-stable"], &[])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr_of(&output).contains("CI-only"));
  assert!(!project.file_exists("tested.txt"));
  assert!(!project.file_exists("published.txt"));
  Ok(())
}

#[test]
fn test_stable_under_ci_without_tag() -> Result<()> {
  let project = TestProject::new()?;
  project.write_config(CONFIG)?;

  let output = run_shipway(&project.path, &["release-stable"], &[("CI", "true")])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr_of(&output).contains("no release tag"));
  Ok(())
}
