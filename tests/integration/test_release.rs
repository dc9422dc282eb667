//! End-to-end release runs against a file:// registry fixture
//!
//! Host commands are stubs that drop marker files, so each test can assert
//! exactly which steps ran and with which resolved version.

use crate::helpers::{run_shipway, stderr_of, stdout_of, today_stamp, TestProject};
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
compat_check = 'printf %s {version} > compat.txt'
publish = 'printf "%s %s\n" "$MODULE_VERSION" "${CROSS_TARGET:-default}" >> published.txt'
promote = 'printf "%s\n" "$MODULE_VERSION" >> promoted.txt'
targets = ["linux-x86_64", "darwin-aarch64"]
"#;

/// Deterministic test-mode environment: build number 42
const TEST_ENV: [(&str, &str); 3] = [("CI", "true"), ("CI_BUILD_NUMBER", "42"), ("SHIPWAY_TEST_MODE", "1")];

fn expected_nightly() -> String {
  format!("1.2.0-alpha-{}-42", today_stamp())
}

#[test]
fn test_nightly_end_to_end() -> Result<()> {
  let project = TestProject::new()?;
  project.write_config(CONFIG)?;
  project.seed_registry("widget", "latest.json", r#"{"version": "1.1.0"}"#)?;

  let output = run_shipway(&project.path, &["release-nightly"], &TEST_ENV)?;

  assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr_of(&output));
  let stdout = stdout_of(&output);
  assert!(stdout.contains(&expected_nightly()), "stdout: {}", stdout);
  assert!(stdout.contains("1.3.0"), "should announce the next development version");

  assert!(project.file_exists("tested.txt"));
  assert_eq!(project.read_file("compat.txt")?, "1.1.0");
  assert_eq!(project.read_file("published.txt")?, format!("{} default\n", expected_nightly()));
  assert_eq!(project.read_file("promoted.txt")?, format!("{}\n", expected_nightly()));
  Ok(())
}

#[test]
fn test_nightly_guard_rejects_existing_version() -> Result<()> {
  let project = TestProject::new()?;
  project.write_config(CONFIG)?;
  project.seed_registry("widget", "latest.json", r#"{"version": "1.1.0"}"#)?;
  project.seed_registry("widget", &format!("{}.json", expected_nightly()), "{}")?;

  let output = run_shipway(&project.path, &["release-nightly"], &TEST_ENV)?;

  assert_eq!(output.status.code(), Some(3));
  assert!(stderr_of(&output).contains("already published"));
  assert!(!project.file_exists("tested.txt"));
  assert!(!project.file_exists("published.txt"));
  Ok(())
}

#[test]
fn test_skip_tests_flag() -> Result<()> {
  let project = TestProject::new()?;
  project.write_config(CONFIG)?;

  let output = run_shipway(&project.path, &["release-nightly", "skip-tests"], &TEST_ENV)?;

  assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr_of(&output));
  assert!(!project.file_exists("tested.txt"));
  assert!(project.file_exists("published.txt"));
  Ok(())
}

#[test]
fn test_cross_build_publishes_per_target() -> Result<()> {
  let project = TestProject::new()?;
  project.write_config(CONFIG)?;

  let output = run_shipway(&project.path, &["release-nightly", "cross-build"], &TEST_ENV)?;

  assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr_of(&output));
  let version = expected_nightly();
  assert_eq!(
    project.read_file("published.txt")?,
    format!("{v} linux-x86_64\n{v} darwin-aarch64\n", v = version)
  );
  // Promotion still happens exactly once
  assert_eq!(project.read_file("promoted.txt")?, format!("{}\n", version));
  Ok(())
}

#[test]
fn test_first_release_skips_compat_check() -> Result<()> {
  let project = TestProject::new()?;
  project.write_config(CONFIG)?;

  let output = run_shipway(&project.path, &["release-nightly"], &TEST_ENV)?;

  assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr_of(&output));
  assert!(!project.file_exists("compat.txt"));
  Ok(())
}

#[test]
fn test_stable_override_with_real_credentials() -> Result<()> {
  let project = TestProject::new()?;
  project.write_config(CONFIG)?;
  project.seed_registry("widget", "latest.json", r#"{"version": "1.1.0"}"#)?;
  project.write_notes("2.0.0", "# 2.0.0\n\nBig release.\n")?;

  let output = run_shipway(
    &project.path,
    &["release-stable", "version", "v2.0.0"],
    &[("REGISTRY_TOKEN", "tok"), ("PGP_PASSPHRASE", "secret")],
  )?;

  assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr_of(&output));
  // Leading 'v' is stripped from the tag
  assert_eq!(project.read_file("published.txt")?, "2.0.0 default\n");
  assert!(stdout_of(&output).contains("Release notes"));
  Ok(())
}

#[test]
fn test_publish_failure_halts_promotion() -> Result<()> {
  let project = TestProject::new()?;
  let config = CONFIG.replace(
    r#"publish = 'printf "%s %s\n" "$MODULE_VERSION" "${CROSS_TARGET:-default}" >> published.txt'"#,
    r#"publish = "echo upload refused >&2; exit 1""#,
  );
  project.write_config(&config)?;

  let output = run_shipway(&project.path, &["release-nightly"], &TEST_ENV)?;

  assert_eq!(output.status.code(), Some(3));
  let stderr = stderr_of(&output);
  assert!(stderr.contains("Release halted at step 'publish'"), "stderr: {}", stderr);
  assert!(stderr.contains("upload refused"));
  // Tests ran, promotion never did
  assert!(project.file_exists("tested.txt"));
  assert!(!project.file_exists("promoted.txt"));
  Ok(())
}

#[test]
fn test_missing_publish_credentials_fail_before_any_step() -> Result<()> {
  let project = TestProject::new()?;
  project.write_config(CONFIG)?;

  // Real mode (no test-mode flag): publish requires credentials up front
  let output = run_shipway(
    &project.path,
    &["release-stable", "version", "2.0.0"],
    &[("PGP_PASSPHRASE", "secret")],
  )?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr_of(&output).contains("REGISTRY_TOKEN"));
  assert!(!project.file_exists("tested.txt"));
  Ok(())
}
