//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Environment variables scrubbed from every invocation so ambient CI
/// settings cannot leak into tests
const SCRUBBED_VARS: [&str; 16] = [
  "CI",
  "CI_NAME",
  "CI_REPO_SLUG",
  "CI_BRANCH",
  "CI_COMMIT",
  "CI_BUILD_DIR",
  "CI_BUILD_URL",
  "CI_BUILD_NUMBER",
  "CI_JOB_NUMBER",
  "CI_PULL_REQUEST",
  "CI_TAG",
  "REGISTRY_USER",
  "REGISTRY_TOKEN",
  "RELEASE_TOKEN",
  "PGP_PASSPHRASE",
  "SHIPWAY_TEST_MODE",
];

/// A temporary project with a shipway.toml and a file:// registry fixture
pub struct TestProject {
  _root: TempDir,
  pub path: PathBuf,
  registry_dir: PathBuf,
}

impl TestProject {
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();
    let registry_dir = path.join("registry");
    std::fs::create_dir_all(&registry_dir)?;
    Ok(Self {
      _root: root,
      path,
      registry_dir,
    })
  }

  /// file:// base URL of the registry fixture
  pub fn registry_url(&self) -> String {
    format!("file://{}", self.registry_dir.display())
  }

  /// Write shipway.toml; `{registry}` in the body is replaced with the
  /// fixture URL
  pub fn write_config(&self, body: &str) -> Result<()> {
    let body = body.replace("{registry}", &self.registry_url());
    std::fs::write(self.path.join("shipway.toml"), body)?;
    Ok(())
  }

  /// Seed a registry document, e.g. ("widget", "latest.json", json)
  pub fn seed_registry(&self, module_path: &str, leaf: &str, body: &str) -> Result<()> {
    let dir = self.registry_dir.join(module_path);
    std::fs::create_dir_all(&dir)?;
    std::fs::write(dir.join(leaf), body)?;
    Ok(())
  }

  /// Write a release notes file for a version
  pub fn write_notes(&self, version: &str, body: &str) -> Result<()> {
    let dir = self.path.join("notes");
    std::fs::create_dir_all(&dir)?;
    std::fs::write(dir.join(format!("{}.md", version)), body)?;
    Ok(())
  }

  pub fn file_exists(&self, rel: &str) -> bool {
    self.path.join(rel).exists()
  }

  pub fn read_file(&self, rel: &str) -> Result<String> {
    std::fs::read_to_string(self.path.join(rel)).with_context(|| format!("Failed to read {}", rel))
  }
}

/// Run the shipway binary; callers assert on the returned Output
pub fn run_shipway(cwd: &Path, args: &[&str], envs: &[(&str, &str)]) -> Result<Output> {
  let bin = env!("CARGO_BIN_EXE_shipway");

  let mut cmd = Command::new(bin);
  cmd.current_dir(cwd).args(args);
  for var in SCRUBBED_VARS {
    cmd.env_remove(var);
  }
  for (key, value) in envs {
    cmd.env(key, value);
  }

  cmd.output().context("Failed to run shipway")
}

/// Today's date stamp as the nightly flow renders it
pub fn today_stamp() -> String {
  chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()
}

pub fn stdout_of(output: &std::process::Output) -> String {
  String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr_of(output: &std::process::Output) -> String {
  String::from_utf8_lossy(&output.stderr).into_owned()
}
