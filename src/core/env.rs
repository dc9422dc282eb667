//! Process environment snapshot: CI metadata, credentials, test mode
//!
//! All ambient environment variables are read exactly once, at process
//! start, into an immutable `EnvSnapshot` that is passed explicitly to the
//! version-decision engine and the credential-consuming collaborators.

use std::env;

/// CI indicator variable; any non-empty value marks a CI run
pub const CI: &str = "CI";
pub const CI_NAME: &str = "CI_NAME";
pub const CI_REPO_SLUG: &str = "CI_REPO_SLUG";
pub const CI_BRANCH: &str = "CI_BRANCH";
pub const CI_COMMIT: &str = "CI_COMMIT";
pub const CI_BUILD_DIR: &str = "CI_BUILD_DIR";
pub const CI_BUILD_URL: &str = "CI_BUILD_URL";
pub const CI_BUILD_NUMBER: &str = "CI_BUILD_NUMBER";
pub const CI_JOB_NUMBER: &str = "CI_JOB_NUMBER";
pub const CI_PULL_REQUEST: &str = "CI_PULL_REQUEST";
pub const CI_TAG: &str = "CI_TAG";

pub const REGISTRY_USER: &str = "REGISTRY_USER";
pub const REGISTRY_TOKEN: &str = "REGISTRY_TOKEN";
pub const RELEASE_TOKEN: &str = "RELEASE_TOKEN";
pub const PGP_PASSPHRASE: &str = "PGP_PASSPHRASE";

/// Test-mode flag consulted by the version-decision engine
pub const TEST_MODE: &str = "SHIPWAY_TEST_MODE";

/// CI metadata, populated once per process when running under CI
#[derive(Debug, Clone, Default)]
pub struct CiEnvironment {
  pub name: Option<String>,
  pub repo_slug: Option<String>,
  pub branch: Option<String>,
  pub commit: Option<String>,
  pub build_dir: Option<String>,
  pub build_url: Option<String>,
  pub build_number: Option<String>,
  pub job_number: Option<String>,
  pub pull_request: Option<String>,
  pub tag: Option<String>,
}

/// Registry and signing credentials
#[derive(Debug, Clone, Default)]
pub struct Credentials {
  pub registry_user: Option<String>,
  pub registry_token: Option<String>,
  pub release_token: Option<String>,
  pub pgp_passphrase: Option<String>,
}

/// Read-only snapshot of the process environment
#[derive(Debug, Clone, Default)]
pub struct EnvSnapshot {
  /// Present only when running under CI
  pub ci: Option<CiEnvironment>,
  pub credentials: Credentials,
  pub test_mode: bool,
}

impl EnvSnapshot {
  /// Capture the process environment
  pub fn capture() -> Self {
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Build a snapshot from an arbitrary variable lookup (used by tests)
  pub fn from_lookup<F>(lookup: F) -> Self
  where
    F: Fn(&str) -> Option<String>,
  {
    let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    let ci = non_empty(CI).map(|_| CiEnvironment {
      name: non_empty(CI_NAME),
      repo_slug: non_empty(CI_REPO_SLUG),
      branch: non_empty(CI_BRANCH),
      commit: non_empty(CI_COMMIT),
      build_dir: non_empty(CI_BUILD_DIR),
      build_url: non_empty(CI_BUILD_URL),
      build_number: non_empty(CI_BUILD_NUMBER),
      job_number: non_empty(CI_JOB_NUMBER),
      pull_request: non_empty(CI_PULL_REQUEST),
      tag: non_empty(CI_TAG),
    });

    let credentials = Credentials {
      registry_user: non_empty(REGISTRY_USER),
      registry_token: non_empty(REGISTRY_TOKEN),
      release_token: non_empty(RELEASE_TOKEN),
      pgp_passphrase: non_empty(PGP_PASSPHRASE),
    };

    let test_mode = non_empty(TEST_MODE).is_some();

    Self {
      ci,
      credentials,
      test_mode,
    }
  }

  /// Whether this process runs under CI
  pub fn is_ci(&self) -> bool {
    self.ci.is_some()
  }
}
