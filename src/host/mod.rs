//! Host build tool boundary
//!
//! The pipeline drives the host's build tooling (tests, compatibility
//! checking, signed publishing, promotion, user hooks) as opaque external
//! commands. `ProcessHost` runs the commands configured in shipway.toml
//! through `sh -c`, substituting `{version}`/`{target}` placeholders and
//! exporting credentials into the child environment.

use crate::core::config::ShipwayConfig;
use crate::core::env::{Credentials, PGP_PASSPHRASE, REGISTRY_TOKEN, REGISTRY_USER, RELEASE_TOKEN};
use crate::core::error::{ShipwayError, ShipwayResult};
use crate::core::version::Version;
use std::path::{Path, PathBuf};
use std::process::Command;

/// User-overridable pipeline hooks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hook {
  BeforePublish,
  AfterPublish,
}

impl Hook {
  pub fn name(self) -> &'static str {
    match self {
      Hook::BeforePublish => "before-publish",
      Hook::AfterPublish => "after-publish",
    }
  }
}

/// Effectful operations the pipeline delegates to the host build tool
pub trait BuildHost {
  /// Run the test suite
  fn run_tests(&self) -> ShipwayResult<()>;

  /// Binary-compatibility check against the latest published version
  fn compat_check(&self, against: &Version) -> ShipwayResult<()>;

  /// Signed publish of the artifacts for one target (or the default target)
  fn publish(&self, version: &Version, target: Option<&str>) -> ShipwayResult<()>;

  /// Repository-side release promotion
  fn promote(&self, version: &Version) -> ShipwayResult<()>;

  /// Run a user hook; a missing hook command is a no-op
  fn hook(&self, hook: Hook, version: &Version) -> ShipwayResult<()>;
}

/// Locate the conventional release notes file for a version
pub fn release_notes_path(project_root: &Path, version: &Version) -> Option<PathBuf> {
  ["md", "markdown"]
    .iter()
    .map(|ext| project_root.join("notes").join(format!("{}.{}", version, ext)))
    .find(|p| p.is_file())
}

/// Host implementation that shells out to configured commands
pub struct ProcessHost {
  config: ShipwayConfig,
  credentials: Credentials,
  project_root: PathBuf,
}

impl ProcessHost {
  pub fn new(config: ShipwayConfig, credentials: Credentials, project_root: PathBuf) -> Self {
    Self {
      config,
      credentials,
      project_root,
    }
  }

  /// Run one configured command with placeholders substituted
  fn run(&self, step: &str, template: &str, version: &Version, target: Option<&str>) -> ShipwayResult<()> {
    let command = template
      .replace("{version}", &version.to_string())
      .replace("{target}", target.unwrap_or(""));

    let mut child = Command::new("sh");
    child
      .arg("-c")
      .arg(&command)
      .current_dir(&self.project_root)
      .env("MODULE_NAME", &self.config.module.name)
      .env("MODULE_VERSION", version.to_string());

    if let Some(target) = target {
      child.env("CROSS_TARGET", target);
    }
    if let Some(user) = &self.credentials.registry_user {
      child.env(REGISTRY_USER, user);
    }
    if let Some(token) = &self.credentials.registry_token {
      child.env(REGISTRY_TOKEN, token);
    }
    if let Some(token) = &self.credentials.release_token {
      child.env(RELEASE_TOKEN, token);
    }
    if let Some(passphrase) = &self.credentials.pgp_passphrase {
      child.env(PGP_PASSPHRASE, passphrase);
    }
    if let Some(notes) = release_notes_path(&self.project_root, version) {
      child.env("RELEASE_NOTES_FILE", notes);
    }

    let output = child.output().map_err(|e| ShipwayError::Command {
      step: step.to_string(),
      command: command.clone(),
      stderr: format!("failed to spawn: {}", e),
    })?;

    if !output.status.success() {
      return Err(ShipwayError::Command {
        step: step.to_string(),
        command,
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
      });
    }

    Ok(())
  }

  /// Built-in promotion against the registry when no command is configured
  fn builtin_promote(&self, version: &Version) -> ShipwayResult<()> {
    let url = format!(
      "{}/{}/{}/promote",
      self.config.registry.url.trim_end_matches('/'),
      self.config.module_path(),
      version
    );

    let mut curl = Command::new("curl");
    curl.arg("-sf").arg("-X").arg("POST");
    if let Some(token) = &self.credentials.release_token {
      curl.arg("-H").arg(format!("Authorization: Bearer {}", token));
    }
    curl.arg(&url);

    let output = curl.output().map_err(|e| ShipwayError::Registry {
      url: url.clone(),
      detail: format!("failed to spawn curl: {}", e),
    })?;

    if !output.status.success() {
      return Err(ShipwayError::Registry {
        url,
        detail: format!(
          "promotion failed: {}",
          String::from_utf8_lossy(&output.stderr).trim()
        ),
      });
    }

    Ok(())
  }
}

impl BuildHost for ProcessHost {
  fn run_tests(&self) -> ShipwayResult<()> {
    let version = self.config.declared_version()?;
    self.run("run-tests", &self.config.build.test, &version, None)
  }

  fn compat_check(&self, against: &Version) -> ShipwayResult<()> {
    // The published version to diff against fills {version}
    self.run("compat-check", &self.config.build.compat_check, against, None)
  }

  fn publish(&self, version: &Version, target: Option<&str>) -> ShipwayResult<()> {
    self.run("publish", &self.config.build.publish, version, target)
  }

  fn promote(&self, version: &Version) -> ShipwayResult<()> {
    if self.config.build.promote.trim().is_empty() {
      self.builtin_promote(version)
    } else {
      self.run("promote", &self.config.build.promote, version, None)
    }
  }

  fn hook(&self, hook: Hook, version: &Version) -> ShipwayResult<()> {
    let template = match hook {
      Hook::BeforePublish => &self.config.hooks.before_publish,
      Hook::AfterPublish => &self.config.hooks.after_publish,
    };
    if template.trim().is_empty() {
      return Ok(());
    }
    self.run(hook.name(), template, version, None)
  }
}
