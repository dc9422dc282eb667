//! Configuration for shipway
//!
//! Searched in order: shipway.toml, .shipway.toml

use crate::core::error::{ConfigError, ResultExt, ShipwayError, ShipwayResult};
use crate::core::version::Version;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for shipway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipwayConfig {
  pub module: ModuleConfig,
  #[serde(default)]
  pub metadata: MetadataConfig,
  pub registry: RegistryConfig,
  #[serde(default)]
  pub build: BuildConfig,
  #[serde(default)]
  pub hooks: HooksConfig,
  #[serde(default)]
  pub dependencies: Vec<DependencyConfig>,
}

/// Identity and declared version of the module being released
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleConfig {
  pub name: String,

  /// Optional namespace, prepended to the registry path
  #[serde(default)]
  pub group: Option<String>,

  /// Host-declared current version, the nightly base when no override is given
  pub version: String,
}

/// Publishing metadata; completeness is validated before any side effect
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MetadataConfig {
  #[serde(default)]
  pub description: String,

  #[serde(default)]
  pub license: String,

  /// Source repository URL
  #[serde(default)]
  pub scm_url: String,
}

/// Package registry endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
  pub url: String,
}

/// Host build tool commands, run through `sh -c` with `{version}` and
/// `{target}` placeholders substituted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
  /// Test suite command
  #[serde(default = "default_test_command")]
  pub test: String,

  /// Binary-compatibility check against the latest published version;
  /// `{version}` receives the published version to diff against
  #[serde(default)]
  pub compat_check: String,

  /// Signed publish command
  #[serde(default = "default_publish_command")]
  pub publish: String,

  /// Repository-side promotion; empty means the built-in registry promote
  #[serde(default)]
  pub promote: String,

  /// Statically enable cross-building (ORed with the CLI flag)
  #[serde(default)]
  pub cross_build: bool,

  /// Target identifiers a cross-build-eligible step repeats over
  #[serde(default)]
  pub targets: Vec<String>,
}

fn default_test_command() -> String {
  "cargo test".to_string()
}

fn default_publish_command() -> String {
  "cargo publish".to_string()
}

impl Default for BuildConfig {
  fn default() -> Self {
    Self {
      test: default_test_command(),
      compat_check: String::new(),
      publish: default_publish_command(),
      promote: String::new(),
      cross_build: false,
      targets: Vec::new(),
    }
  }
}

/// User-overridable pipeline hooks, no-ops when empty
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HooksConfig {
  #[serde(default)]
  pub before_publish: String,

  #[serde(default)]
  pub after_publish: String,
}

/// A declared dependency, checked for unreleased versions before publishing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyConfig {
  pub name: String,
  pub version: String,
}

impl ShipwayConfig {
  /// Load configuration from the project root
  pub fn load(project_root: &Path) -> ShipwayResult<Self> {
    let path = Self::find(project_root).ok_or_else(|| {
      ShipwayError::Config(ConfigError::NotFound {
        project_root: project_root.to_path_buf(),
      })
    })?;

    let raw = fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
    let config: ShipwayConfig = toml_edit::de::from_str(&raw).context(format!("In {}", path.display()))?;
    config.validate_required()?;
    Ok(config)
  }

  /// Locate the config file under the project root
  pub fn find(project_root: &Path) -> Option<PathBuf> {
    ["shipway.toml", ".shipway.toml"]
      .iter()
      .map(|name| project_root.join(name))
      .find(|p| p.is_file())
  }

  /// Structural validation: fields the rest of the pipeline cannot run without
  fn validate_required(&self) -> ShipwayResult<()> {
    if self.module.name.trim().is_empty() {
      return Err(missing("module.name"));
    }
    if self.module.version.trim().is_empty() {
      return Err(missing("module.version"));
    }
    if self.registry.url.trim().is_empty() {
      return Err(missing("registry.url"));
    }
    if self.build.publish.trim().is_empty() {
      return Err(missing("build.publish"));
    }
    Ok(())
  }

  /// Publishing metadata completeness, checked by the validate-metadata step
  pub fn validate_metadata(&self) -> ShipwayResult<()> {
    if self.metadata.description.trim().is_empty() {
      return Err(missing("metadata.description"));
    }
    if self.metadata.license.trim().is_empty() {
      return Err(missing("metadata.license"));
    }
    if self.metadata.scm_url.trim().is_empty() {
      return Err(missing("metadata.scm_url"));
    }
    // Surface version syntax errors before any network traffic
    Version::parse(&self.module.version)?;
    Ok(())
  }

  /// Declared current version of the module
  pub fn declared_version(&self) -> ShipwayResult<Version> {
    Version::parse(&self.module.version)
  }

  /// Registry path segment for this module: `group/name` or `name`
  pub fn module_path(&self) -> String {
    match &self.module.group {
      Some(group) if !group.trim().is_empty() => format!("{}/{}", group, self.module.name),
      _ => self.module.name.clone(),
    }
  }
}

fn missing(field: &str) -> ShipwayError {
  ShipwayError::Config(ConfigError::MissingField {
    field: field.to_string(),
  })
}
