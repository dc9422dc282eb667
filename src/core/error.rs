//! Error types for shipway with contextual messages and exit codes
//!
//! This module provides a unified error type that categorizes release
//! failures and carries contextual help messages. Every error class maps to
//! a stable process exit code so CI systems can distinguish user mistakes
//! from infrastructure problems.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for shipway
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args, missing environment input)
  User = 1,
  /// System error (registry connectivity, subprocess spawn, I/O)
  System = 2,
  /// Validation failure (publish guard, failed step, metadata checks)
  Validation = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for shipway
#[derive(Debug)]
pub enum ShipwayError {
  /// Configuration errors (shipway.toml, version syntax, metadata)
  Config(ConfigError),

  /// Environment errors (missing CI metadata, credentials, CI-only flows)
  Environment(EnvError),

  /// Publish guard violation: the version already exists in the registry
  Guard { module: String, version: String },

  /// Registry connectivity errors
  Registry { url: String, detail: String },

  /// An external command invoked by a step failed
  Command {
    step: String,
    command: String,
    stderr: String,
  },

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl ShipwayError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    ShipwayError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    ShipwayError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      ShipwayError::Message { message, context, help } => ShipwayError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      ShipwayError::Config(_) => ExitCode::User,
      ShipwayError::Environment(_) => ExitCode::User,
      ShipwayError::Guard { .. } => ExitCode::Validation,
      ShipwayError::Registry { .. } => ExitCode::System,
      ShipwayError::Command { .. } => ExitCode::Validation,
      ShipwayError::Io(_) => ExitCode::System,
      ShipwayError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      ShipwayError::Config(e) => e.help_message(),
      ShipwayError::Environment(e) => e.help_message(),
      ShipwayError::Guard { module, .. } => Some(format!(
        "Pick a new version or remove the published artifact for '{}' from the registry first.",
        module
      )),
      ShipwayError::Registry { .. } => {
        Some("Check network connectivity and the [registry] url in shipway.toml.".to_string())
      }
      ShipwayError::Command { step, .. } => Some(format!(
        "Fix the failure and re-run the release; steps before '{}' are safe to repeat.",
        step
      )),
      ShipwayError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for ShipwayError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ShipwayError::Config(e) => write!(f, "{}", e),
      ShipwayError::Environment(e) => write!(f, "{}", e),
      ShipwayError::Guard { module, version } => {
        write!(f, "Version {} of '{}' is already published", version, module)
      }
      ShipwayError::Registry { url, detail } => {
        write!(f, "Registry request failed: {}\n{}", url, detail)
      }
      ShipwayError::Command { step, command, stderr } => {
        write!(f, "Step '{}' failed running: {}", step, command)?;
        if !stderr.trim().is_empty() {
          write!(f, "\n{}", stderr.trim_end())?;
        }
        Ok(())
      }
      ShipwayError::Io(e) => write!(f, "I/O error: {}", e),
      ShipwayError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for ShipwayError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      ShipwayError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for ShipwayError {
  fn from(err: io::Error) -> Self {
    ShipwayError::Io(err)
  }
}

impl From<String> for ShipwayError {
  fn from(msg: String) -> Self {
    ShipwayError::message(msg)
  }
}

impl From<&str> for ShipwayError {
  fn from(msg: &str) -> Self {
    ShipwayError::message(msg)
  }
}

impl From<toml_edit::TomlError> for ShipwayError {
  fn from(err: toml_edit::TomlError) -> Self {
    ShipwayError::message(format!("TOML parse error: {}", err))
  }
}

impl From<toml_edit::de::Error> for ShipwayError {
  fn from(err: toml_edit::de::Error) -> Self {
    ShipwayError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_json::Error> for ShipwayError {
  fn from(err: serde_json::Error) -> Self {
    ShipwayError::message(format!("JSON error: {}", err))
  }
}

impl From<std::string::FromUtf8Error> for ShipwayError {
  fn from(err: std::string::FromUtf8Error) -> Self {
    ShipwayError::message(format!("UTF-8 conversion error: {}", err))
  }
}

impl From<std::env::VarError> for ShipwayError {
  fn from(err: std::env::VarError) -> Self {
    ShipwayError::message(format!("Environment variable error: {}", err))
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// shipway.toml not found
  NotFound { project_root: PathBuf },

  /// Missing required field
  MissingField { field: String },

  /// A version string could not be parsed
  InvalidVersion { input: String, reason: String },

  /// A version carries a qualifier and cannot be published
  NotReleaseVersion { input: String, qualifier: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::NotFound { .. } => {
        Some("Create a shipway.toml with [module], [metadata] and [registry] sections.".to_string())
      }
      ConfigError::MissingField { field } => Some(format!("Add '{}' to shipway.toml.", field)),
      ConfigError::NotReleaseVersion { .. } => {
        Some("Publish-time versions must be purely numeric, e.g. 1.2.0.".to_string())
      }
      _ => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::NotFound { project_root } => {
        write!(
          f,
          "No shipway configuration found.\nExpected file: {}/shipway.toml",
          project_root.display()
        )
      }
      ConfigError::MissingField { field } => {
        write!(f, "Missing required field in config: {}", field)
      }
      ConfigError::InvalidVersion { input, reason } => {
        write!(f, "Invalid version '{}': {}", input, reason)
      }
      ConfigError::NotReleaseVersion { input, qualifier } => {
        write!(f, "Version '{}' is not a release version (qualifier '{}')", input, qualifier)
      }
    }
  }
}

/// Environment errors: a required process input is missing
#[derive(Debug)]
pub enum EnvError {
  /// Required environment variable is absent
  MissingVar { name: String },

  /// Stable releases run under CI only
  CiOnly { command: String },

  /// Running under CI but no release tag is set
  MissingTag,
}

impl EnvError {
  fn help_message(&self) -> Option<String> {
    match self {
      EnvError::MissingVar { name } => Some(format!("Export {} before running the release.", name)),
      EnvError::CiOnly { .. } => {
        Some("Run the stable release from CI, or pass 'version <X.Y.Z>' explicitly.".to_string())
      }
      EnvError::MissingTag => Some("Push a git tag (e.g. v1.2.0) so CI exposes it via CI_TAG.".to_string()),
    }
  }
}

impl fmt::Display for EnvError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      EnvError::MissingVar { name } => {
        write!(f, "Missing required environment variable: {}", name)
      }
      EnvError::CiOnly { command } => {
        write!(f, "'{}' is a CI-only command and no version override was given", command)
      }
      EnvError::MissingTag => {
        write!(f, "Running under CI but no release tag is present (CI_TAG is empty)")
      }
    }
  }
}

/// Result type alias for shipway
pub type ShipwayResult<T> = Result<T, ShipwayError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> ShipwayResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> ShipwayResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<ShipwayError>,
{
  fn context(self, ctx: impl Into<String>) -> ShipwayResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> ShipwayResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &ShipwayError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}

/// Convert anyhow::Error to ShipwayError (for helper interop)
impl From<anyhow::Error> for ShipwayError {
  fn from(err: anyhow::Error) -> Self {
    ShipwayError::message(err.to_string())
  }
}
