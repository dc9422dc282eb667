//! Module registry contract
//!
//! The release pipeline needs exactly two capabilities from the package
//! index: the latest published version of a module, and whether a specific
//! version already exists (the publish guard). Everything else about the
//! registry stays behind this boundary.

pub mod http;

use crate::core::error::ShipwayResult;
use crate::core::version::Version;
use std::fmt;

/// Registry identity of the module being released
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleId {
  pub group: Option<String>,
  pub name: String,
}

impl ModuleId {
  pub fn new(group: Option<String>, name: impl Into<String>) -> Self {
    Self {
      group: group.filter(|g| !g.trim().is_empty()),
      name: name.into(),
    }
  }

  /// Registry path segment: `group/name` or `name`
  pub fn path(&self) -> String {
    match &self.group {
      Some(group) => format!("{}/{}", group, self.name),
      None => self.name.clone(),
    }
  }
}

impl fmt::Display for ModuleId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.group {
      Some(group) => write!(f, "{}:{}", group, self.name),
      None => write!(f, "{}", self.name),
    }
  }
}

/// Queries against the external package index
///
/// Both calls are blocking network operations and may fail on
/// connectivity; connectivity failures are hard failures for the current
/// invocation (no retry loop beyond the single empty-response retry the
/// implementation performs on lookups).
pub trait ModuleRegistry {
  /// Most recent published version, or None if the module has never been
  /// published
  fn latest_version(&self, module: &ModuleId) -> ShipwayResult<Option<Version>>;

  /// Whether the exact version is already published
  fn exists(&self, module: &ModuleId, version: &Version) -> ShipwayResult<bool>;
}
