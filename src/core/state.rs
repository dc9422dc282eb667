//! Release state threaded through the pipeline

use crate::core::version::Version;
use std::fmt;

/// One of the two predefined release pipelines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
  Nightly,
  Stable,
}

impl Flavor {
  /// Parse a flavor token; unknown tokens return None so the dispatcher can
  /// report the exact offending input
  pub fn parse(token: &str) -> Option<Self> {
    match token {
      "nightly" => Some(Flavor::Nightly),
      "stable" => Some(Flavor::Stable),
      _ => None,
    }
  }
}

impl fmt::Display for Flavor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Flavor::Nightly => write!(f, "nightly"),
      Flavor::Stable => write!(f, "stable"),
    }
  }
}

/// Mutable state owned by a single pipeline run
///
/// Created at dispatch time, passed by reference through every step and
/// discarded with the pipeline outcome. Exactly one run exists at a time.
#[derive(Debug, Clone)]
pub struct ReleaseState {
  pub flavor: Flavor,

  /// User-supplied version override from the command line
  pub version_override: Option<String>,

  pub skip_tests: bool,
  pub cross_build: bool,

  /// Resolved publish version, set by the resolve-version step
  pub version: Option<Version>,

  /// Computed next development version
  pub next_version: Option<Version>,
}

impl ReleaseState {
  pub fn new(flavor: Flavor) -> Self {
    Self {
      flavor,
      version_override: None,
      skip_tests: false,
      cross_build: false,
      version: None,
      next_version: None,
    }
  }

  /// Resolved publish version; steps after resolve-version rely on it
  pub fn version(&self) -> crate::core::error::ShipwayResult<&Version> {
    self
      .version
      .as_ref()
      .ok_or_else(|| crate::core::error::ShipwayError::message("release version has not been resolved yet"))
  }
}
