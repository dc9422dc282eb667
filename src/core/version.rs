//! Version model: N-component numeric versions with optional qualifier
//!
//! The registry's version space is a sequence of non-negative numeric
//! components (`1.2.0`, `2.0`, `1.4.0.1`) plus an optional qualifier after
//! the first dash (`1.2.0-alpha-2026-08-06`, `1.0.0-SNAPSHOT`). Ordering is
//! component-wise with conceptual zero-padding, so `1.2` and `1.2.0` compare
//! equal. Publish-time versions must carry no qualifier.

use crate::core::error::{ConfigError, ShipwayError, ShipwayResult};
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// A parsed module version
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
  components: Vec<u64>,
  qualifier: Option<String>,
}

fn version_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| Regex::new(r"^(\d+(?:\.\d+)*)(?:-(.+))?$").unwrap())
}

impl Version {
  /// Parse a version string into numeric components and an optional qualifier
  pub fn parse(input: &str) -> ShipwayResult<Self> {
    let input = input.trim();
    if input.is_empty() {
      return Err(ShipwayError::Config(ConfigError::InvalidVersion {
        input: input.to_string(),
        reason: "empty version string".to_string(),
      }));
    }

    let caps = version_re().captures(input).ok_or_else(|| {
      ShipwayError::Config(ConfigError::InvalidVersion {
        input: input.to_string(),
        reason: "expected numeric dot-separated components with an optional '-qualifier'".to_string(),
      })
    })?;

    let mut components = Vec::new();
    for part in caps[1].split('.') {
      let n = part.parse::<u64>().map_err(|_| {
        ShipwayError::Config(ConfigError::InvalidVersion {
          input: input.to_string(),
          reason: format!("component '{}' is not a non-negative number", part),
        })
      })?;
      components.push(n);
    }

    Ok(Self {
      components,
      qualifier: caps.get(2).map(|m| m.as_str().to_string()),
    })
  }

  /// Parse a publish-time version: any qualifier is rejected
  pub fn parse_release(input: &str) -> ShipwayResult<Self> {
    let version = Self::parse(input)?;
    match version.qualifier {
      Some(qualifier) => Err(ShipwayError::Config(ConfigError::NotReleaseVersion {
        input: input.to_string(),
        qualifier,
      })),
      None => Ok(version),
    }
  }

  /// Numeric components, most significant first
  #[allow(dead_code)]
  pub fn components(&self) -> &[u64] {
    &self.components
  }

  /// Qualifier after the first dash, if any
  #[allow(dead_code)]
  pub fn qualifier(&self) -> Option<&str> {
    self.qualifier.as_deref()
  }

  /// Whether this version can be accepted for publishing
  pub fn is_release(&self) -> bool {
    self.qualifier.is_none()
  }

  /// The same version with any qualifier stripped
  pub fn base(&self) -> Self {
    Self {
      components: self.components.clone(),
      qualifier: None,
    }
  }

  /// Next development version: bump the minor component, zero the rest,
  /// strip any qualifier. Short versions are padded to two components.
  pub fn bump_minor(&self) -> Self {
    let mut components = self.components.clone();
    if components.len() < 2 {
      components.resize(2, 0);
    }
    components[1] += 1;
    for c in components.iter_mut().skip(2) {
      *c = 0;
    }
    Self {
      components,
      qualifier: None,
    }
  }

  /// Restamp as `"<self>-<suffix>"`
  pub fn with_suffix(&self, suffix: &str) -> Self {
    let qualifier = match &self.qualifier {
      Some(existing) => format!("{}-{}", existing, suffix),
      None => suffix.to_string(),
    };
    Self {
      components: self.components.clone(),
      qualifier: Some(qualifier),
    }
  }
}

impl Ord for Version {
  fn cmp(&self, other: &Self) -> Ordering {
    // Component-wise with zero-padding, so 1.2 == 1.2.0
    let len = self.components.len().max(other.components.len());
    for i in 0..len {
      let a = self.components.get(i).copied().unwrap_or(0);
      let b = other.components.get(i).copied().unwrap_or(0);
      match a.cmp(&b) {
        Ordering::Equal => continue,
        ord => return ord,
      }
    }

    // A plain release sorts above a qualified build of the same components
    match (&self.qualifier, &other.qualifier) {
      (None, None) => Ordering::Equal,
      (None, Some(_)) => Ordering::Greater,
      (Some(_), None) => Ordering::Less,
      (Some(a), Some(b)) => a.cmp(b),
    }
  }
}

impl PartialOrd for Version {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl fmt::Display for Version {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let joined = self
      .components
      .iter()
      .map(|c| c.to_string())
      .collect::<Vec<_>>()
      .join(".");
    match &self.qualifier {
      Some(q) => write!(f, "{}-{}", joined, q),
      None => write!(f, "{}", joined),
    }
  }
}

impl FromStr for Version {
  type Err = ShipwayError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::parse(s)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_plain_release() {
    let v = Version::parse("1.2.0").unwrap();
    assert_eq!(v.components(), &[1, 2, 0]);
    assert_eq!(v.qualifier(), None);
    assert!(v.is_release());
  }

  #[test]
  fn test_parse_with_qualifier() {
    let v = Version::parse("1.2.0-alpha-2026-8-6").unwrap();
    assert_eq!(v.components(), &[1, 2, 0]);
    assert_eq!(v.qualifier(), Some("alpha-2026-8-6"));
    assert!(!v.is_release());
  }

  #[test]
  fn test_parse_rejects_garbage() {
    assert!(Version::parse("").is_err());
    assert!(Version::parse("abc").is_err());
    assert!(Version::parse("1..2").is_err());
    assert!(Version::parse("1.x.0").is_err());
    assert!(Version::parse("-alpha").is_err());
  }

  #[test]
  fn test_parse_release_rejects_qualifiers() {
    for input in ["1.0.0-SNAPSHOT", "2.1.0-alpha", "1.2.0-rc-1"] {
      assert!(Version::parse_release(input).is_err(), "{} should be rejected", input);
    }
    assert!(Version::parse_release("1.2.0").is_ok());
  }

  #[test]
  fn test_compare_reflexive() {
    let v = Version::parse_release("1.2.0").unwrap();
    assert_eq!(v.cmp(&v), Ordering::Equal);
  }

  #[test]
  fn test_compare_zero_padded() {
    let short = Version::parse("1.2").unwrap();
    let long = Version::parse("1.2.0").unwrap();
    assert_eq!(short.cmp(&long), Ordering::Equal);
    assert!(Version::parse("1.2.1").unwrap() > short);
  }

  #[test]
  fn test_release_sorts_above_prerelease() {
    let release = Version::parse("1.2.0").unwrap();
    let alpha = Version::parse("1.2.0-alpha").unwrap();
    assert!(release > alpha);
  }

  #[test]
  fn test_bump_minor_strictly_exceeds() {
    for input in ["1.2.0", "0.9.9", "3.0", "7", "1.4.0.1"] {
      let v = Version::parse(input).unwrap();
      let bumped = v.bump_minor();
      assert!(bumped > v, "bump_minor({}) = {} should exceed it", v, bumped);
      assert!(bumped.is_release());
    }
  }

  #[test]
  fn test_bump_minor_zeroes_tail() {
    let v = Version::parse("1.2.3").unwrap();
    assert_eq!(v.bump_minor().to_string(), "1.3.0");

    let v = Version::parse("1.2.3-SNAPSHOT").unwrap();
    assert_eq!(v.bump_minor().to_string(), "1.3.0");

    let v = Version::parse("2").unwrap();
    assert_eq!(v.bump_minor().to_string(), "2.1");
  }

  #[test]
  fn test_base_strips_qualifier() {
    let v = Version::parse("1.2.0-SNAPSHOT").unwrap();
    assert_eq!(v.base().to_string(), "1.2.0");
    assert!(v.base().is_release());
  }

  #[test]
  fn test_with_suffix_display() {
    let v = Version::parse("1.2.0").unwrap();
    assert_eq!(v.with_suffix("alpha-2026-08-06").to_string(), "1.2.0-alpha-2026-08-06");

    let stamped = v.with_suffix("alpha").with_suffix("42");
    assert_eq!(stamped.to_string(), "1.2.0-alpha-42");
    assert!(Version::parse_release(&stamped.to_string()).is_err());
  }

  #[test]
  fn test_display_round_trip() {
    for input in ["1.2.0", "1.2", "10.0.3-beta", "0.1.0-alpha-2026-1-9"] {
      let v = Version::parse(input).unwrap();
      assert_eq!(v.to_string(), input);
      assert_eq!(Version::parse(&v.to_string()).unwrap(), v);
    }
  }
}
