//! Version decision engine
//!
//! Resolves the version to publish and the next development version for
//! both release flavors, then guards against double-publishing. Resolution
//! is stateless: every invocation recomputes from the same inputs, so a
//! failed release can simply be re-run.
//!
//! Nightly: base version (CLI override or the host-declared version)
//! restamped as `<base>-alpha-<YYYY>-<MM>-<DD>`. Stable: the release tag
//! (CLI override or CI tag) with a leading `v` stripped. In test mode both
//! flavors append a build-unique suffix: the CI build number, or a random
//! non-negative integer outside CI.

use crate::core::config::ShipwayConfig;
use crate::core::env::EnvSnapshot;
use crate::core::error::{EnvError, ShipwayError, ShipwayResult};
use crate::core::state::Flavor;
use crate::core::version::Version;
use crate::registry::{ModuleId, ModuleRegistry};
use chrono::NaiveDate;

/// Outcome of version resolution
#[derive(Debug, Clone)]
pub struct Decision {
  /// The version to publish
  pub version: Version,
  /// The next development version
  pub next_version: Version,
}

/// Resolve the release version for a flavor and check the publish guard
pub fn decide(
  flavor: Flavor,
  version_override: Option<&str>,
  config: &ShipwayConfig,
  env: &EnvSnapshot,
  registry: &dyn ModuleRegistry,
  module: &ModuleId,
  today: NaiveDate,
) -> ShipwayResult<Decision> {
  let decision = match flavor {
    Flavor::Nightly => decide_nightly(version_override, config, env, today)?,
    Flavor::Stable => decide_stable(version_override, env)?,
  };

  if registry.exists(module, &decision.version)? {
    return Err(ShipwayError::Guard {
      module: module.to_string(),
      version: decision.version.to_string(),
    });
  }

  Ok(decision)
}

fn decide_nightly(
  version_override: Option<&str>,
  config: &ShipwayConfig,
  env: &EnvSnapshot,
  today: NaiveDate,
) -> ShipwayResult<Decision> {
  let base = match version_override {
    Some(raw) => Version::parse_release(raw)?,
    None => config.declared_version()?.base(),
  };

  let next_version = base.bump_minor();

  let mut version = base.with_suffix(&format!("alpha-{}", today.format("%Y-%m-%d")));
  if env.test_mode {
    version = version.with_suffix(&build_unique_suffix(env));
  }

  Ok(Decision { version, next_version })
}

fn decide_stable(version_override: Option<&str>, env: &EnvSnapshot) -> ShipwayResult<Decision> {
  let tag = match version_override.filter(|v| !v.trim().is_empty()) {
    Some(raw) => raw.to_string(),
    None => {
      let ci = env.ci.as_ref().ok_or_else(|| {
        ShipwayError::Environment(EnvError::CiOnly {
          command: "release-process stable".to_string(),
        })
      })?;
      ci.tag.clone().ok_or(ShipwayError::Environment(EnvError::MissingTag))?
    }
  };

  let cleaned = tag.strip_prefix('v').unwrap_or(&tag);
  let base = Version::parse_release(cleaned)?;
  let next_version = base.bump_minor();

  let version = if env.test_mode {
    base.with_suffix(&build_unique_suffix(env))
  } else {
    base
  };

  Ok(Decision { version, next_version })
}

/// CI build number when available, else a random non-negative integer
fn build_unique_suffix(env: &EnvSnapshot) -> String {
  env
    .ci
    .as_ref()
    .and_then(|ci| ci.build_number.clone())
    .unwrap_or_else(|| rand::random::<u32>().to_string())
}
