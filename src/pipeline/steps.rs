//! The predefined release pipelines
//!
//! Exactly two pipelines exist, nightly and stable. They differ only in
//! their first step (version resolution) and share the rest: metadata
//! validation, dependency checks, tests, compatibility check, hooks,
//! signed publish, and repository-side promotion.

use super::step::{no_check, ReleaseStep};
use super::{Pipeline, StepContext};
use crate::core::env::{PGP_PASSPHRASE, REGISTRY_TOKEN, RELEASE_TOKEN};
use crate::core::error::{EnvError, ShipwayError, ShipwayResult};
use crate::core::state::Flavor;
use crate::core::version::Version;
use crate::decide;
use crate::host::{release_notes_path, Hook};

/// Build the pipeline for a release flavor
pub fn release_pipeline(flavor: Flavor) -> Pipeline {
  Pipeline::new(vec![
    resolve_version(flavor),
    validate_metadata(),
    check_snapshot_dependencies(),
    run_tests(),
    compat_check(),
    hook_step("before-publish", Hook::BeforePublish),
    publish(),
    hook_step("after-publish", Hook::AfterPublish),
    promote(),
  ])
}

/// Flavor-specific version resolution, including the publish guard
fn resolve_version(flavor: Flavor) -> ReleaseStep {
  ReleaseStep::single(
    "resolve-version",
    move |ctx, state| match flavor {
      // Cheap local preconditions surface before any action runs;
      // resolution itself (and the registry guard) is the action
      Flavor::Nightly => match &state.version_override {
        Some(raw) => Version::parse_release(raw).map(|_| ()),
        None => ctx.config.declared_version().map(|_| ()),
      },
      Flavor::Stable => {
        if state.version_override.is_none() {
          let ci = ctx.env.ci.as_ref().ok_or_else(|| {
            ShipwayError::Environment(EnvError::CiOnly {
              command: "release-process stable".to_string(),
            })
          })?;
          if ci.tag.is_none() {
            return Err(ShipwayError::Environment(EnvError::MissingTag));
          }
        }
        Ok(())
      }
    },
    move |ctx, state, _| {
      let decision = decide::decide(
        flavor,
        state.version_override.as_deref(),
        ctx.config,
        ctx.env,
        ctx.registry,
        ctx.module,
        ctx.today,
      )?;
      println!(
        "🏷️  {} {} -> next development version {}",
        ctx.module, decision.version, decision.next_version
      );
      state.version = Some(decision.version);
      state.next_version = Some(decision.next_version);
      Ok(())
    },
  )
}

/// Publishing metadata completeness; pure validation, so the check and the
/// action run the same probe
fn validate_metadata() -> ReleaseStep {
  ReleaseStep::single(
    "validate-metadata",
    |ctx, _| ctx.config.validate_metadata(),
    |ctx, _, _| ctx.config.validate_metadata(),
  )
}

fn snapshot_dependencies(ctx: &StepContext) -> ShipwayResult<()> {
  for dep in &ctx.config.dependencies {
    let version = Version::parse(&dep.version)?;
    if !version.is_release() {
      return Err(ShipwayError::with_help(
        format!("Dependency '{}' has unreleased version '{}'", dep.name, version),
        "Release the dependency first, or pin a published version.",
      ));
    }
  }
  Ok(())
}

/// Fail if any declared dependency is unreleased
fn check_snapshot_dependencies() -> ReleaseStep {
  ReleaseStep::single(
    "check-snapshot-dependencies",
    |ctx, _| snapshot_dependencies(ctx),
    |ctx, _, _| snapshot_dependencies(ctx),
  )
}

fn run_tests() -> ReleaseStep {
  ReleaseStep::single(
    "run-tests",
    |ctx, state| {
      if !state.skip_tests && ctx.config.build.test.trim().is_empty() {
        return Err(ShipwayError::with_help(
          "No test command configured",
          "Set build.test in shipway.toml or pass skip-tests.",
        ));
      }
      Ok(())
    },
    |ctx, state, _| {
      if state.skip_tests {
        println!("⏭️  Tests skipped on request");
        return Ok(());
      }
      ctx.host.run_tests()
    },
  )
}

/// Binary-compatibility check against the latest published version
fn compat_check() -> ReleaseStep {
  ReleaseStep::single("compat-check", no_check, |ctx, _, _| {
    if ctx.config.build.compat_check.trim().is_empty() {
      println!("⏭️  No compatibility checker configured, skipping");
      return Ok(());
    }
    match ctx.registry.latest_version(ctx.module)? {
      Some(latest) => ctx.host.compat_check(&latest),
      None => {
        println!("ℹ️  First release of {}; nothing to compare against", ctx.module);
        Ok(())
      }
    }
  })
}

fn hook_step(name: &'static str, hook: Hook) -> ReleaseStep {
  ReleaseStep::single(name, no_check, move |ctx, state, _| {
    ctx.host.hook(hook, state.version()?)
  })
}

/// Signed publish; repeated per target when cross-building
fn publish() -> ReleaseStep {
  ReleaseStep::cross_build(
    "publish",
    |ctx, _| {
      // Credentials are hard requirements for a real publish
      if ctx.env.test_mode {
        return Ok(());
      }
      if ctx.env.credentials.registry_token.is_none() {
        return Err(ShipwayError::Environment(EnvError::MissingVar {
          name: REGISTRY_TOKEN.to_string(),
        }));
      }
      if ctx.env.credentials.pgp_passphrase.is_none() {
        return Err(ShipwayError::Environment(EnvError::MissingVar {
          name: PGP_PASSPHRASE.to_string(),
        }));
      }
      Ok(())
    },
    |ctx, state, target| {
      if let Some(target) = target {
        println!("📦 Publishing {} for {}", state.version()?, target);
      }
      ctx.host.publish(state.version()?, target)
    },
  )
}

/// Repository-side release promotion, with release notes when present
fn promote() -> ReleaseStep {
  ReleaseStep::single(
    "promote",
    |ctx, _| {
      // The built-in registry promotion needs the release token
      if !ctx.env.test_mode
        && ctx.config.build.promote.trim().is_empty()
        && ctx.env.credentials.release_token.is_none()
      {
        return Err(ShipwayError::Environment(EnvError::MissingVar {
          name: RELEASE_TOKEN.to_string(),
        }));
      }
      Ok(())
    },
    |ctx, state, _| {
      let version = state.version()?;
      match release_notes_path(ctx.project_root, version) {
        Some(notes) => println!("📝 Release notes: {}", notes.display()),
        None => println!("ℹ️  No release notes found under notes/{}.md", version),
      }
      ctx.host.promote(version)
    },
  )
}
