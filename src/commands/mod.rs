//! Release command dispatcher
//!
//! Parses the textual release invocation, builds the release state and the
//! flavored pipeline, runs it, and maps the pipeline outcome back onto the
//! process result. Grammar:
//!
//! ```text
//! release-process <nightly|stable> [version <string>] [skip-tests] [cross-build]
//! ```
//!
//! Flags are order-independent; `cross-build` ORs with the statically
//! configured setting. Unknown flavors fail before any step work.

use crate::core::config::ShipwayConfig;
use crate::core::env::EnvSnapshot;
use crate::core::error::{ShipwayError, ShipwayResult};
use crate::core::state::{Flavor, ReleaseState};
use crate::host::ProcessHost;
use crate::pipeline::steps::release_pipeline;
use crate::pipeline::{PipelineOutcome, StepContext};
use crate::registry::http::HttpRegistry;
use crate::registry::ModuleId;
use std::path::Path;

/// A parsed release invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseRequest {
  pub flavor: Flavor,
  pub version: Option<String>,
  pub skip_tests: bool,
  pub cross_build: bool,
}

/// Parse the release token grammar
pub fn parse_release_tokens(tokens: &[String]) -> ShipwayResult<ReleaseRequest> {
  let mut iter = tokens.iter();

  match iter.next() {
    Some(token) if token == "release-process" => {}
    Some(token) => {
      return Err(ShipwayError::with_help(
        format!("Expected 'release-process', got '{}'", token),
        "Usage: release-process <nightly|stable> [version <X.Y.Z>] [skip-tests] [cross-build]",
      ));
    }
    None => {
      return Err(ShipwayError::with_help(
        "Missing 'release-process' argument",
        "Usage: release-process <nightly|stable> [version <X.Y.Z>] [skip-tests] [cross-build]",
      ));
    }
  }

  let flavor_token = iter
    .next()
    .ok_or_else(|| ShipwayError::message("Missing release process, expected 'nightly' or 'stable'"))?;
  let flavor = Flavor::parse(flavor_token).ok_or_else(|| {
    ShipwayError::with_help(
      format!("Unexpected release process '{}'", flavor_token),
      "Expected 'nightly' or 'stable'.",
    )
  })?;

  let mut request = ReleaseRequest {
    flavor,
    version: None,
    skip_tests: false,
    cross_build: false,
  };

  while let Some(token) = iter.next() {
    match token.as_str() {
      "version" => {
        let value = iter
          .next()
          .ok_or_else(|| ShipwayError::message("'version' requires a value"))?;
        request.version = Some(value.clone());
      }
      "skip-tests" => request.skip_tests = true,
      "cross-build" => request.cross_build = true,
      other => {
        return Err(ShipwayError::with_help(
          format!("Unknown release option '{}'", other),
          "Valid options: version <X.Y.Z>, skip-tests, cross-build",
        ));
      }
    }
  }

  Ok(request)
}

/// Dispatch a release invocation end to end
pub fn run_release(
  config: &ShipwayConfig,
  env: &EnvSnapshot,
  project_root: &Path,
  tokens: &[String],
) -> ShipwayResult<()> {
  let request = parse_release_tokens(tokens)?;

  let mut state = ReleaseState::new(request.flavor);
  state.version_override = request.version;
  state.skip_tests = request.skip_tests;
  state.cross_build = request.cross_build || config.build.cross_build;

  let module = ModuleId::new(config.module.group.clone(), config.module.name.clone());
  let registry = HttpRegistry::new(&config.registry.url);
  let host = ProcessHost::new(config.clone(), env.credentials.clone(), project_root.to_path_buf());

  let ctx = StepContext {
    config,
    env,
    registry: &registry,
    host: &host,
    module: &module,
    project_root,
    today: chrono::Local::now().date_naive(),
  };

  println!("🚀 Starting {} release of {}", state.flavor, module);

  match release_pipeline(request.flavor).run(&ctx, state) {
    PipelineOutcome::Success(state) => {
      println!("🎉 Released {} {}", module, state.version()?);
      if let Some(next) = &state.next_version {
        println!("   Next development version: {}", next);
      }
      Ok(())
    }
    PipelineOutcome::Failure { step, error, state } => {
      eprintln!("🛑 Release halted at step '{}'; later steps did not run", step);
      if let Some(version) = &state.version {
        // Not reverted: a retried invocation recomputes from scratch
        eprintln!("   Decided version was {}", version);
      }
      Err(error)
    }
  }
}
