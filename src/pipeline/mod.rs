//! Release step pipeline
//!
//! Executes an ordered sequence of steps in two passes. The check pass
//! probes every step's preconditions against the initial state before any
//! action runs; a failing check hard-aborts the whole pipeline. The action
//! pass then executes each action in declared order, halting at the first
//! failure. The outcome is an explicit value; the pipeline never mutates
//! anything outside the `ReleaseState` it owns, so a failed invocation can
//! always be retried as-is.

pub mod step;
pub mod steps;

use crate::core::config::ShipwayConfig;
use crate::core::env::EnvSnapshot;
use crate::core::error::ShipwayError;
use crate::core::state::ReleaseState;
use crate::host::BuildHost;
use crate::registry::{ModuleId, ModuleRegistry};
use crate::ui::progress::StepProgress;
use chrono::NaiveDate;
use std::path::Path;

use step::{ReleaseStep, StepAction};

/// Read-only collaborators every step can reach
pub struct StepContext<'a> {
  pub config: &'a ShipwayConfig,
  pub env: &'a EnvSnapshot,
  pub registry: &'a dyn ModuleRegistry,
  pub host: &'a dyn BuildHost,
  pub module: &'a ModuleId,
  pub project_root: &'a Path,
  pub today: NaiveDate,
}

/// Result of a pipeline run; the dispatcher decides what a failure means
pub enum PipelineOutcome {
  Success(ReleaseState),
  Failure {
    step: String,
    error: ShipwayError,
    state: ReleaseState,
  },
}

/// An ordered sequence of release steps
pub struct Pipeline {
  steps: Vec<ReleaseStep>,
}

impl Pipeline {
  pub fn new(steps: Vec<ReleaseStep>) -> Self {
    Self { steps }
  }

  #[allow(dead_code)]
  pub fn step_names(&self) -> Vec<&'static str> {
    self.steps.iter().map(|s| s.name).collect()
  }

  /// Run the check pass, then the action pass
  pub fn run(&self, ctx: &StepContext, mut state: ReleaseState) -> PipelineOutcome {
    for step in &self.steps {
      if let Err(error) = (step.check)(ctx, &state) {
        return PipelineOutcome::Failure {
          step: step.name.to_string(),
          error,
          state,
        };
      }
    }

    let mut progress = StepProgress::new(self.steps.len(), format!("{} release", state.flavor));

    for step in &self.steps {
      println!("▶️  {}", step.name);
      if let Err(error) = self.run_action(step, ctx, &mut state) {
        return PipelineOutcome::Failure {
          step: step.name.to_string(),
          error,
          state,
        };
      }
      progress.inc();
    }

    PipelineOutcome::Success(state)
  }

  fn run_action(
    &self,
    step: &ReleaseStep,
    ctx: &StepContext,
    state: &mut ReleaseState,
  ) -> crate::core::error::ShipwayResult<()> {
    match &step.action {
      StepAction::Single(action) => action(ctx, state, None),
      StepAction::CrossBuild(action) => {
        if state.cross_build && !ctx.config.build.targets.is_empty() {
          // Sequential: publish-affecting actions are not safe to
          // parallelize against a shared remote index
          for target in &ctx.config.build.targets {
            action(ctx, state, Some(target.as_str()))?;
          }
          Ok(())
        } else {
          action(ctx, state, None)
        }
      }
    }
  }
}
