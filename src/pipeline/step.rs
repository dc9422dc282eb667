//! Release step model
//!
//! A step is a named unit of work with two parts: a side-effect-free
//! *check* probing its preconditions, and an effectful *action*. Actions
//! come in two shapes: plain, and cross-build-eligible (repeated once per
//! configured target when cross-building is enabled). Steps are value
//! objects with no identity beyond their position and name.

use super::StepContext;
use crate::core::error::ShipwayResult;
use crate::core::state::ReleaseState;

pub type CheckFn = Box<dyn Fn(&StepContext, &ReleaseState) -> ShipwayResult<()>>;
pub type ActionFn = Box<dyn Fn(&StepContext, &mut ReleaseState, Option<&str>) -> ShipwayResult<()>>;

/// The effectful part of a step
pub enum StepAction {
  /// Runs exactly once
  Single(ActionFn),
  /// Runs once per configured target when cross-building is enabled,
  /// once with no target otherwise
  CrossBuild(ActionFn),
}

/// A named, independently failable unit of release work
pub struct ReleaseStep {
  pub name: &'static str,
  pub check: CheckFn,
  pub action: StepAction,
}

impl ReleaseStep {
  /// A step whose action runs exactly once
  pub fn single<C, A>(name: &'static str, check: C, action: A) -> Self
  where
    C: Fn(&StepContext, &ReleaseState) -> ShipwayResult<()> + 'static,
    A: Fn(&StepContext, &mut ReleaseState, Option<&str>) -> ShipwayResult<()> + 'static,
  {
    Self {
      name,
      check: Box::new(check),
      action: StepAction::Single(Box::new(action)),
    }
  }

  /// A cross-build-eligible step
  pub fn cross_build<C, A>(name: &'static str, check: C, action: A) -> Self
  where
    C: Fn(&StepContext, &ReleaseState) -> ShipwayResult<()> + 'static,
    A: Fn(&StepContext, &mut ReleaseState, Option<&str>) -> ShipwayResult<()> + 'static,
  {
    Self {
      name,
      check: Box::new(check),
      action: StepAction::CrossBuild(Box::new(action)),
    }
  }
}

/// Check that always passes, for steps without a meaningful precondition
pub fn no_check(_ctx: &StepContext, _state: &ReleaseState) -> ShipwayResult<()> {
  Ok(())
}
