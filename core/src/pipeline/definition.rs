// wow-workflow/src/pipeline/definition.rs

use crate::core::context::Handler;
use crate::core::step::{SkipCondition, StepDef};
use crate::error::WorkflowError;
use std::collections::HashMap;

/// An ordered set of named steps over context data `TData`.
///
/// `Err` is what handlers fail with. It must absorb [`WorkflowError`] so that
/// engine-level failures (a required step without handlers, for instance)
/// surface through the same channel.
pub struct Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<WorkflowError> + Send + Sync + 'static,
{
  pub(crate) steps: Vec<StepDef<TData>>,
  pub(crate) before: HashMap<String, Vec<Handler<TData, Err>>>,
  pub(crate) on: HashMap<String, Vec<Handler<TData, Err>>>,
  pub(crate) after: HashMap<String, Vec<Handler<TData, Err>>>,
}

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<WorkflowError> + Send + Sync + 'static,
{
  /// Builds a pipeline from `(name, optional, skip_if)` tuples, in run order.
  pub fn new(step_defs: &[(&str, bool, Option<SkipCondition<TData>>)]) -> Self {
    let steps = step_defs
      .iter()
      .map(|(name, optional, skip_if)| StepDef {
        name: (*name).to_string(),
        optional: *optional,
        skip_if: skip_if.clone(),
      })
      .collect();

    Self {
      steps,
      before: HashMap::new(),
      on: HashMap::new(),
      after: HashMap::new(),
    }
  }

  pub fn step_names(&self) -> Vec<&str> {
    self.steps.iter().map(|s| s.name.as_str()).collect()
  }

  fn position_of(&self, step_name: &str) -> Option<usize> {
    self.steps.iter().position(|s| s.name == step_name)
  }

  /// Panics on unknown step names; a typo here is a wiring bug, not a runtime condition.
  pub(crate) fn ensure_step_exists(&self, step_name: &str) {
    if self.position_of(step_name).is_none() {
      panic!("workflow setup error: step '{}' is not defined in this pipeline", step_name);
    }
  }

  /// Inserts a new required step right after `existing_step_name`.
  pub fn insert_after_step(&mut self, existing_step_name: &str, new_step_name: impl Into<String>) {
    let new_step_name = new_step_name.into();
    if self.position_of(&new_step_name).is_some() {
      panic!("workflow setup error: step '{}' already exists", new_step_name);
    }
    match self.position_of(existing_step_name) {
      Some(idx) => self.steps.insert(idx + 1, StepDef::required(new_step_name)),
      None => panic!(
        "workflow setup error: step '{}' is not defined in this pipeline",
        existing_step_name
      ),
    }
  }

  /// Removes a step together with its handlers. Unknown names are ignored.
  pub fn remove_step(&mut self, step_name: &str) {
    if let Some(idx) = self.position_of(step_name) {
      self.steps.remove(idx);
      self.before.remove(step_name);
      self.on.remove(step_name);
      self.after.remove(step_name);
    }
  }

  pub fn set_skip_condition(&mut self, step_name: &str, skip_if: Option<SkipCondition<TData>>) {
    self.ensure_step_exists(step_name);
    if let Some(step) = self.steps.iter_mut().find(|s| s.name == step_name) {
      step.skip_if = skip_if;
    }
  }
}
