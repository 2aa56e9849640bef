// wow-workflow/src/core/step.rs

use super::ContextData;
use std::sync::Arc;

/// Predicate evaluated right before a step; `true` skips it.
pub type SkipCondition<TData> = Arc<dyn Fn(ContextData<TData>) -> bool + Send + Sync + 'static>;

#[derive(Clone)]
pub struct StepDef<T: 'static + Send + Sync> {
  pub name: String,
  /// Optional steps without handlers are passed over instead of failing the run.
  pub optional: bool,
  pub skip_if: Option<SkipCondition<T>>,
}

impl<T: 'static + Send + Sync> StepDef<T> {
  pub fn required(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      optional: false,
      skip_if: None,
    }
  }
}

impl<T: 'static + Send + Sync> std::fmt::Debug for StepDef<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("StepDef")
      .field("name", &self.name)
      .field("optional", &self.optional)
      .field("skip_if_present", &self.skip_if.is_some())
      .finish()
  }
}
