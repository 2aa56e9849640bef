// wow-workflow/src/core/control.rs

/// Returned by a handler to say whether the run should go on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineControl {
  Continue,
  /// Halt immediately; remaining handlers and steps are not run.
  Stop,
}

/// How a run that did not fail ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineResult {
  Completed,
  /// A handler returned [`PipelineControl::Stop`].
  Stopped,
}
