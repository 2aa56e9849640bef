// wow-workflow/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

/// Failures raised by the engine itself, as opposed to the domain errors
/// returned by step handlers.
#[derive(Debug, Error)]
pub enum WorkflowError {
  #[error("Step not found: {step_name}")]
  StepNotFound { step_name: String },

  #[error("Handler missing for non-optional step: {step_name}")]
  HandlerMissing { step_name: String },

  #[error("Type mismatch while dispatching context (expected {expected_type})")]
  TypeMismatch { expected_type: String },

  #[error("No pipeline registered for context type {type_name}")]
  PipelineNotRegistered { type_name: String },

  #[error("Step handler failed. Source: {source}")]
  HandlerError {
    #[source]
    source: AnyhowError,
  },

  #[error("Internal workflow error: {0}")]
  Internal(String),
}

impl From<AnyhowError> for WorkflowError {
  fn from(err: AnyhowError) -> Self {
    // Avoid HandlerError(HandlerError(..)) when a WorkflowError round-trips through anyhow.
    match err.downcast::<WorkflowError>() {
      Ok(inner) => inner,
      Err(err) => WorkflowError::HandlerError { source: err },
    }
  }
}

pub type WorkflowResult<T, E = WorkflowError> = std::result::Result<T, E>;
