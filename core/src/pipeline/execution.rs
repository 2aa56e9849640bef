// wow-workflow/src/pipeline/execution.rs

use crate::core::context::Handler;
use crate::core::context_data::ContextData;
use crate::core::control::{PipelineControl, PipelineResult};
use crate::core::step::StepDef;
use crate::error::WorkflowError;
use crate::pipeline::definition::Pipeline;
use tracing::{event, instrument, Instrument, Level};

/// Outcome of one phase of one step.
enum PhaseOutcome {
  Continue,
  Stopped,
}

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<WorkflowError> + Send + Sync + 'static,
{
  async fn run_phase(
    handlers: Option<&Vec<Handler<TData, Err>>>,
    phase: &'static str,
    ctx_data: &ContextData<TData>,
  ) -> Result<PhaseOutcome, Err> {
    let Some(handlers) = handlers else {
      return Ok(PhaseOutcome::Continue);
    };
    for (handler_idx, handler_fn) in handlers.iter().enumerate() {
      let span = tracing::debug_span!("step_handler", phase, handler_index = handler_idx);
      match handler_fn(ctx_data.clone()).instrument(span).await {
        Ok(PipelineControl::Continue) => {}
        Ok(PipelineControl::Stop) => {
          event!(Level::INFO, phase, "Pipeline stopped by handler.");
          return Ok(PhaseOutcome::Stopped);
        }
        Err(e) => {
          event!(Level::DEBUG, phase, error = %e, "Handler failed.");
          return Err(e);
        }
      }
    }
    Ok(PhaseOutcome::Continue)
  }

  async fn run_step(&self, step_def: &StepDef<TData>, ctx_data: &ContextData<TData>) -> Result<PhaseOutcome, Err> {
    let step_name = step_def.name.as_str();

    if let Some(skip_if) = &step_def.skip_if {
      if skip_if(ctx_data.clone()) {
        event!(Level::DEBUG, "Step skipped by condition.");
        return Ok(PhaseOutcome::Continue);
      }
    }

    let has_handlers = [&self.before, &self.on, &self.after]
      .iter()
      .any(|phase| phase.get(step_name).is_some_and(|v| !v.is_empty()));
    if !has_handlers {
      if step_def.optional {
        event!(Level::DEBUG, "Optional step has no handlers, skipping.");
        return Ok(PhaseOutcome::Continue);
      }
      event!(Level::ERROR, "Required step has no handlers.");
      return Err(Err::from(WorkflowError::HandlerMissing {
        step_name: step_def.name.clone(),
      }));
    }

    for (phase_name, phase) in [("before", &self.before), ("on", &self.on), ("after", &self.after)] {
      if let PhaseOutcome::Stopped = Self::run_phase(phase.get(step_name), phase_name, ctx_data).await? {
        return Ok(PhaseOutcome::Stopped);
      }
    }
    Ok(PhaseOutcome::Continue)
  }

  /// Runs every step in order against `ctx_data`.
  ///
  /// A required step with no handlers at all fails with
  /// [`WorkflowError::HandlerMissing`], converted into `Err`.
  #[instrument(
    name = "Pipeline::run",
    skip_all,
    fields(
      context_type = %std::any::type_name::<TData>(),
      num_steps = self.steps.len(),
    )
  )]
  pub async fn run(&self, ctx_data: ContextData<TData>) -> Result<PipelineResult, Err> {
    event!(Level::DEBUG, "Pipeline execution starting.");

    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_span = tracing::info_span!("pipeline_step", step_name = step_def.name.as_str(), step_index = step_idx);
      if let PhaseOutcome::Stopped = self.run_step(step_def, &ctx_data).instrument(step_span).await? {
        return Ok(PipelineResult::Stopped);
      }
    }

    event!(Level::DEBUG, "Pipeline execution completed.");
    Ok(PipelineResult::Completed)
  }
}
