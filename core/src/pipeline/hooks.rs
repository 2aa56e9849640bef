// wow-workflow/src/pipeline/hooks.rs

//! Registration of `before`, `on` and `after` handlers.
//!
//! Handlers may fail with any error that converts into the pipeline's `Err`,
//! which lets a step written against `anyhow` or `WorkflowError` live in a
//! pipeline whose error type is an application enum.

use crate::core::context::Handler;
use crate::core::context_data::ContextData;
use crate::core::control::PipelineControl;
use crate::error::WorkflowError;
use crate::pipeline::definition::Pipeline;
use std::collections::HashMap;
use std::future::Future;

fn wrap<TData, Err, F, UserErr>(handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static) -> Handler<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: 'static,
  F: Future<Output = Result<PipelineControl, UserErr>> + Send + 'static,
  UserErr: Into<Err> + 'static,
{
  Box::new(move |ctx_data| {
    let fut = handler_fn(ctx_data);
    Box::pin(async move { fut.await.map_err(Into::into) })
  })
}

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<WorkflowError> + Send + Sync + 'static,
{
  fn push_handler(
    phase: &mut HashMap<String, Vec<Handler<TData, Err>>>,
    step_name: &str,
    handler: Handler<TData, Err>,
  ) {
    phase.entry(step_name.to_string()).or_default().push(handler);
  }

  pub fn before_root<F, UserErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<PipelineControl, UserErr>> + Send + 'static,
    UserErr: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_step_exists(step_name);
    Self::push_handler(&mut self.before, step_name, wrap(handler_fn));
  }

  pub fn on_root<F, UserErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<PipelineControl, UserErr>> + Send + 'static,
    UserErr: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_step_exists(step_name);
    Self::push_handler(&mut self.on, step_name, wrap(handler_fn));
  }

  pub fn after_root<F, UserErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<PipelineControl, UserErr>> + Send + 'static,
    UserErr: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_step_exists(step_name);
    Self::push_handler(&mut self.after, step_name, wrap(handler_fn));
  }
}
