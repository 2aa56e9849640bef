// wow-workflow/src/registry.rs

//! `Registry<E>`: pipelines keyed by the type of context data they run on.
//!
//! Callers never name a pipeline; they build a `ContextData<T>` and the
//! registry dispatches to whichever pipeline was registered for `T`.

use crate::core::context_data::ContextData;
use crate::core::control::PipelineResult;
use crate::error::WorkflowError;
use crate::pipeline::definition::Pipeline;

use async_trait::async_trait;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{event, Level};

#[async_trait]
trait ErasedPipeline<AppErr>: Send + Sync
where
  AppErr: std::error::Error + Send + Sync + 'static,
{
  /// `ctx` must hold a `ContextData<TData>` for the wrapped pipeline's `TData`.
  async fn run_erased(&self, ctx: Box<dyn Any + Send>) -> Result<PipelineResult, AppErr>;
}

struct TypedPipeline<TData, HandlerErr, AppErr>
where
  TData: 'static + Send + Sync,
  HandlerErr: std::error::Error + From<WorkflowError> + Send + Sync + 'static,
{
  pipeline: Pipeline<TData, HandlerErr>,
  _app_err: PhantomData<fn() -> AppErr>,
}

#[async_trait]
impl<TData, HandlerErr, AppErr> ErasedPipeline<AppErr> for TypedPipeline<TData, HandlerErr, AppErr>
where
  TData: 'static + Send + Sync,
  HandlerErr: std::error::Error + From<WorkflowError> + Send + Sync + 'static,
  AppErr: std::error::Error + From<HandlerErr> + From<WorkflowError> + Send + Sync + 'static,
{
  async fn run_erased(&self, ctx: Box<dyn Any + Send>) -> Result<PipelineResult, AppErr> {
    let ctx_data = match ctx.downcast::<ContextData<TData>>() {
      Ok(boxed) => *boxed,
      Err(_) => {
        let expected_type = std::any::type_name::<ContextData<TData>>().to_string();
        event!(Level::ERROR, %expected_type, "Context object type mismatch.");
        return Err(AppErr::from(WorkflowError::TypeMismatch { expected_type }));
      }
    };
    self.pipeline.run(ctx_data).await.map_err(AppErr::from)
  }
}

/// Type-keyed pipeline registry. `run` reports failures as `AppErr`.
pub struct Registry<AppErr = WorkflowError>
where
  AppErr: std::error::Error + From<WorkflowError> + Send + Sync + 'static,
{
  pipelines: RwLock<HashMap<TypeId, Arc<dyn ErasedPipeline<AppErr>>>>,
}

impl<AppErr> Default for Registry<AppErr>
where
  AppErr: std::error::Error + From<WorkflowError> + Send + Sync + 'static,
{
  fn default() -> Self {
    Self::new()
  }
}

impl<AppErr> Registry<AppErr>
where
  AppErr: std::error::Error + From<WorkflowError> + Send + Sync + 'static,
{
  pub fn new() -> Self {
    Self {
      pipelines: RwLock::new(HashMap::new()),
    }
  }

  /// Registers `pipeline` for context type `TData`, replacing any earlier one.
  pub fn register_pipeline<TData, HandlerErr>(&self, pipeline: Pipeline<TData, HandlerErr>)
  where
    TData: 'static + Send + Sync,
    HandlerErr: std::error::Error + From<WorkflowError> + Send + Sync + 'static,
    AppErr: From<HandlerErr>,
  {
    event!(Level::DEBUG, context_type = %std::any::type_name::<TData>(), "Registering pipeline.");
    let typed = TypedPipeline::<TData, HandlerErr, AppErr> {
      pipeline,
      _app_err: PhantomData,
    };
    self.pipelines.write().insert(TypeId::of::<TData>(), Arc::new(typed));
  }

  pub fn is_registered<TData: 'static>(&self) -> bool {
    self.pipelines.read().contains_key(&TypeId::of::<TData>())
  }

  /// Runs the pipeline registered for `TData`.
  pub async fn run<TData>(&self, ctx_data: ContextData<TData>) -> Result<PipelineResult, AppErr>
  where
    TData: 'static + Send + Sync,
  {
    let runner = self.pipelines.read().get(&TypeId::of::<TData>()).cloned();
    let runner = runner.ok_or_else(|| {
      let type_name = std::any::type_name::<TData>().to_string();
      event!(Level::ERROR, %type_name, "No pipeline registered for context type.");
      AppErr::from(WorkflowError::PipelineNotRegistered { type_name })
    })?;
    runner.run_erased(Box::new(ctx_data)).await
  }
}
