// wow-workflow/src/core/context.rs

//! The boxed handler type stored for every step phase.

use crate::core::context_data::ContextData;
use crate::core::control::PipelineControl;
use std::future::Future;
use std::pin::Pin;

/// Future returned by a step handler.
pub type HandlerFuture<Err> = Pin<Box<dyn Future<Output = Result<PipelineControl, Err>> + Send>>;

/// A step handler.
///
/// Handlers receive a clone of the shared [`ContextData`]. Lock guards taken
/// from it are blocking and must be released before the handler awaits.
pub type Handler<TData, Err> = Box<dyn Fn(ContextData<TData>) -> HandlerFuture<Err> + Send + Sync>;
