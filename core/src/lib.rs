// wow-workflow/src/lib.rs

//! A small asynchronous workflow engine.
//!
//! A [`Pipeline`] is an ordered list of named steps. Each step owns up to three
//! groups of async handlers (`before`, `on`, `after`) that operate on a shared
//! [`ContextData`]. A handler answers with [`PipelineControl::Continue`] or
//! [`PipelineControl::Stop`], or fails with the pipeline's error type, which
//! aborts the run.
//!
//! Steps may be optional (no handlers is fine) or carry a skip condition that
//! is evaluated against the context right before the step runs.
//!
//! [`Registry`] keys pipelines by their context type so callers can run a
//! workflow by handing over nothing but the context.

pub mod core;
pub mod error;
pub mod pipeline;
pub mod registry;

pub use crate::core::context::Handler;
pub use crate::core::context_data::ContextData;
pub use crate::core::control::{PipelineControl, PipelineResult};
pub use crate::core::step::{SkipCondition, StepDef};

pub use crate::pipeline::definition::Pipeline;

pub use crate::error::{WorkflowError, WorkflowResult};

pub use crate::registry::Registry;
