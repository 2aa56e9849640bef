// tests/common/mod.rs
#![allow(dead_code)]

use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::Level;
use wow_workflow::{ContextData, Handler, PipelineControl, WorkflowError};

/// Stand-in for an order ticket moving through a workflow.
#[derive(Clone, Debug, Default)]
pub struct TicketContext {
  pub subtotal: i64,
  pub notes: String,
  pub steps_executed: Vec<String>,
  pub stop_at: Option<String>,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  /// Engine error, stored as its Debug text so the enum stays comparable.
  #[error("workflow error: {0}")]
  Workflow(String),

  #[error("step failed: {0}")]
  Step(String),
}

impl From<WorkflowError> for TestError {
  fn from(err: WorkflowError) -> Self {
    TestError::Workflow(format!("{:?}", err))
  }
}

/// Adds `amount` to the subtotal and records the step; stops if `stop_at` names it.
pub fn add_to_subtotal(step_name: &'static str, amount: i64) -> Handler<TicketContext, TestError> {
  Box::new(move |ctx: ContextData<TicketContext>| {
    Box::pin(async move {
      let mut guard = ctx.write();
      guard.subtotal += amount;
      guard.notes.push_str(&format!("{}+{};", step_name, amount));
      guard.steps_executed.push(step_name.to_string());
      tracing::debug!(target: "test_handlers", step = step_name, subtotal = guard.subtotal, "executed");
      if guard.stop_at.as_deref() == Some(step_name) {
        return Ok(PipelineControl::Stop);
      }
      Ok(PipelineControl::Continue)
    })
  })
}

pub fn failing_step(step_name: &'static str, message: &'static str) -> Handler<TicketContext, TestError> {
  Box::new(move |ctx: ContextData<TicketContext>| {
    Box::pin(async move {
      ctx.write().steps_executed.push(step_name.to_string());
      Err(TestError::Step(message.to_string()))
    })
  })
}

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

pub static SKIP_PROBES: AtomicUsize = AtomicUsize::new(0);

pub fn reset_probes() {
  SKIP_PROBES.store(0, Ordering::SeqCst);
}
