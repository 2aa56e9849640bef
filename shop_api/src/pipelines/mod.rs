// shop_api/src/pipelines/mod.rs

//! Defines and registers the workflow pipelines used by the shop API.

use crate::errors::AppError;
use wow_workflow::Registry;

pub mod contexts;
pub mod place_order_pipeline;

/// Registers every pipeline with `registry`. Called once when state is built.
pub fn register_all_pipelines(registry: &Registry<AppError>) {
  tracing::info!("Registering workflow pipelines...");
  place_order_pipeline::register_place_order_pipeline(registry);
  tracing::info!("All application pipelines registered.");
}
