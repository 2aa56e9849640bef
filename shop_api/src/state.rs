// shop_api/src/state.rs
use crate::errors::AppError;
use crate::pipelines;
use crate::store::ShopStore;
use std::sync::Arc;
use wow_workflow::Registry;

#[derive(Clone)]
pub struct AppState {
  pub store: Arc<dyn ShopStore>,
  pub workflows: Arc<Registry<AppError>>,
}

impl AppState {
  /// Wraps `store` and registers all pipelines against it.
  pub fn new(store: Arc<dyn ShopStore>) -> Self {
    let workflows = Arc::new(Registry::<AppError>::new());
    pipelines::register_all_pipelines(&workflows);
    Self { store, workflows }
  }
}
