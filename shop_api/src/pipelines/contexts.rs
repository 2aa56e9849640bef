// shop_api/src/pipelines/contexts.rs

//! Underlying data structs used by workflow pipelines.
//! Handlers receive these wrapped in `wow_workflow::ContextData`.

use crate::models::{OrderLine, PlacedOrder, Product};
use crate::store::ShopStore;
use crate::validation::OrderRequest;
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// State threaded through the place-order pipeline. Each step fills in the next field.
#[derive(Clone)]
pub struct PlaceOrderCtxData {
  pub store: Arc<dyn ShopStore>,
  /// Body as received. Consumed by validation.
  pub raw_request: Value,
  pub request: Option<OrderRequest>,
  pub products: HashMap<Uuid, Product>,
  pub lines: Vec<OrderLine>,
  pub total: Decimal,
  pub placed: Option<PlacedOrder>,
}

impl PlaceOrderCtxData {
  pub fn new(store: Arc<dyn ShopStore>, raw_request: Value) -> Self {
    Self {
      store,
      raw_request,
      request: None,
      products: HashMap::new(),
      lines: Vec::new(),
      total: Decimal::ZERO,
      placed: None,
    }
  }
}
