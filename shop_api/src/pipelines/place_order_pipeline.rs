// shop_api/src/pipelines/place_order_pipeline.rs

use crate::errors::AppError;
use crate::models::{OrderLine, MAX_ORDER_AMOUNT};
use crate::pipelines::contexts::PlaceOrderCtxData;
use crate::store::NewOrder;
use crate::validation::validate_order_request;
use rust_decimal::Decimal;
use serde_json::json;
use std::collections::HashMap;
use tracing::{info, instrument, warn};
use uuid::Uuid;
use wow_workflow::{ContextData, Pipeline, PipelineControl, Registry};

pub const STEP_VALIDATE: &str = "validate_order_request";
pub const STEP_RESOLVE: &str = "resolve_products";
pub const STEP_PRICE: &str = "price_line_items";
pub const STEP_PERSIST: &str = "persist_order";

fn internal(reason: &str) -> AppError {
  AppError::Internal(format!("place order pipeline: {}", reason))
}

#[instrument(name = "place_order::validate_order_request", skip(ctx_data), err)]
async fn validate_order_request_step(ctx_data: ContextData<PlaceOrderCtxData>) -> Result<PipelineControl, AppError> {
  let raw = std::mem::take(&mut ctx_data.write().raw_request);
  match validate_order_request(&raw) {
    Ok(request) => {
      ctx_data.write().request = Some(request);
      Ok(PipelineControl::Continue)
    }
    Err(errors) => {
      warn!(fields = ?errors.fields().collect::<Vec<_>>(), "Order validation failed.");
      Err(AppError::validation("Order validation failed", Some(errors.to_details())))
    }
  }
}

#[instrument(name = "place_order::resolve_products", skip(ctx_data), err)]
async fn resolve_products_step(ctx_data: ContextData<PlaceOrderCtxData>) -> Result<PipelineControl, AppError> {
  let (store, requested) = {
    let guard = ctx_data.read();
    let request = guard.request.as_ref().ok_or_else(|| internal("request not validated"))?;
    let requested: Vec<Uuid> = request.items.iter().map(|item| item.product_id).collect();
    (guard.store.clone(), requested)
  }; // guard dropped before the lookup

  let mut distinct: Vec<Uuid> = Vec::with_capacity(requested.len());
  for id in &requested {
    if !distinct.contains(id) {
      distinct.push(*id);
    }
  }

  let products: HashMap<Uuid, _> = store
    .find_products(&distinct)
    .await?
    .into_iter()
    .map(|product| (product.id, product))
    .collect();

  if let Some(missing) = requested.iter().find(|id| !products.contains_key(id)) {
    warn!(product_id = %missing, "Order references an unknown product.");
    return Err(AppError::validation(
      "Invalid product",
      Some(json!({ "productId": missing, "message": "Product not found" })),
    ));
  }

  info!(resolved = products.len(), "Products resolved.");
  ctx_data.write().products = products;
  Ok(PipelineControl::Continue)
}

#[instrument(name = "place_order::price_line_items", skip(ctx_data), err)]
async fn price_line_items_step(ctx_data: ContextData<PlaceOrderCtxData>) -> Result<PipelineControl, AppError> {
  let mut guard = ctx_data.write();
  let request = guard.request.as_ref().ok_or_else(|| internal("request not validated"))?;

  let mut lines = Vec::with_capacity(request.items.len());
  for item in &request.items {
    let product = guard
      .products
      .get(&item.product_id)
      .ok_or_else(|| internal("product not resolved"))?;
    lines.push(OrderLine::new(product.id, Some(product.name.clone()), item.quantity, product.price));
  }
  let total: Decimal = lines.iter().map(|line| line.line_total).sum();
  if total > MAX_ORDER_AMOUNT {
    warn!(%total, "Order total exceeds the storable amount.");
    return Err(AppError::validation(
      "Order total too large",
      Some(json!({ "total": format!("Must not exceed {}", MAX_ORDER_AMOUNT) })),
    ));
  }

  guard.lines = lines;
  guard.total = total;
  Ok(PipelineControl::Continue)
}

#[instrument(name = "place_order::persist_order", skip(ctx_data), err)]
async fn persist_order_step(ctx_data: ContextData<PlaceOrderCtxData>) -> Result<PipelineControl, AppError> {
  let (store, new_order) = {
    let guard = ctx_data.read();
    let request = guard.request.as_ref().ok_or_else(|| internal("request not validated"))?;
    let new_order = NewOrder {
      customer_name: request.customer_name.clone(),
      customer_phone: request.customer_phone.clone(),
      delivery_method: request.delivery_method,
      delivery_address: request.delivery_address.clone(),
      payment_method: request.payment_method,
      total: guard.total,
      lines: guard.lines.clone(),
    };
    (guard.store.clone(), new_order)
  };

  let placed = store.insert_order(&new_order).await?;
  info!(order_id = %placed.id, total = %new_order.total, items = new_order.lines.len(), "Order placed.");
  ctx_data.write().placed = Some(placed);
  Ok(PipelineControl::Continue)
}

pub fn build_place_order_pipeline() -> Pipeline<PlaceOrderCtxData, AppError> {
  let mut p = Pipeline::<PlaceOrderCtxData, AppError>::new(&[
    (STEP_VALIDATE, false, None),
    (STEP_RESOLVE, false, None),
    (STEP_PRICE, false, None),
    (STEP_PERSIST, false, None),
  ]);

  p.on_root(STEP_VALIDATE, |ctx_data: ContextData<PlaceOrderCtxData>| {
    Box::pin(validate_order_request_step(ctx_data))
  });
  p.on_root(STEP_RESOLVE, |ctx_data: ContextData<PlaceOrderCtxData>| {
    Box::pin(resolve_products_step(ctx_data))
  });
  p.on_root(STEP_PRICE, |ctx_data: ContextData<PlaceOrderCtxData>| {
    Box::pin(price_line_items_step(ctx_data))
  });
  p.on_root(STEP_PERSIST, |ctx_data: ContextData<PlaceOrderCtxData>| {
    Box::pin(persist_order_step(ctx_data))
  });

  p
}

pub fn register_place_order_pipeline(registry: &Registry<AppError>) {
  registry.register_pipeline(build_place_order_pipeline());
}
