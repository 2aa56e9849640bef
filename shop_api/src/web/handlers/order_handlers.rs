// shop_api/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::{json, Value};
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::services::order_service::{self, OrderListQuery, PageRequest};
use crate::state::AppState;

#[instrument(name = "handler::list_orders", skip(app_state, query_params))]
pub async fn list_orders_handler(
  app_state: web::Data<AppState>,
  query_params: web::Query<OrderListQuery>,
) -> Result<HttpResponse, AppError> {
  let page = PageRequest::from_query(&query_params);
  let order_page = order_service::list_orders(app_state.store.as_ref(), page).await?;
  info!(
    "Fetched {} of {} orders (page {}).",
    order_page.orders.len(),
    order_page.count,
    order_page.page
  );
  Ok(HttpResponse::Ok().json(order_page))
}

/// Body is taken as raw JSON so validation can report every field at once.
#[instrument(name = "handler::create_order", skip(app_state, req_payload))]
pub async fn create_order_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
  let receipt = order_service::place_order(&app_state, req_payload.into_inner()).await?;
  info!(order_id = %receipt.id, total = %receipt.total, "Order created.");
  Ok(HttpResponse::Created().json(json!({ "order": receipt })))
}

#[instrument(name = "handler::get_order", skip(app_state, path), fields(order_id = %path.as_ref()))]
pub async fn get_order_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let detail = order_service::get_order(app_state.store.as_ref(), &path).await?;
  Ok(HttpResponse::Ok().json(json!({ "order": detail })))
}

#[instrument(
  name = "handler::update_order_status",
  skip(app_state, path, req_payload),
  fields(order_id = %path.as_ref())
)]
pub async fn update_order_status_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
  req_payload: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
  let updated = order_service::update_order_status(app_state.store.as_ref(), &path, &req_payload).await?;
  Ok(HttpResponse::Ok().json(json!({ "order": updated })))
}
