// shop_api/src/services/order_service.rs

use crate::errors::{AppError, Result};
use crate::models::{OrderDetail, OrderReceipt, OrderStatus, OrderSummary, StatusUpdate};
use crate::pipelines::contexts::PlaceOrderCtxData;
use crate::state::AppState;
use crate::store::ShopStore;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, info, instrument};
use uuid::Uuid;
use wow_workflow::{ContextData, PipelineResult};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 20;

/// Raw `GET /api/orders` query string.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct OrderListQuery {
  pub page: Option<String>,
  pub limit: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
  pub page: i64,
  pub limit: i64,
}

impl PageRequest {
  /// Missing, unparseable or non-positive values fall back to the defaults.
  pub fn from_query(query: &OrderListQuery) -> Self {
    let positive = |raw: Option<&str>, default: i64| {
      raw
        .and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
    };
    Self {
      page: positive(query.page.as_deref(), DEFAULT_PAGE),
      limit: positive(query.limit.as_deref(), DEFAULT_LIMIT),
    }
  }

  pub fn offset(&self) -> i64 {
    (self.page - 1).saturating_mul(self.limit)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPage {
  pub orders: Vec<OrderSummary>,
  pub count: i64,
  pub page: i64,
  pub limit: i64,
  pub total_pages: i64,
}

fn total_pages(count: i64, limit: i64) -> i64 {
  if count <= 0 {
    0
  } else {
    count / limit + i64::from(count % limit != 0)
  }
}

/// Order ids that are not UUIDs cannot exist, so they read as not found.
fn parse_order_id(raw: &str) -> Result<Uuid> {
  Uuid::parse_str(raw.trim()).map_err(|_| AppError::NotFound("Order".to_string()))
}

/// Runs the place-order workflow for a raw request body.
///
/// Nothing is written unless every step succeeds.
#[instrument(name = "order_service::place_order", skip(state, body))]
pub async fn place_order(state: &AppState, body: Value) -> Result<OrderReceipt> {
  let ctx_data = ContextData::new(PlaceOrderCtxData::new(state.store.clone(), body));

  match state.workflows.run(ctx_data.clone()).await? {
    PipelineResult::Completed => {}
    PipelineResult::Stopped => {
      error!("Place order pipeline stopped before persisting.");
      return Err(AppError::Internal("Order workflow stopped early".to_string()));
    }
  }

  let guard = ctx_data.read();
  let placed = guard
    .placed
    .clone()
    .ok_or_else(|| AppError::Internal("Order workflow finished without an order".to_string()))?;

  Ok(OrderReceipt {
    id: placed.id,
    status: placed.status,
    total: guard.total,
    items: guard.lines.clone(),
    created_at: placed.created_at,
  })
}

#[instrument(name = "order_service::list_orders", skip(store))]
pub async fn list_orders(store: &dyn ShopStore, page: PageRequest) -> Result<OrderPage> {
  let count = store.count_orders().await?;
  let orders = store.list_orders(page.limit, page.offset()).await?;
  Ok(OrderPage {
    orders,
    count,
    page: page.page,
    limit: page.limit,
    total_pages: total_pages(count, page.limit),
  })
}

#[instrument(name = "order_service::get_order", skip(store))]
pub async fn get_order(store: &dyn ShopStore, raw_id: &str) -> Result<OrderDetail> {
  let id = parse_order_id(raw_id)?;
  let order = store
    .find_order(id)
    .await?
    .ok_or_else(|| AppError::NotFound("Order".to_string()))?;
  let items = store.order_lines(id).await?;
  Ok(OrderDetail { order, items })
}

/// Overwrites an order's status with the `status` label in `body`.
///
/// # Arguments
/// * `raw_id`: Order id from the path.
/// * `body`: Request body; only its `status` field is read.
///
/// # Returns
/// The new status and `updated_at`. Any of the five states may follow any
/// other. An unknown label is rejected before the store is touched.
#[instrument(name = "order_service::update_order_status", skip(store, body))]
pub async fn update_order_status(store: &dyn ShopStore, raw_id: &str, body: &Value) -> Result<StatusUpdate> {
  let status = body
    .get("status")
    .and_then(Value::as_str)
    .and_then(|s| s.parse::<OrderStatus>().ok())
    .ok_or_else(|| {
      AppError::validation(
        "Invalid status",
        Some(json!({ "status": format!("Must be one of: {}", OrderStatus::allowed_list()) })),
      )
    })?;

  let id = parse_order_id(raw_id)?;
  let updated = store
    .update_order_status(id, status)
    .await?
    .ok_or_else(|| AppError::NotFound("Order".to_string()))?;
  info!(order_id = %updated.id, status = %updated.status, "Order status updated.");
  Ok(updated)
}
