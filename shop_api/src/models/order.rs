// shop_api/src/models/order.rs

use crate::models::OrderLine;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type as SqlxType};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Error returned when a label is not one of an enum's stored values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLabel(pub String);

impl fmt::Display for UnknownLabel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "unknown label '{}'", self.0)
  }
}

impl std::error::Error for UnknownLabel {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, SqlxType)]
#[sqlx(type_name = "order_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
  Placed,
  Accepted,
  Packed,
  Dispatched,
  Delivered,
}

impl OrderStatus {
  /// Lifecycle order.
  pub const ALL: [OrderStatus; 5] = [
    OrderStatus::Placed,
    OrderStatus::Accepted,
    OrderStatus::Packed,
    OrderStatus::Dispatched,
    OrderStatus::Delivered,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      OrderStatus::Placed => "placed",
      OrderStatus::Accepted => "accepted",
      OrderStatus::Packed => "packed",
      OrderStatus::Dispatched => "dispatched",
      OrderStatus::Delivered => "delivered",
    }
  }

  fn rank(&self) -> usize {
    Self::ALL.iter().position(|s| s == self).unwrap_or(0)
  }

  /// Strict lifecycle check: only the immediate next state is allowed.
  ///
  /// Status updates through the API are any-to-any; this is not consulted there.
  pub fn can_advance_to(&self, next: OrderStatus) -> bool {
    next.rank() == self.rank() + 1
  }

  /// "placed, accepted, packed, dispatched, delivered"
  pub fn allowed_list() -> String {
    Self::ALL.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", ")
  }
}

impl FromStr for OrderStatus {
  type Err = UnknownLabel;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .into_iter()
      .find(|status| status.as_str() == s)
      .ok_or_else(|| UnknownLabel(s.to_string()))
  }
}

impl fmt::Display for OrderStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, SqlxType)]
#[sqlx(type_name = "delivery_method", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMethod {
  Delivery,
  Pickup,
}

impl FromStr for DeliveryMethod {
  type Err = UnknownLabel;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "delivery" => Ok(DeliveryMethod::Delivery),
      "pickup" => Ok(DeliveryMethod::Pickup),
      other => Err(UnknownLabel(other.to_string())),
    }
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, SqlxType)]
#[sqlx(type_name = "payment_method", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
  #[default]
  CashOnDelivery,
  /// Recorded label only; no payment is taken.
  Mock,
}

impl FromStr for PaymentMethod {
  type Err = UnknownLabel;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "cash_on_delivery" => Ok(PaymentMethod::CashOnDelivery),
      "mock" => Ok(PaymentMethod::Mock),
      other => Err(UnknownLabel(other.to_string())),
    }
  }
}

/// Largest amount the `NUMERIC(10, 2)` money columns hold: 99,999,999.99.
pub const MAX_ORDER_AMOUNT: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
  #[serde(rename = "orderId")]
  pub id: Uuid,
  pub customer_name: String,
  pub customer_phone: String,
  pub delivery_method: DeliveryMethod,
  pub delivery_address: Option<String>,
  pub payment_method: PaymentMethod,
  pub status: OrderStatus,
  pub total: Decimal,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Row shape of the order listing.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
  #[serde(rename = "orderId")]
  pub id: Uuid,
  pub customer_name: String,
  pub status: OrderStatus,
  pub total: Decimal,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl From<&Order> for OrderSummary {
  fn from(order: &Order) -> Self {
    Self {
      id: order.id,
      customer_name: order.customer_name.clone(),
      status: order.status,
      total: order.total,
      created_at: order.created_at,
      updated_at: order.updated_at,
    }
  }
}

/// What the store hands back after persisting a new order.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct PlacedOrder {
  pub id: Uuid,
  pub status: OrderStatus,
  pub created_at: DateTime<Utc>,
}

/// Response body of a successfully placed order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
  #[serde(rename = "orderId")]
  pub id: Uuid,
  pub status: OrderStatus,
  pub total: Decimal,
  pub items: Vec<OrderLine>,
  pub created_at: DateTime<Utc>,
}

/// Order plus its lines, as returned by the detail endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderDetail {
  #[serde(flatten)]
  pub order: Order,
  pub items: Vec<OrderLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
  #[serde(rename = "orderId")]
  pub id: Uuid,
  pub status: OrderStatus,
  pub updated_at: DateTime<Utc>,
}
