// shop_api/src/models/order_item.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

/// A persisted line item. `line_no` is the 0-based position in the request.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
  pub id: Uuid,
  pub order_id: Uuid,
  pub product_id: Uuid,
  pub line_no: i32,
  pub quantity: i32,
  pub unit_price: Decimal,
  pub created_at: DateTime<Utc>,
}

/// A line as shown to clients. `line_total` is always derived, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
  pub product_id: Uuid,
  /// Absent when the product no longer exists.
  pub name: Option<String>,
  pub quantity: i32,
  pub unit_price: Decimal,
  pub line_total: Decimal,
}

impl OrderLine {
  pub fn new(product_id: Uuid, name: Option<String>, quantity: i32, unit_price: Decimal) -> Self {
    Self {
      product_id,
      name,
      quantity,
      unit_price,
      line_total: unit_price * Decimal::from(quantity),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn line_total_keeps_two_decimal_places() {
    let line = OrderLine::new(Uuid::new_v4(), Some("Plantain Chips".to_string()), 2, Decimal::new(1000, 2));
    assert_eq!(line.line_total, Decimal::new(2000, 2));
    assert_eq!(serde_json::to_value(&line).unwrap()["lineTotal"], "20.00");
  }
}
