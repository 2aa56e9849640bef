// shop_api/src/models/product.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
  pub id: Uuid,
  pub category_id: Uuid,
  pub name: String,
  pub description: Option<String>,
  pub price: Decimal,
  pub in_stock: bool,
  pub stock_qty: i32,
  pub image_url: Option<String>,
  pub created_at: DateTime<Utc>,
}

impl Product {
  /// In stock and with units left.
  pub fn is_purchasable(&self) -> bool {
    self.in_stock && self.stock_qty > 0
  }
}

/// A product row joined with the name of its category.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProductListing {
  #[serde(flatten)]
  #[sqlx(flatten)]
  pub product: Product,
  pub category_name: String,
}
