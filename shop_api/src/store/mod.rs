// shop_api/src/store/mod.rs

//! Persistence boundary.
//!
//! Handlers and workflows only see [`ShopStore`]. [`PgStore`] talks to
//! PostgreSQL; [`MemoryStore`] keeps everything in process with the same
//! ordering and filtering rules and is what the test suites run against.

pub mod memory;
pub mod postgres;
pub mod seed;

use crate::catalog::ProductFilter;
use crate::errors::Result;
use crate::models::{
  Category, DeliveryMethod, Order, OrderLine, OrderStatus, OrderSummary, PaymentMethod, PlacedOrder, Product,
  ProductListing, StatusUpdate,
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// A fully priced order ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
  pub customer_name: String,
  pub customer_phone: String,
  pub delivery_method: DeliveryMethod,
  pub delivery_address: Option<String>,
  pub payment_method: PaymentMethod,
  pub total: Decimal,
  /// Written in this order; position becomes `line_no`.
  pub lines: Vec<OrderLine>,
}

#[async_trait]
pub trait ShopStore: Send + Sync {
  /// All categories by name.
  async fn list_categories(&self) -> Result<Vec<Category>>;

  /// Products matching every filter, newest first then by name.
  async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<ProductListing>>;

  /// Looks up the given ids in one round trip. Unknown ids are simply absent.
  async fn find_products(&self, ids: &[Uuid]) -> Result<Vec<Product>>;

  /// Writes the order and all its lines atomically with status `placed`.
  async fn insert_order(&self, order: &NewOrder) -> Result<PlacedOrder>;

  async fn count_orders(&self) -> Result<i64>;

  /// One page of orders, newest first.
  async fn list_orders(&self, limit: i64, offset: i64) -> Result<Vec<OrderSummary>>;

  async fn find_order(&self, id: Uuid) -> Result<Option<Order>>;

  /// Lines of an order in insertion order.
  async fn order_lines(&self, order_id: Uuid) -> Result<Vec<OrderLine>>;

  /// Overwrites the status and bumps `updated_at`. `None` if the order does not exist.
  async fn update_order_status(&self, id: Uuid, status: OrderStatus) -> Result<Option<StatusUpdate>>;
}
