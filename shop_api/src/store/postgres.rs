// shop_api/src/store/postgres.rs

use crate::catalog::query::{order_page_query, product_listing_query};
use crate::catalog::ProductFilter;
use crate::config::AppConfig;
use crate::errors::{AppError, Result};
use crate::models::{
  Category, Order, OrderLine, OrderStatus, OrderSummary, PlacedOrder, Product, ProductListing, StatusUpdate,
};
use crate::store::{NewOrder, ShopStore};
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::{FromRow, PgPool};
use std::str::FromStr;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

/// Tables the API cannot run without.
pub const REQUIRED_TABLES: [&str; 4] = ["categories", "products", "orders", "order_items"];

const PRODUCT_COLUMNS: &str = "id, category_id, name, description, price, in_stock, stock_qty, image_url, created_at";

#[derive(Debug, FromRow)]
struct OrderLineRow {
  product_id: Uuid,
  name: Option<String>,
  quantity: i32,
  unit_price: Decimal,
}

#[derive(Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  /// Opens a pool using the connection settings from `config`.
  pub async fn connect(config: &AppConfig) -> Result<Self> {
    let mut options = PgConnectOptions::from_str(&config.database_url)?;
    if config.use_ssl() {
      // Hosted poolers present certificates we do not pin.
      options = options.ssl_mode(PgSslMode::Require);
    }

    let pool = PgPoolOptions::new()
      .max_connections(config.database_max_connections)
      .connect_with(options)
      .await?;
    info!(max_connections = config.database_max_connections, ssl = config.use_ssl(), "Connected to the database.");
    Ok(Self::new(pool))
  }

  pub fn pool(&self) -> &PgPool {
    &self.pool
  }

  pub async fn run_migrations(&self) -> Result<()> {
    sqlx::migrate!("./migrations").run(&self.pool).await?;
    info!("Database migrations applied.");
    Ok(())
  }

  /// Names from [`REQUIRED_TABLES`] that are not present in the current schema.
  pub async fn missing_tables(&self) -> Result<Vec<String>> {
    let wanted: Vec<String> = REQUIRED_TABLES.iter().map(|t| t.to_string()).collect();
    let present: Vec<String> = sqlx::query_scalar(
      "SELECT table_name::text FROM information_schema.tables WHERE table_schema = current_schema() AND table_name = ANY($1)",
    )
    .bind(&wanted)
    .fetch_all(&self.pool)
    .await?;

    Ok(wanted.into_iter().filter(|table| !present.contains(table)).collect())
  }

  /// Logs a warning per missing table; never fails startup on its own.
  pub async fn warn_on_missing_schema(&self) {
    match self.missing_tables().await {
      Ok(missing) if missing.is_empty() => info!("Database schema check passed."),
      Ok(missing) => warn!(
        ?missing,
        "Database schema is incomplete; set RUN_MIGRATIONS=true or apply shop_api/migrations manually."
      ),
      Err(e) => warn!(error = %e, "Could not verify database schema."),
    }
  }
}

#[async_trait]
impl ShopStore for PgStore {
  #[instrument(name = "PgStore::list_categories", skip(self))]
  async fn list_categories(&self) -> Result<Vec<Category>> {
    let categories = sqlx::query_as("SELECT id, name, created_at FROM categories ORDER BY name ASC")
      .fetch_all(&self.pool)
      .await?;
    Ok(categories)
  }

  #[instrument(name = "PgStore::list_products", skip(self))]
  async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<ProductListing>> {
    let builder = product_listing_query(filter);
    let sql = builder.sql();
    let products = builder
      .apply_bindings(sqlx::query_as::<_, ProductListing>(&sql))
      .fetch_all(&self.pool)
      .await?;
    Ok(products)
  }

  #[instrument(name = "PgStore::find_products", skip(self, ids), fields(count = ids.len()))]
  async fn find_products(&self, ids: &[Uuid]) -> Result<Vec<Product>> {
    let sql = format!("SELECT {} FROM products WHERE id = ANY($1)", PRODUCT_COLUMNS);
    let products = sqlx::query_as::<_, Product>(&sql).bind(ids).fetch_all(&self.pool).await?;
    Ok(products)
  }

  #[instrument(name = "PgStore::insert_order", skip(self, order), fields(lines = order.lines.len()))]
  async fn insert_order(&self, order: &NewOrder) -> Result<PlacedOrder> {
    // Dropping the transaction without commit rolls back, so any `?` below leaves nothing behind.
    let mut tx = self.pool.begin().await?;

    let placed: PlacedOrder = sqlx::query_as(
      "INSERT INTO orders (customer_name, customer_phone, delivery_method, delivery_address, payment_method, status, total) \
       VALUES ($1, $2, $3, $4, $5, 'placed', $6) \
       RETURNING id, status, created_at",
    )
    .bind(&order.customer_name)
    .bind(&order.customer_phone)
    .bind(order.delivery_method)
    .bind(&order.delivery_address)
    .bind(order.payment_method)
    .bind(order.total)
    .fetch_one(&mut *tx)
    .await?;

    for (line_no, line) in order.lines.iter().enumerate() {
      let line_no = i32::try_from(line_no).map_err(|_| AppError::Internal("Too many order lines".to_string()))?;
      sqlx::query(
        "INSERT INTO order_items (order_id, product_id, line_no, quantity, unit_price) VALUES ($1, $2, $3, $4, $5)",
      )
      .bind(placed.id)
      .bind(line.product_id)
      .bind(line_no)
      .bind(line.quantity)
      .bind(line.unit_price)
      .execute(&mut *tx)
      .await
      .map_err(|e| {
        error!(order_id = %placed.id, line_no, error = %e, "Failed to insert order item; rolling back.");
        AppError::Sqlx(e)
      })?;
    }

    tx.commit().await?;
    info!(order_id = %placed.id, total = %order.total, "Order persisted.");
    Ok(placed)
  }

  async fn count_orders(&self) -> Result<i64> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM orders").fetch_one(&self.pool).await?;
    Ok(count)
  }

  #[instrument(name = "PgStore::list_orders", skip(self))]
  async fn list_orders(&self, limit: i64, offset: i64) -> Result<Vec<OrderSummary>> {
    let builder = order_page_query(limit, offset);
    let sql = builder.sql();
    let orders = builder
      .apply_bindings(sqlx::query_as::<_, OrderSummary>(&sql))
      .fetch_all(&self.pool)
      .await?;
    Ok(orders)
  }

  #[instrument(name = "PgStore::find_order", skip(self))]
  async fn find_order(&self, id: Uuid) -> Result<Option<Order>> {
    let order = sqlx::query_as(
      "SELECT id, customer_name, customer_phone, delivery_method, delivery_address, payment_method, status, total, \
       created_at, updated_at FROM orders WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;
    Ok(order)
  }

  #[instrument(name = "PgStore::order_lines", skip(self))]
  async fn order_lines(&self, order_id: Uuid) -> Result<Vec<OrderLine>> {
    let rows: Vec<OrderLineRow> = sqlx::query_as(
      "SELECT oi.product_id, p.name, oi.quantity, oi.unit_price \
       FROM order_items oi LEFT JOIN products p ON p.id = oi.product_id \
       WHERE oi.order_id = $1 ORDER BY oi.line_no ASC",
    )
    .bind(order_id)
    .fetch_all(&self.pool)
    .await?;

    Ok(
      rows
        .into_iter()
        .map(|row| OrderLine::new(row.product_id, row.name, row.quantity, row.unit_price))
        .collect(),
    )
  }

  #[instrument(name = "PgStore::update_order_status", skip(self))]
  async fn update_order_status(&self, id: Uuid, status: OrderStatus) -> Result<Option<StatusUpdate>> {
    let updated = sqlx::query_as(
      "UPDATE orders SET status = $1, updated_at = now() WHERE id = $2 RETURNING id, status, updated_at",
    )
    .bind(status)
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;
    Ok(updated)
  }
}
