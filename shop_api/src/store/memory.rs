// shop_api/src/store/memory.rs

use crate::catalog::ProductFilter;
use crate::errors::{AppError, Result};
use crate::models::{
  Category, Order, OrderItem, OrderLine, OrderStatus, OrderSummary, PlacedOrder, Product, ProductListing,
  StatusUpdate, MAX_ORDER_AMOUNT,
};
use crate::store::{NewOrder, ShopStore};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;

#[derive(Default)]
struct Tables {
  categories: Vec<Category>,
  products: Vec<Product>,
  orders: Vec<Order>,
  order_items: Vec<OrderItem>,
  last_timestamp: Option<DateTime<Utc>>,
}

impl Tables {
  /// Strictly increasing clock so "newest first" is unambiguous.
  fn tick(&mut self) -> DateTime<Utc> {
    let now = Utc::now();
    let next = match self.last_timestamp {
      Some(last) if now <= last => last + Duration::microseconds(1),
      _ => now,
    };
    self.last_timestamp = Some(next);
    next
  }
}

/// In-process [`ShopStore`] with the same ordering and filtering rules as Postgres.
#[derive(Default)]
pub struct MemoryStore {
  tables: RwLock<Tables>,
  fail_item_writes: AtomicBool,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add_category(&self, name: &str) -> Category {
    let mut tables = self.tables.write();
    let category = Category {
      id: Uuid::new_v4(),
      name: name.to_string(),
      created_at: tables.tick(),
    };
    tables.categories.push(category.clone());
    category
  }

  /// Adds a product; later additions count as newer.
  pub fn add_product(&self, category_id: Uuid, name: &str, price: Decimal, in_stock: bool, stock_qty: i32) -> Product {
    let mut tables = self.tables.write();
    let product = Product {
      id: Uuid::new_v4(),
      category_id,
      name: name.to_string(),
      description: None,
      price,
      in_stock,
      stock_qty,
      image_url: None,
      created_at: tables.tick(),
    };
    tables.products.push(product.clone());
    product
  }

  pub fn set_product_price(&self, product_id: Uuid, price: Decimal) -> bool {
    let mut tables = self.tables.write();
    match tables.products.iter_mut().find(|p| p.id == product_id) {
      Some(product) => {
        product.price = price;
        true
      }
      None => false,
    }
  }

  pub fn remove_product(&self, product_id: Uuid) -> bool {
    let mut tables = self.tables.write();
    let before = tables.products.len();
    tables.products.retain(|p| p.id != product_id);
    tables.products.len() != before
  }

  /// Makes every following order write fail while its lines are written.
  pub fn fail_item_writes(&self, fail: bool) {
    self.fail_item_writes.store(fail, Ordering::SeqCst);
  }

  pub fn order_row_count(&self) -> usize {
    self.tables.read().orders.len()
  }

  pub fn order_item_row_count(&self) -> usize {
    self.tables.read().order_items.len()
  }
}

#[async_trait]
impl ShopStore for MemoryStore {
  async fn list_categories(&self) -> Result<Vec<Category>> {
    let mut categories = self.tables.read().categories.clone();
    categories.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(categories)
  }

  async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<ProductListing>> {
    let tables = self.tables.read();
    let mut listings: Vec<ProductListing> = tables
      .products
      .iter()
      .filter(|p| filter.matches(p))
      .filter_map(|p| {
        // Inner join: a product without its category is not listed.
        let category = tables.categories.iter().find(|c| c.id == p.category_id)?;
        Some(ProductListing {
          product: p.clone(),
          category_name: category.name.clone(),
        })
      })
      .collect();
    listings.sort_by(|a, b| {
      b.product
        .created_at
        .cmp(&a.product.created_at)
        .then_with(|| a.product.name.cmp(&b.product.name))
    });
    Ok(listings)
  }

  async fn find_products(&self, ids: &[Uuid]) -> Result<Vec<Product>> {
    let tables = self.tables.read();
    Ok(tables.products.iter().filter(|p| ids.contains(&p.id)).cloned().collect())
  }

  async fn insert_order(&self, order: &NewOrder) -> Result<PlacedOrder> {
    if order.total > MAX_ORDER_AMOUNT || order.lines.iter().any(|line| line.unit_price > MAX_ORDER_AMOUNT) {
      return Err(AppError::Internal("numeric field overflow".to_string()));
    }

    let mut tables = self.tables.write();

    // Stage everything first; tables are only touched once all rows are known good.
    let now = tables.tick();
    let order_id = Uuid::new_v4();
    let mut items = Vec::with_capacity(order.lines.len());
    for (line_no, line) in order.lines.iter().enumerate() {
      if self.fail_item_writes.load(Ordering::SeqCst) {
        return Err(AppError::Internal(format!("simulated failure writing line {}", line_no)));
      }
      items.push(OrderItem {
        id: Uuid::new_v4(),
        order_id,
        product_id: line.product_id,
        line_no: i32::try_from(line_no).map_err(|_| AppError::Internal("Too many order lines".to_string()))?,
        quantity: line.quantity,
        unit_price: line.unit_price,
        created_at: now,
      });
    }

    tables.orders.push(Order {
      id: order_id,
      customer_name: order.customer_name.clone(),
      customer_phone: order.customer_phone.clone(),
      delivery_method: order.delivery_method,
      delivery_address: order.delivery_address.clone(),
      payment_method: order.payment_method,
      status: OrderStatus::Placed,
      total: order.total,
      created_at: now,
      updated_at: now,
    });
    tables.order_items.extend(items);

    Ok(PlacedOrder {
      id: order_id,
      status: OrderStatus::Placed,
      created_at: now,
    })
  }

  async fn count_orders(&self) -> Result<i64> {
    Ok(self.tables.read().orders.len() as i64)
  }

  async fn list_orders(&self, limit: i64, offset: i64) -> Result<Vec<OrderSummary>> {
    let tables = self.tables.read();
    let mut orders: Vec<&Order> = tables.orders.iter().collect();
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(
      orders
        .into_iter()
        .skip(usize::try_from(offset).unwrap_or(usize::MAX))
        .take(usize::try_from(limit).unwrap_or(0))
        .map(OrderSummary::from)
        .collect(),
    )
  }

  async fn find_order(&self, id: Uuid) -> Result<Option<Order>> {
    Ok(self.tables.read().orders.iter().find(|o| o.id == id).cloned())
  }

  async fn order_lines(&self, order_id: Uuid) -> Result<Vec<OrderLine>> {
    let tables = self.tables.read();
    let mut items: Vec<&OrderItem> = tables.order_items.iter().filter(|i| i.order_id == order_id).collect();
    items.sort_by_key(|i| i.line_no);
    Ok(
      items
        .into_iter()
        .map(|item| {
          let name = tables
            .products
            .iter()
            .find(|p| p.id == item.product_id)
            .map(|p| p.name.clone());
          OrderLine::new(item.product_id, name, item.quantity, item.unit_price)
        })
        .collect(),
    )
  }

  async fn update_order_status(&self, id: Uuid, status: OrderStatus) -> Result<Option<StatusUpdate>> {
    let mut tables = self.tables.write();
    let now = tables.tick();
    Ok(tables.orders.iter_mut().find(|o| o.id == id).map(|order| {
      order.status = status;
      order.updated_at = now;
      StatusUpdate {
        id: order.id,
        status: order.status,
        updated_at: order.updated_at,
      }
    }))
  }
}
