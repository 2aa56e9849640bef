// shop_api/src/store/seed.rs

//! Demo catalog loaded when `SEED_DB=true`.

use crate::errors::Result;
use crate::store::{MemoryStore, PgStore};
use rust_decimal::Decimal;
use tracing::info;

pub struct SeedProduct {
  pub name: &'static str,
  pub description: &'static str,
  /// In minor units (kobo/cents).
  pub price_minor: i64,
  pub in_stock: bool,
  pub stock_qty: i32,
}

impl SeedProduct {
  pub fn price(&self) -> Decimal {
    Decimal::new(self.price_minor, 2)
  }
}

const fn item(name: &'static str, description: &'static str, price_minor: i64, stock_qty: i32) -> SeedProduct {
  SeedProduct {
    name,
    description,
    price_minor,
    in_stock: stock_qty > 0,
    stock_qty,
  }
}

pub const CATALOG: &[(&str, &[SeedProduct])] = &[
  (
    "Beverages",
    &[
      item("Malt Drink 330ml", "Chilled non-alcoholic malt", 350, 48),
      item("Bottled Water 75cl", "Table water", 150, 120),
      item("Zobo Hibiscus 50cl", "Hibiscus drink with ginger", 400, 0),
    ],
  ),
  (
    "Pantry",
    &[
      item("Basmati Rice 1kg", "Long grain rice", 2500, 30),
      item("Vegetable Oil 1L", "Refined vegetable oil", 1800, 12),
      item("Jollof Seasoning", "Spice mix for party jollof", 600, 0),
    ],
  ),
  (
    "Snacks",
    &[
      item("Plantain Chips", "Lightly salted", 1000, 25),
      item("Chin Chin 200g", "Crunchy fried dough", 800, 15),
    ],
  ),
];

/// Inserts the demo catalog; existing categories and same-named products are left alone.
pub async fn seed_postgres(store: &PgStore) -> Result<()> {
  let mut tx = store.pool().begin().await?;
  for &(category_name, products) in CATALOG {
    sqlx::query("INSERT INTO categories (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
      .bind(category_name)
      .execute(&mut *tx)
      .await?;

    for product in products.iter() {
      sqlx::query(
        "INSERT INTO products (category_id, name, description, price, in_stock, stock_qty) \
         SELECT c.id, $2, $3, $4, $5, $6 FROM categories c \
         WHERE c.name = $1 AND NOT EXISTS (SELECT 1 FROM products WHERE name = $2)",
      )
      .bind(category_name)
      .bind(product.name)
      .bind(product.description)
      .bind(product.price())
      .bind(product.in_stock)
      .bind(product.stock_qty)
      .execute(&mut *tx)
      .await?;
    }
  }
  tx.commit().await?;
  info!(categories = CATALOG.len(), "Demo catalog seeded.");
  Ok(())
}

pub fn seed_memory(store: &MemoryStore) {
  for &(category_name, products) in CATALOG {
    let category = store.add_category(category_name);
    for product in products.iter() {
      store.add_product(category.id, product.name, product.price(), product.in_stock, product.stock_qty);
    }
  }
}
