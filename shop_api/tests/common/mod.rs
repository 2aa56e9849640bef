// shop_api/tests/common/mod.rs
#![allow(dead_code)]

use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::sync::Arc;
use wow_shoppers_lite::models::{Category, Product};
use wow_shoppers_lite::state::AppState;
use wow_shoppers_lite::store::MemoryStore;

/// Builds an initialized test service for `$state`.
#[allow(unused_macros)]
macro_rules! test_app {
  ($state:expr) => {
    actix_web::test::init_service(
      actix_web::App::new().configure(|cfg| wow_shoppers_lite::web::configure_app(cfg, $state)),
    )
    .await
  };
}

/// Sends `$req` to `$app` and returns the status with the JSON body.
#[allow(unused_macros)]
macro_rules! call_json {
  ($app:expr, $req:expr) => {{
    let resp = actix_web::test::call_service($app, $req).await;
    let status = resp.status();
    let body: serde_json::Value = actix_web::test::read_body_json(resp).await;
    (status, body)
  }};
}

pub struct ShopFixture {
  pub store: Arc<MemoryStore>,
  pub state: AppState,
  pub pantry: Category,
  pub snacks: Category,
  /// 10.00, 5 units.
  pub rice: Product,
  /// 18.00, 12 units.
  pub oil: Product,
  /// Flagged out of stock.
  pub chips: Product,
  /// Flagged in stock but no units left.
  pub zobo: Product,
}

pub fn shop_fixture() -> ShopFixture {
  let store = Arc::new(MemoryStore::new());
  let pantry = store.add_category("Pantry");
  let snacks = store.add_category("Snacks");
  let rice = store.add_product(pantry.id, "Basmati Rice 1kg", Decimal::new(1000, 2), true, 5);
  let oil = store.add_product(pantry.id, "Vegetable Oil 1L", Decimal::new(1800, 2), true, 12);
  let chips = store.add_product(snacks.id, "Plantain Chips", Decimal::new(750, 2), false, 40);
  let zobo = store.add_product(snacks.id, "Zobo Hibiscus 50cl", Decimal::new(400, 2), true, 0);
  let state = AppState::new(store.clone());

  ShopFixture {
    store,
    state,
    pantry,
    snacks,
    rice,
    oil,
    chips,
    zobo,
  }
}

pub fn pickup_order(items: Value) -> Value {
  json!({
    "customerName": "Tunde Bakare",
    "customerPhone": "08012345678",
    "deliveryMethod": "pickup",
    "items": items
  })
}
