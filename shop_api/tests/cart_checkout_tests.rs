// shop_api/tests/cart_checkout_tests.rs

#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use common::shop_fixture;
use rust_decimal::Decimal;
use serde_json::json;
use std::str::FromStr;
use wow_shoppers_lite::cart::{CartProduct, CartStore, FileCartStorage, MemoryCartStorage};

#[actix_web::test]
async fn cart_lines_become_an_order_with_the_same_total() {
  let fixture = shop_fixture();
  let app = test_app!(fixture.state.clone());

  let cart = CartStore::open(MemoryCartStorage::new()).unwrap();
  let mut events = cart.subscribe();
  cart.add_to_cart(&CartProduct::from(&fixture.rice), 1).unwrap();
  cart.add_to_cart(&CartProduct::from(&fixture.oil), 2).unwrap();
  cart.add_to_cart(&CartProduct::from(&fixture.rice), 2).unwrap();
  assert_eq!(cart.item_count(), 5);
  assert_eq!(cart.total(), Decimal::new(6600, 2));

  let body = json!({
    "customerName": "Amaka Nwosu",
    "customerPhone": "07011223344",
    "deliveryMethod": "delivery",
    "deliveryAddress": "22 Awolowo Road, Ikoyi",
    "items": cart.order_lines()
  });
  let (status, created) = call_json!(&app, TestRequest::post().uri("/api/orders").set_json(body).to_request());
  assert_eq!(status, StatusCode::CREATED);

  let total = Decimal::from_str(created["order"]["total"].as_str().unwrap()).unwrap();
  assert_eq!(total, cart.total());
  assert_eq!(created["order"]["items"].as_array().unwrap().len(), 2);

  cart.complete_checkout().unwrap();
  assert!(cart.is_empty());

  let mut last = None;
  while let Ok(event) = events.try_recv() {
    last = Some(event);
  }
  assert_eq!(last.map(|e| e.item_count), Some(0));
}

#[actix_web::test]
async fn cart_built_from_listings_persists_to_disk() {
  let fixture = shop_fixture();
  let app = test_app!(fixture.state.clone());
  let (_, listing) = call_json!(&app, TestRequest::get().uri("/api/products?inStock=true").to_request());

  let dir = tempfile::tempdir().unwrap();
  let cart = CartStore::open(FileCartStorage::open(dir.path()).unwrap()).unwrap();
  let listings = wow_shoppers_lite::services::catalog_service::list_products(
    fixture.store.as_ref(),
    &wow_shoppers_lite::catalog::ProductListQuery {
      in_stock: Some("true".to_string()),
      ..Default::default()
    },
  )
  .await
  .unwrap();
  assert_eq!(listings.len(), listing["count"].as_u64().unwrap() as usize);

  for product in &listings {
    cart.add_to_cart(&CartProduct::from(product), 1).unwrap();
  }
  cart.update_quantity(fixture.oil.id, 0).unwrap();

  let reopened = CartStore::open(FileCartStorage::open(dir.path()).unwrap()).unwrap();
  assert_eq!(reopened.entries().len(), 1);
  assert_eq!(reopened.entries()[0].product_id, fixture.rice.id);
  assert_eq!(reopened.total(), Decimal::new(1000, 2));
}
