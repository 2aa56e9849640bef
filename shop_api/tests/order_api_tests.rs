// shop_api/tests/order_api_tests.rs

#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use common::{pickup_order, shop_fixture};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::str::FromStr;
use uuid::Uuid;
use wow_shoppers_lite::store::ShopStore;

fn decimal(value: &Value) -> Decimal {
  Decimal::from_str(value.as_str().unwrap()).unwrap()
}

#[actix_web::test]
async fn order_round_trip_keeps_exact_totals() {
  let fixture = shop_fixture();
  let app = test_app!(fixture.state.clone());

  let body = pickup_order(json!([{ "productId": fixture.rice.id, "quantity": 2 }]));
  let (status, created) = call_json!(&app, TestRequest::post().uri("/api/orders").set_json(body).to_request());
  assert_eq!(status, StatusCode::CREATED);

  let order = &created["order"];
  assert_eq!(order["status"], "placed");
  assert_eq!(order["total"], "20.00");
  assert_eq!(order["items"].as_array().unwrap().len(), 1);
  assert_eq!(order["items"][0]["unitPrice"], "10.00");
  assert_eq!(order["items"][0]["lineTotal"], "20.00");
  assert_eq!(order["items"][0]["name"], "Basmati Rice 1kg");
  assert!(order["createdAt"].is_string());

  let order_id = order["orderId"].as_str().unwrap().to_string();
  let (status, detail) = call_json!(
    &app,
    TestRequest::get().uri(&format!("/api/orders/{}", order_id)).to_request()
  );
  assert_eq!(status, StatusCode::OK);
  let detail = &detail["order"];
  assert_eq!(detail["orderId"], order_id);
  assert_eq!(detail["customerName"], "Tunde Bakare");
  assert_eq!(detail["customerPhone"], "08012345678");
  assert_eq!(detail["deliveryMethod"], "pickup");
  assert!(detail["deliveryAddress"].is_null());
  assert_eq!(detail["paymentMethod"], "cash_on_delivery");
  assert_eq!(detail["total"], "20.00");
  assert_eq!(detail["items"].as_array().unwrap().len(), 1);
  assert_eq!(detail["items"][0]["lineTotal"], "20.00");
}

#[actix_web::test]
async fn persisted_total_is_sum_of_lines() {
  let fixture = shop_fixture();
  let app = test_app!(fixture.state.clone());

  let mut body = pickup_order(json!([
    { "productId": fixture.oil.id, "quantity": 3 },
    { "productId": fixture.rice.id, "quantity": 1 },
    { "productId": fixture.chips.id, "quantity": 2 },
    { "productId": fixture.oil.id, "quantity": 1 }
  ]));
  body["deliveryMethod"] = json!("delivery");
  body["deliveryAddress"] = json!("  4 Allen Avenue, Ikeja ");
  body["paymentMethod"] = json!("mock");

  let (status, created) = call_json!(&app, TestRequest::post().uri("/api/orders").set_json(body).to_request());
  assert_eq!(status, StatusCode::CREATED);

  let order_id = Uuid::parse_str(created["order"]["orderId"].as_str().unwrap()).unwrap();
  let lines = fixture.store.order_lines(order_id).await.unwrap();
  assert_eq!(lines.len(), 4);
  let sum: Decimal = lines.iter().map(|l| l.unit_price * Decimal::from(l.quantity)).sum();
  assert_eq!(sum, Decimal::new(9700, 2));
  assert_eq!(decimal(&created["order"]["total"]), sum);

  let stored = fixture.store.find_order(order_id).await.unwrap().unwrap();
  assert_eq!(stored.total, sum);
  assert_eq!(stored.delivery_address.as_deref(), Some("4 Allen Avenue, Ikeja"));
  assert_eq!(fixture.store.order_item_row_count(), 4);
}

#[actix_web::test]
async fn unknown_product_writes_nothing() {
  let fixture = shop_fixture();
  let app = test_app!(fixture.state.clone());
  let ghost = Uuid::new_v4();

  let body = pickup_order(json!([
    { "productId": fixture.rice.id, "quantity": 1 },
    { "productId": ghost, "quantity": 1 }
  ]));
  let (status, error) = call_json!(&app, TestRequest::post().uri("/api/orders").set_json(body).to_request());

  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(error["error"], "VALIDATION_ERROR");
  assert_eq!(error["message"], "Invalid product");
  assert_eq!(error["details"], json!({ "productId": ghost, "message": "Product not found" }));
  assert_eq!(fixture.store.order_row_count(), 0);
  assert_eq!(fixture.store.order_item_row_count(), 0);
}

#[actix_web::test]
async fn oversized_total_is_rejected_before_writing() {
  let fixture = shop_fixture();
  let app = test_app!(fixture.state.clone());

  let body = pickup_order(json!([{ "productId": fixture.rice.id, "quantity": 2_000_000_000 }]));
  let (status, error) = call_json!(&app, TestRequest::post().uri("/api/orders").set_json(body).to_request());

  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(error["error"], "VALIDATION_ERROR");
  assert_eq!(error["message"], "Order total too large");
  assert_eq!(error["details"], json!({ "total": "Must not exceed 99999999.99" }));
  assert_eq!(fixture.store.order_row_count(), 0);
  assert_eq!(fixture.store.order_item_row_count(), 0);
}

#[actix_web::test]
async fn invalid_body_reports_field_errors() {
  let fixture = shop_fixture();
  let app = test_app!(fixture.state.clone());

  let body = json!({
    "customerName": "J",
    "customerPhone": "123",
    "deliveryMethod": "delivery",
    "items": [{ "productId": fixture.rice.id, "quantity": 0 }]
  });
  let (status, error) = call_json!(&app, TestRequest::post().uri("/api/orders").set_json(body).to_request());

  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(error["error"], "VALIDATION_ERROR");
  let details = &error["details"];
  assert_eq!(details["customerName"], "Must be at least 2 characters");
  assert_eq!(details["customerPhone"], "Must be at least 7 characters");
  assert_eq!(
    details["deliveryAddress"],
    "Required when delivery method is \"delivery\" (min 5 characters)"
  );
  assert_eq!(
    details["items"],
    json!([{ "index": 0, "errors": { "quantity": "Must be an integer >= 1" } }])
  );
  assert_eq!(fixture.store.order_row_count(), 0);
}

#[actix_web::test]
async fn malformed_json_is_a_validation_error() {
  let fixture = shop_fixture();
  let app = test_app!(fixture.state.clone());

  let req = TestRequest::post()
    .uri("/api/orders")
    .insert_header(("content-type", "application/json"))
    .set_payload("{\"customerName\": ")
    .to_request();
  let (status, error) = call_json!(&app, req);

  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(error, json!({ "error": "VALIDATION_ERROR", "message": "Malformed JSON body" }));
}

#[actix_web::test]
async fn detail_keeps_the_price_snapshot() {
  let fixture = shop_fixture();
  let app = test_app!(fixture.state.clone());

  let body = pickup_order(json!([{ "productId": fixture.oil.id, "quantity": 2 }]));
  let (_, created) = call_json!(&app, TestRequest::post().uri("/api/orders").set_json(body).to_request());
  let order_id = created["order"]["orderId"].as_str().unwrap().to_string();

  fixture.store.set_product_price(fixture.oil.id, Decimal::new(2500, 2));

  let (_, detail) = call_json!(
    &app,
    TestRequest::get().uri(&format!("/api/orders/{}", order_id)).to_request()
  );
  assert_eq!(detail["order"]["items"][0]["unitPrice"], "18.00");
  assert_eq!(detail["order"]["items"][0]["lineTotal"], "36.00");
  assert_eq!(detail["order"]["total"], "36.00");
}

#[actix_web::test]
async fn missing_or_malformed_order_ids_are_not_found() {
  let fixture = shop_fixture();
  let app = test_app!(fixture.state.clone());

  for uri in [format!("/api/orders/{}", Uuid::new_v4()), "/api/orders/12345".to_string()] {
    let (status, error) = call_json!(&app, TestRequest::get().uri(&uri).to_request());
    assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
    assert_eq!(error, json!({ "error": "NOT_FOUND", "message": "Order not found" }));
  }
}

#[actix_web::test]
async fn listing_paginates_newest_first() {
  let fixture = shop_fixture();
  let app = test_app!(fixture.state.clone());

  let mut created_ids = Vec::new();
  for quantity in 1..=5 {
    let body = pickup_order(json!([{ "productId": fixture.rice.id, "quantity": quantity }]));
    let (status, created) = call_json!(&app, TestRequest::post().uri("/api/orders").set_json(body).to_request());
    assert_eq!(status, StatusCode::CREATED);
    created_ids.push(created["order"]["orderId"].as_str().unwrap().to_string());
  }
  created_ids.reverse();

  let mut seen = Vec::new();
  for page in 1..=3 {
    let (status, listing) = call_json!(
      &app,
      TestRequest::get().uri(&format!("/api/orders?page={}&limit=2", page)).to_request()
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing["count"], 5);
    assert_eq!(listing["page"], page);
    assert_eq!(listing["limit"], 2);
    assert_eq!(listing["totalPages"], 3);
    let orders = listing["orders"].as_array().unwrap();
    assert!(orders.len() <= 2);
    for order in orders {
      assert!(order["customerName"].is_string());
      assert!(order["updatedAt"].is_string());
      seen.push(order["orderId"].as_str().unwrap().to_string());
    }
  }
  assert_eq!(seen, created_ids);

  let (_, beyond) = call_json!(&app, TestRequest::get().uri("/api/orders?page=4&limit=2").to_request());
  assert_eq!(beyond["orders"], json!([]));
  assert_eq!(beyond["count"], 5);
}

#[actix_web::test]
async fn listing_falls_back_to_default_paging() {
  let fixture = shop_fixture();
  let app = test_app!(fixture.state.clone());

  let (status, listing) = call_json!(
    &app,
    TestRequest::get().uri("/api/orders?page=-1&limit=abc").to_request()
  );
  assert_eq!(status, StatusCode::OK);
  assert_eq!(listing["page"], 1);
  assert_eq!(listing["limit"], 20);
  assert_eq!(listing["count"], 0);
  assert_eq!(listing["totalPages"], 0);
}

#[actix_web::test]
async fn status_updates_accept_any_known_state() {
  let fixture = shop_fixture();
  let app = test_app!(fixture.state.clone());

  let body = pickup_order(json!([{ "productId": fixture.rice.id, "quantity": 1 }]));
  let (_, created) = call_json!(&app, TestRequest::post().uri("/api/orders").set_json(body).to_request());
  let order_id = created["order"]["orderId"].as_str().unwrap().to_string();
  let status_uri = format!("/api/orders/{}/status", order_id);

  // Jumping straight to delivered and back is allowed.
  for next in ["delivered", "accepted"] {
    let (status, updated) = call_json!(
      &app,
      TestRequest::patch().uri(&status_uri).set_json(json!({ "status": next })).to_request()
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["order"]["orderId"], order_id);
    assert_eq!(updated["order"]["status"], next);
    assert!(updated["order"]["updatedAt"].is_string());
  }
}

#[actix_web::test]
async fn unknown_status_is_rejected_without_change() {
  let fixture = shop_fixture();
  let app = test_app!(fixture.state.clone());

  let body = pickup_order(json!([{ "productId": fixture.rice.id, "quantity": 1 }]));
  let (_, created) = call_json!(&app, TestRequest::post().uri("/api/orders").set_json(body).to_request());
  let order_id = created["order"]["orderId"].as_str().unwrap().to_string();

  let (status, error) = call_json!(
    &app,
    TestRequest::patch()
      .uri(&format!("/api/orders/{}/status", order_id))
      .set_json(json!({ "status": "shipped" }))
      .to_request()
  );
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(error["error"], "VALIDATION_ERROR");
  assert_eq!(
    error["details"]["status"],
    "Must be one of: placed, accepted, packed, dispatched, delivered"
  );

  let (_, detail) = call_json!(
    &app,
    TestRequest::get().uri(&format!("/api/orders/{}", order_id)).to_request()
  );
  assert_eq!(detail["order"]["status"], "placed");
  assert_eq!(detail["order"]["updatedAt"], detail["order"]["createdAt"]);
}

#[actix_web::test]
async fn status_update_for_missing_order_is_not_found() {
  let fixture = shop_fixture();
  let app = test_app!(fixture.state.clone());

  let (status, error) = call_json!(
    &app,
    TestRequest::patch()
      .uri(&format!("/api/orders/{}/status", Uuid::new_v4()))
      .set_json(json!({ "status": "packed" }))
      .to_request()
  );
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(error["message"], "Order not found");
}

#[actix_web::test]
async fn store_failure_is_an_opaque_internal_error() {
  let fixture = shop_fixture();
  fixture.store.fail_item_writes(true);
  let app = test_app!(fixture.state.clone());

  let body = pickup_order(json!([{ "productId": fixture.rice.id, "quantity": 1 }]));
  let (status, error) = call_json!(&app, TestRequest::post().uri("/api/orders").set_json(body).to_request());

  assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
  assert_eq!(error, json!({ "error": "INTERNAL_ERROR", "message": "Internal server error" }));
  assert_eq!(fixture.store.order_row_count(), 0);
  assert_eq!(fixture.store.order_item_row_count(), 0);
}
