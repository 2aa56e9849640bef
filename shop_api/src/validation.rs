// shop_api/src/validation.rs

//! Order request validation.
//!
//! Works on the raw JSON body so every violation can be reported at once,
//! including ones a typed deserializer would stop at (wrong type, missing
//! field, bad enum label).

use crate::models::{DeliveryMethod, PaymentMethod};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use uuid::Uuid;

pub const NAME_MESSAGE: &str = "Must be at least 2 characters";
pub const PHONE_MESSAGE: &str = "Must be at least 7 characters";
pub const DELIVERY_METHOD_MESSAGE: &str = "Must be either \"delivery\" or \"pickup\"";
pub const DELIVERY_ADDRESS_MESSAGE: &str = "Required when delivery method is \"delivery\" (min 5 characters)";
pub const PAYMENT_METHOD_MESSAGE: &str = "Must be either \"cash_on_delivery\" or \"mock\"";
pub const ITEMS_MESSAGE: &str = "Must be a non-empty array";
pub const PRODUCT_ID_REQUIRED: &str = "Required";
pub const PRODUCT_ID_INVALID: &str = "Must be a valid UUID";
pub const QUANTITY_MESSAGE: &str = "Must be an integer >= 1";

const MIN_NAME_CHARS: usize = 2;
const MIN_PHONE_CHARS: usize = 7;
const MIN_ADDRESS_CHARS: usize = 5;

/// A validated, trimmed order creation request.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
  pub customer_name: String,
  pub customer_phone: String,
  pub delivery_method: DeliveryMethod,
  /// Only set for [`DeliveryMethod::Delivery`].
  pub delivery_address: Option<String>,
  pub payment_method: PaymentMethod,
  pub items: Vec<RequestedItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestedItem {
  pub product_id: Uuid,
  pub quantity: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldError {
  Message(&'static str),
  Items(Vec<ItemError>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemError {
  pub index: usize,
  pub errors: BTreeMap<&'static str, &'static str>,
}

/// Field name to problem. Serializes to the `details` object of a 400 response.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<&'static str, FieldError>);

impl ValidationErrors {
  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn get(&self, field: &str) -> Option<&FieldError> {
    self.0.get(field)
  }

  pub fn fields(&self) -> impl Iterator<Item = &&'static str> {
    self.0.keys()
  }

  fn add(&mut self, field: &'static str, error: FieldError) {
    self.0.insert(field, error);
  }

  pub fn to_details(&self) -> Value {
    serde_json::to_value(self).unwrap_or(Value::Null)
  }
}

fn trimmed_at_least(value: Option<&Value>, min_chars: usize) -> Option<String> {
  let trimmed = value?.as_str()?.trim();
  (trimmed.chars().count() >= min_chars).then(|| trimmed.to_string())
}

fn parse_quantity(value: Option<&Value>) -> Option<i32> {
  let number = match value? {
    Value::Number(n) => n,
    _ => return None,
  };
  let whole = match (number.as_i64(), number.as_f64()) {
    (Some(i), _) => i,
    // 2.0 is still an integer quantity.
    (None, Some(f)) if f.fract() == 0.0 && f.abs() <= i32::MAX as f64 => f as i64,
    _ => return None,
  };
  i32::try_from(whole).ok().filter(|q| *q >= 1)
}

fn validate_item(item: &Value) -> Result<RequestedItem, BTreeMap<&'static str, &'static str>> {
  let mut errors = BTreeMap::new();

  let product_id = match item.get("productId") {
    None | Some(Value::Null) => None,
    Some(Value::String(s)) if s.is_empty() => None,
    Some(other) => match other.as_str().map(Uuid::parse_str) {
      Some(Ok(id)) => Some(id),
      _ => {
        errors.insert("productId", PRODUCT_ID_INVALID);
        Some(Uuid::nil())
      }
    },
  };
  if product_id.is_none() {
    errors.insert("productId", PRODUCT_ID_REQUIRED);
  }

  let quantity = parse_quantity(item.get("quantity"));
  if quantity.is_none() {
    errors.insert("quantity", QUANTITY_MESSAGE);
  }

  match (product_id, quantity) {
    (Some(product_id), Some(quantity)) if errors.is_empty() => Ok(RequestedItem { product_id, quantity }),
    _ => Err(errors),
  }
}

/// Validates a raw order creation body, collecting every violation.
pub fn validate_order_request(body: &Value) -> Result<OrderRequest, ValidationErrors> {
  let mut errors = ValidationErrors::default();

  let customer_name = trimmed_at_least(body.get("customerName"), MIN_NAME_CHARS);
  if customer_name.is_none() {
    errors.add("customerName", FieldError::Message(NAME_MESSAGE));
  }

  let customer_phone = trimmed_at_least(body.get("customerPhone"), MIN_PHONE_CHARS);
  if customer_phone.is_none() {
    errors.add("customerPhone", FieldError::Message(PHONE_MESSAGE));
  }

  let delivery_method = body
    .get("deliveryMethod")
    .and_then(Value::as_str)
    .and_then(|s| s.parse::<DeliveryMethod>().ok());
  if delivery_method.is_none() {
    errors.add("deliveryMethod", FieldError::Message(DELIVERY_METHOD_MESSAGE));
  }

  let delivery_address = match delivery_method {
    Some(DeliveryMethod::Delivery) => {
      let address = trimmed_at_least(body.get("deliveryAddress"), MIN_ADDRESS_CHARS);
      if address.is_none() {
        errors.add("deliveryAddress", FieldError::Message(DELIVERY_ADDRESS_MESSAGE));
      }
      address
    }
    _ => None,
  };

  let payment_method = match body.get("paymentMethod") {
    None | Some(Value::Null) => Some(PaymentMethod::default()),
    Some(Value::String(s)) if s.is_empty() => Some(PaymentMethod::default()),
    Some(value) => value.as_str().and_then(|s| s.parse::<PaymentMethod>().ok()),
  };
  if payment_method.is_none() {
    errors.add("paymentMethod", FieldError::Message(PAYMENT_METHOD_MESSAGE));
  }

  let mut items = Vec::new();
  match body.get("items").and_then(Value::as_array) {
    Some(raw_items) if !raw_items.is_empty() => {
      let mut item_errors = Vec::new();
      for (index, raw) in raw_items.iter().enumerate() {
        match validate_item(raw) {
          Ok(item) => items.push(item),
          Err(errors) => item_errors.push(ItemError { index, errors }),
        }
      }
      if !item_errors.is_empty() {
        errors.add("items", FieldError::Items(item_errors));
      }
    }
    _ => errors.add("items", FieldError::Message(ITEMS_MESSAGE)),
  }

  match (customer_name, customer_phone, delivery_method, payment_method) {
    (Some(customer_name), Some(customer_phone), Some(delivery_method), Some(payment_method)) if errors.is_empty() => {
      Ok(OrderRequest {
        customer_name,
        customer_phone,
        delivery_method,
        delivery_address,
        payment_method,
        items,
      })
    }
    _ => Err(errors),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn valid_body() -> Value {
    json!({
      "customerName": "  Ada Obi ",
      "customerPhone": "0801234567",
      "deliveryMethod": "delivery",
      "deliveryAddress": " 12 Marina Road, Lagos ",
      "items": [{ "productId": "3f2b8c1e-6a4d-4e2b-9c7a-1d2e3f4a5b6c", "quantity": 2 }]
    })
  }

  #[test]
  fn accepts_and_trims_a_valid_request() {
    let request = validate_order_request(&valid_body()).unwrap();
    assert_eq!(request.customer_name, "Ada Obi");
    assert_eq!(request.delivery_address.as_deref(), Some("12 Marina Road, Lagos"));
    assert_eq!(request.payment_method, PaymentMethod::CashOnDelivery);
    assert_eq!(request.items.len(), 1);
    assert_eq!(request.items[0].quantity, 2);
  }

  #[test]
  fn pickup_drops_any_address() {
    let mut body = valid_body();
    body["deliveryMethod"] = json!("pickup");
    body["deliveryAddress"] = json!("x");
    let request = validate_order_request(&body).unwrap();
    assert_eq!(request.delivery_method, DeliveryMethod::Pickup);
    assert_eq!(request.delivery_address, None);
  }

  #[test]
  fn collects_every_top_level_violation() {
    let errors = validate_order_request(&json!({
      "customerName": " A ",
      "customerPhone": 1234567,
      "deliveryMethod": "courier",
      "paymentMethod": "card",
      "items": []
    }))
    .unwrap_err();

    assert_eq!(errors.get("customerName"), Some(&FieldError::Message(NAME_MESSAGE)));
    assert_eq!(errors.get("customerPhone"), Some(&FieldError::Message(PHONE_MESSAGE)));
    assert_eq!(errors.get("deliveryMethod"), Some(&FieldError::Message(DELIVERY_METHOD_MESSAGE)));
    assert_eq!(errors.get("paymentMethod"), Some(&FieldError::Message(PAYMENT_METHOD_MESSAGE)));
    assert_eq!(errors.get("items"), Some(&FieldError::Message(ITEMS_MESSAGE)));
    // Address is only checked once the method is known to be "delivery".
    assert!(errors.get("deliveryAddress").is_none());
  }

  #[test]
  fn delivery_requires_an_address() {
    let mut body = valid_body();
    body["deliveryAddress"] = json!("   ab  ");
    let errors = validate_order_request(&body).unwrap_err();
    assert_eq!(errors.fields().copied().collect::<Vec<_>>(), vec!["deliveryAddress"]);
  }

  #[test]
  fn null_payment_method_defaults_to_cash() {
    let mut body = valid_body();
    body["paymentMethod"] = Value::Null;
    assert_eq!(validate_order_request(&body).unwrap().payment_method, PaymentMethod::CashOnDelivery);
    body["paymentMethod"] = json!("");
    assert_eq!(validate_order_request(&body).unwrap().payment_method, PaymentMethod::CashOnDelivery);
    body["paymentMethod"] = json!("mock");
    assert_eq!(validate_order_request(&body).unwrap().payment_method, PaymentMethod::Mock);
  }

  #[test]
  fn reports_item_problems_by_index() {
    let mut body = valid_body();
    body["items"] = json!([
      { "productId": "3f2b8c1e-6a4d-4e2b-9c7a-1d2e3f4a5b6c", "quantity": 1 },
      { "quantity": 0 },
      { "productId": "not-a-uuid", "quantity": 1.5 },
      { "productId": "3f2b8c1e-6a4d-4e2b-9c7a-1d2e3f4a5b6c", "quantity": 3.0 },
      { "productId": "", "quantity": "2" }
    ]);
    let errors = validate_order_request(&body).unwrap_err();

    let details = errors.to_details();
    assert_eq!(
      details["items"],
      json!([
        { "index": 1, "errors": { "productId": "Required", "quantity": QUANTITY_MESSAGE } },
        { "index": 2, "errors": { "productId": "Must be a valid UUID", "quantity": QUANTITY_MESSAGE } },
        { "index": 4, "errors": { "productId": "Required", "quantity": QUANTITY_MESSAGE } }
      ])
    );
  }

  #[test]
  fn quantity_must_fit_in_32_bits() {
    assert_eq!(parse_quantity(Some(&json!(i32::MAX))), Some(i32::MAX));
    assert_eq!(parse_quantity(Some(&json!(i64::from(i32::MAX) + 1))), None);
    assert_eq!(parse_quantity(Some(&json!(-1))), None);
    assert_eq!(parse_quantity(None), None);
  }

  #[test]
  fn non_object_body_reports_all_required_fields() {
    let errors = validate_order_request(&json!([1, 2, 3])).unwrap_err();
    let fields: Vec<_> = errors.fields().copied().collect();
    assert_eq!(
      fields,
      vec!["customerName", "customerPhone", "deliveryMethod", "items"]
    );
  }
}
