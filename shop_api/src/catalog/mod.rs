// shop_api/src/catalog/mod.rs

//! Product filters and the SQL they turn into.

pub mod query;

use crate::errors::{AppError, Result};
use crate::models::Product;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};
use uuid::Uuid;

/// Versioned UUID shape accepted for `categoryId`.
static CATEGORY_ID_SHAPE: Lazy<std::result::Result<Regex, regex::Error>> =
  Lazy::new(|| Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[1-5][0-9a-fA-F]{3}-[89abAB][0-9a-fA-F]{3}-[0-9a-fA-F]{12}$"));

/// Raw `GET /api/products` query string.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListQuery {
  pub search: Option<String>,
  pub category_id: Option<String>,
  pub in_stock: Option<String>,
}

/// One typed condition on the product listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductPredicate {
  /// Case-insensitive substring of the product name. Holds the raw needle.
  NameContains(String),
  InCategory(Uuid),
  Purchasable,
  NotPurchasable,
}

impl ProductPredicate {
  /// Evaluates the predicate against an in-memory row with the same meaning as its SQL.
  pub fn matches(&self, product: &Product) -> bool {
    match self {
      ProductPredicate::NameContains(needle) => product.name.to_lowercase().contains(&needle.to_lowercase()),
      ProductPredicate::InCategory(category_id) => product.category_id == *category_id,
      ProductPredicate::Purchasable => product.is_purchasable(),
      ProductPredicate::NotPurchasable => !product.is_purchasable(),
    }
  }
}

/// Validated product filters. All present filters must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
  pub search: Option<String>,
  pub category_id: Option<Uuid>,
  pub in_stock: Option<bool>,
}

impl ProductFilter {
  pub fn from_query(query: &ProductListQuery) -> Result<Self> {
    let category_id_shape = CATEGORY_ID_SHAPE
      .as_ref()
      .map_err(|e| AppError::Internal(format!("Invalid category id regex: {}", e)))?;
    let mut details = Map::new();

    let search = query
      .search
      .as_deref()
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .map(str::to_string);

    let category_id = match query.category_id.as_deref() {
      None => None,
      Some(raw) if category_id_shape.is_match(raw) => Uuid::parse_str(raw).ok(),
      Some(_) => {
        details.insert("categoryId".to_string(), Value::from("Must be a valid UUID"));
        None
      }
    };

    let in_stock = match query.in_stock.as_deref() {
      None => None,
      Some("true") => Some(true),
      Some("false") => Some(false),
      Some(_) => {
        details.insert("inStock".to_string(), Value::from("Must be true or false"));
        None
      }
    };

    if !details.is_empty() {
      let message = match (details.contains_key("categoryId"), details.contains_key("inStock")) {
        (true, true) => "Invalid query parameters",
        (true, false) => "Invalid categoryId parameter",
        _ => "Invalid inStock parameter",
      };
      return Err(AppError::validation(message, Some(Value::Object(details))));
    }

    Ok(Self {
      search,
      category_id,
      in_stock,
    })
  }

  pub fn predicates(&self) -> Vec<ProductPredicate> {
    let mut predicates = Vec::new();
    if let Some(search) = &self.search {
      predicates.push(ProductPredicate::NameContains(search.clone()));
    }
    if let Some(category_id) = self.category_id {
      predicates.push(ProductPredicate::InCategory(category_id));
    }
    match self.in_stock {
      Some(true) => predicates.push(ProductPredicate::Purchasable),
      Some(false) => predicates.push(ProductPredicate::NotPurchasable),
      None => {}
    }
    predicates
  }

  pub fn matches(&self, product: &Product) -> bool {
    self.predicates().iter().all(|p| p.matches(product))
  }
}
