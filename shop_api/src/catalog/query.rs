// shop_api/src/catalog/query.rs

use crate::catalog::{ProductFilter, ProductPredicate};
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::Postgres;
use uuid::Uuid;

pub const PRODUCT_LISTING_SELECT: &str = "SELECT p.id, p.category_id, c.name AS category_name, p.name, p.description, \
   p.price, p.in_stock, p.stock_qty, p.image_url, p.created_at \
   FROM products p JOIN categories c ON c.id = p.category_id";

pub const ORDER_SUMMARY_SELECT: &str =
  "SELECT id, customer_name, status, total, created_at, updated_at FROM orders";

#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
  Text(String),
  Uuid(Uuid),
  Integer(i64),
}

/// Postgres SELECT builder with dynamic WHERE conditions and `$n` placeholders.
///
/// Values only ever travel as bindings; conditions reference them by position.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
  select: String,
  conditions: Vec<String>,
  order_by: Option<String>,
  tail: Option<String>,
  bindings: Vec<QueryValue>,
}

impl QueryBuilder {
  pub fn new(select: &str) -> Self {
    Self {
      select: select.to_string(),
      conditions: Vec::new(),
      order_by: None,
      tail: None,
      bindings: Vec::new(),
    }
  }

  /// Registers a binding and returns its placeholder.
  fn placeholder(&mut self, value: QueryValue) -> String {
    self.bindings.push(value);
    format!("${}", self.bindings.len())
  }

  /// Adds a literal condition that needs no bindings.
  pub fn add_condition(&mut self, condition: &str) -> &mut Self {
    self.conditions.push(condition.to_string());
    self
  }

  /// Case-insensitive substring match; LIKE wildcards in `needle` match literally.
  pub fn add_contains_condition(&mut self, column: &str, needle: &str) -> &mut Self {
    let pattern = format!("%{}%", escape_like(needle));
    let placeholder = self.placeholder(QueryValue::Text(pattern));
    self
      .conditions
      .push(format!("{} ILIKE {} ESCAPE '\\'", column, placeholder));
    self
  }

  pub fn add_uuid_condition(&mut self, column: &str, value: Uuid) -> &mut Self {
    let placeholder = self.placeholder(QueryValue::Uuid(value));
    self.conditions.push(format!("{} = {}", column, placeholder));
    self
  }

  pub fn add_product_predicate(&mut self, predicate: &ProductPredicate) -> &mut Self {
    match predicate {
      ProductPredicate::NameContains(needle) => self.add_contains_condition("p.name", needle),
      ProductPredicate::InCategory(category_id) => self.add_uuid_condition("p.category_id", *category_id),
      ProductPredicate::Purchasable => self.add_condition("(p.in_stock AND p.stock_qty > 0)"),
      ProductPredicate::NotPurchasable => self.add_condition("(NOT p.in_stock OR p.stock_qty <= 0)"),
    }
  }

  pub fn order_by(&mut self, clause: &str) -> &mut Self {
    self.order_by = Some(clause.to_string());
    self
  }

  /// Must come after every condition so its placeholders number last.
  pub fn limit_offset(&mut self, limit: i64, offset: i64) -> &mut Self {
    let limit_ph = self.placeholder(QueryValue::Integer(limit));
    let offset_ph = self.placeholder(QueryValue::Integer(offset));
    self.tail = Some(format!("LIMIT {} OFFSET {}", limit_ph, offset_ph));
    self
  }

  /// Empty if there are no conditions.
  pub fn build_where_clause(&self) -> String {
    if self.conditions.is_empty() {
      String::new()
    } else {
      format!(" WHERE {}", self.conditions.join(" AND "))
    }
  }

  pub fn sql(&self) -> String {
    let mut sql = format!("{}{}", self.select, self.build_where_clause());
    if let Some(order_by) = &self.order_by {
      sql.push_str(" ORDER BY ");
      sql.push_str(order_by);
    }
    if let Some(tail) = &self.tail {
      sql.push(' ');
      sql.push_str(tail);
    }
    sql
  }

  pub fn bindings(&self) -> &[QueryValue] {
    &self.bindings
  }

  pub fn apply_bindings<'a, 'b, O>(
    &'b self,
    mut query: QueryAs<'a, Postgres, O, PgArguments>,
  ) -> QueryAs<'a, Postgres, O, PgArguments>
  where
    'b: 'a,
  {
    for binding in &self.bindings {
      query = match binding {
        QueryValue::Text(s) => query.bind(s),
        QueryValue::Uuid(u) => query.bind(*u),
        QueryValue::Integer(i) => query.bind(*i),
      };
    }
    query
  }
}

/// Escapes `\`, `%` and `_` for use inside a LIKE pattern with `ESCAPE '\'`.
pub fn escape_like(raw: &str) -> String {
  let mut escaped = String::with_capacity(raw.len());
  for ch in raw.chars() {
    if matches!(ch, '\\' | '%' | '_') {
      escaped.push('\\');
    }
    escaped.push(ch);
  }
  escaped
}

/// Listing query for `GET /api/products`, newest first.
pub fn product_listing_query(filter: &ProductFilter) -> QueryBuilder {
  let mut builder = QueryBuilder::new(PRODUCT_LISTING_SELECT);
  for predicate in filter.predicates() {
    builder.add_product_predicate(&predicate);
  }
  builder.order_by("p.created_at DESC, p.name ASC");
  builder
}

pub fn order_page_query(limit: i64, offset: i64) -> QueryBuilder {
  let mut builder = QueryBuilder::new(ORDER_SUMMARY_SELECT);
  builder.order_by("created_at DESC").limit_offset(limit, offset);
  builder
}
