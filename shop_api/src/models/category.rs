// shop_api/src/models/category.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Category {
  pub id: Uuid,
  pub name: String,
  pub created_at: DateTime<Utc>,
}
