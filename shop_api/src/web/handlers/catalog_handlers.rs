// shop_api/src/web/handlers/catalog_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{info, instrument};

use crate::catalog::ProductListQuery;
use crate::errors::AppError;
use crate::services::catalog_service;
use crate::state::AppState;

#[instrument(name = "handler::list_categories", skip(app_state))]
pub async fn list_categories_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let categories = catalog_service::list_categories(app_state.store.as_ref()).await?;
  info!("Successfully fetched {} categories.", categories.len());

  Ok(HttpResponse::Ok().json(json!({
      "categories": categories,
      "count": categories.len()
  })))
}

#[instrument(name = "handler::list_products", skip(app_state, query_params))]
pub async fn list_products_handler(
  app_state: web::Data<AppState>,
  query_params: web::Query<ProductListQuery>,
) -> Result<HttpResponse, AppError> {
  let products = catalog_service::list_products(app_state.store.as_ref(), &query_params).await?;
  info!("Successfully fetched {} products.", products.len());

  Ok(HttpResponse::Ok().json(json!({
      "products": products,
      "count": products.len()
  })))
}
