// shop_api/src/services/catalog_service.rs

use crate::catalog::{ProductFilter, ProductListQuery};
use crate::errors::Result;
use crate::models::{Category, ProductListing};
use crate::store::ShopStore;
use tracing::{debug, instrument};

#[instrument(name = "catalog_service::list_categories", skip(store))]
pub async fn list_categories(store: &dyn ShopStore) -> Result<Vec<Category>> {
  let categories = store.list_categories().await?;
  debug!(count = categories.len(), "Fetched categories.");
  Ok(categories)
}

/// Lists products matching the query string filters.
///
/// # Returns
/// The matching products, or a validation error when `categoryId` or
/// `inStock` is malformed. Nothing is queried in that case.
#[instrument(name = "catalog_service::list_products", skip(store))]
pub async fn list_products(store: &dyn ShopStore, query: &ProductListQuery) -> Result<Vec<ProductListing>> {
  let filter = ProductFilter::from_query(query)?;
  let products = store.list_products(&filter).await?;
  debug!(count = products.len(), ?filter, "Fetched products.");
  Ok(products)
}
