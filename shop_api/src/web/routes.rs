// shop_api/src/web/routes.rs

use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::handlers::{catalog_handlers, order_handlers};

async fn health_check_handler() -> HttpResponse {
  HttpResponse::Ok().json(json!({ "ok": true }))
}

async fn route_not_found_handler() -> HttpResponse {
  HttpResponse::NotFound().json(json!({ "error": "NOT_FOUND", "message": "Route not found" }))
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .route("/health", web::get().to(health_check_handler))
    .service(
      web::scope("/api")
        .route("/categories", web::get().to(catalog_handlers::list_categories_handler))
        .route("/products", web::get().to(catalog_handlers::list_products_handler))
        .service(
          web::scope("/orders")
            .route("", web::get().to(order_handlers::list_orders_handler))
            .route("", web::post().to(order_handlers::create_order_handler))
            .route("/{order_id}", web::get().to(order_handlers::get_order_handler))
            .route(
              "/{order_id}/status",
              web::patch().to(order_handlers::update_order_status_handler),
            ),
        ),
    );
}

/// Shared state, extractor error mapping, routes and the 404 fallback.
///
/// `main` and the HTTP tests both build their `App` through this.
pub fn configure_app(cfg: &mut web::ServiceConfig, app_state: AppState) {
  cfg
    .app_data(web::Data::new(app_state))
    .app_data(
      web::JsonConfig::default()
        .error_handler(|err, _req| {
          tracing::debug!(error = %err, "Rejecting unreadable JSON body.");
          AppError::validation("Malformed JSON body", None).into()
        }),
    )
    .app_data(
      web::QueryConfig::default()
        .error_handler(|err, _req| {
          tracing::debug!(error = %err, "Rejecting unreadable query string.");
          AppError::validation("Invalid query parameters", None).into()
        }),
    )
    .configure(configure_app_routes)
    .default_service(web::to(route_not_found_handler));
}
