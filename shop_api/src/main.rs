// shop_api/src/main.rs

use wow_shoppers_lite::config::{AppConfig, LogFormat};
use wow_shoppers_lite::state::AppState;
use wow_shoppers_lite::store::{seed, PgStore};
use wow_shoppers_lite::web;

use actix_cors::Cors;
use anyhow::Context;
use actix_web::http::header;
use actix_web::{App, HttpServer};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
  let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  let builder = tracing_subscriber::fmt().with_env_filter(env_filter);
  match format {
    LogFormat::Json => builder.json().init(),
    LogFormat::Pretty => builder.init(),
  }
}

/// Loads configuration and prepares the store. Any failure here is fatal.
async fn bootstrap() -> anyhow::Result<(Arc<AppConfig>, AppState)> {
  let app_config = AppConfig::from_env().context("Failed to load application configuration")?;

  let store = PgStore::connect(&app_config)
    .await
    .context("Failed to connect to the database")?;

  if app_config.run_migrations {
    store.run_migrations().await.context("Failed to run database migrations")?;
  } else {
    store.warn_on_missing_schema().await;
  }

  if app_config.seed_db {
    if let Err(e) = seed::seed_postgres(&store).await {
      tracing::error!(error = %e, "Failed to seed database.");
    }
  }

  Ok((Arc::new(app_config), AppState::new(Arc::new(store))))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  dotenvy::dotenv().ok();
  init_tracing(LogFormat::from_value(std::env::var("LOG_FORMAT").ok().as_deref()));

  tracing::info!("Starting Wow Shoppers Lite API server...");

  let (app_config, app_state) = match bootstrap().await {
    Ok(ready) => ready,
    Err(e) => {
      tracing::error!("Startup failed: {:#}", e);
      std::process::exit(1);
    }
  };

  let server_address = app_config.bind_address();
  tracing::info!("Attempting to bind server to {}...", server_address);

  let cors_origin = app_config.cors_origin.clone();
  HttpServer::new(move || {
    let cors = if cors_origin == "*" {
      Cors::default().allow_any_origin()
    } else {
      Cors::default().allowed_origin(&cors_origin)
    };
    let cors = cors
      .allowed_methods(vec!["GET", "POST", "PATCH"])
      .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
      .max_age(3600);

    let app_state = app_state.clone();
    App::new()
      .wrap(cors)
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(move |cfg| web::configure_app(cfg, app_state))
  })
  .bind(&server_address)?
  .run()
  .await
}
