// shop_api/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;

const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
  #[default]
  Pretty,
  Json,
}

impl LogFormat {
  /// Anything other than `json` (case-insensitive) means pretty output.
  pub fn from_value(value: Option<&str>) -> Self {
    match value {
      Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
      _ => LogFormat::Pretty,
    }
  }
}

/// `DATABASE_SSL` setting. `Auto` turns TLS on for hosted Supabase URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SslPreference {
  Auto,
  Enabled,
  Disabled,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,
  pub database_ssl: SslPreference,
  pub database_max_connections: u32,
  pub cors_origin: String,
  pub run_migrations: bool,
  pub seed_db: bool,
  pub log_format: LogFormat,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the config from any variable source; `from_env` passes the process environment.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let get_env = |var_name: &str| {
      lookup(var_name)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Config(format!("Missing environment variable '{}'", var_name)))
    };
    let parse_bool = |var_name: &str, default: bool| -> Result<bool> {
      match get_env(var_name) {
        Ok(raw) => raw
          .trim()
          .parse::<bool>()
          .map_err(|e| AppError::Config(format!("Invalid {} value: {}", var_name, e))),
        Err(_) => Ok(default),
      }
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let server_port = get_env("SERVER_PORT")
      .or_else(|_| get_env("PORT"))
      .unwrap_or_else(|_| "3000".to_string())
      .trim()
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let database_url = get_env("DATABASE_URL")?;

    let database_ssl = match get_env("DATABASE_SSL").ok().as_deref().map(str::trim) {
      Some("true") => SslPreference::Enabled,
      Some("false") => SslPreference::Disabled,
      _ => SslPreference::Auto,
    };

    let database_max_connections = get_env("DATABASE_MAX_CONNECTIONS")
      .unwrap_or_else(|_| "5".to_string())
      .trim()
      .parse::<u32>()
      .map_err(|e| AppError::Config(format!("Invalid DATABASE_MAX_CONNECTIONS: {}", e)))?;

    let cors_origin = get_env("CORS_ORIGIN").unwrap_or_else(|_| DEFAULT_CORS_ORIGIN.to_string());
    let run_migrations = parse_bool("RUN_MIGRATIONS", false)?;
    let seed_db = parse_bool("SEED_DB", false)?;
    let log_format = LogFormat::from_value(get_env("LOG_FORMAT").ok().as_deref());

    tracing::info!("Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      server_port,
      database_url,
      database_ssl,
      database_max_connections,
      cors_origin,
      run_migrations,
      seed_db,
      log_format,
    })
  }

  pub fn use_ssl(&self) -> bool {
    match self.database_ssl {
      SslPreference::Enabled => true,
      SslPreference::Disabled => false,
      SslPreference::Auto => self.database_url.contains("supabase.com"),
    }
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}
