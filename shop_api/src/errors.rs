// shop_api/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::{json, Value};
use thiserror::Error;
use wow_workflow::WorkflowError;

#[derive(Debug, Error)]
pub enum AppError {
  /// Client input problem. `details` carries the field-level report.
  #[error("Validation Error: {message}")]
  Validation { message: String, details: Option<Value> },

  /// Holds the resource name, e.g. "Order".
  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Migration Error: {0}")]
  Migrate(#[from] sqlx::migrate::MigrateError),

  #[error("Workflow Error: {source}")]
  Workflow {
    #[from]
    source: WorkflowError,
  },

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl AppError {
  pub fn validation(message: impl Into<String>, details: Option<Value>) -> Self {
    AppError::Validation {
      message: message.into(),
      details,
    }
  }

  /// Stable machine-readable code used in the `error` field of the envelope.
  pub fn code(&self) -> &'static str {
    match self {
      AppError::Validation { .. } => "VALIDATION_ERROR",
      AppError::NotFound(_) => "NOT_FOUND",
      _ => "INTERNAL_ERROR",
    }
  }

  /// The `{error, message, details?}` envelope sent to clients.
  pub fn envelope(&self) -> Value {
    match self {
      AppError::Validation { message, details } => {
        let mut body = json!({ "error": self.code(), "message": message });
        if let Some(details) = details {
          body["details"] = details.clone();
        }
        body
      }
      AppError::NotFound(resource) => json!({ "error": self.code(), "message": format!("{} not found", resource) }),
      // Infrastructure failures never leak their internals to the caller.
      _ => json!({ "error": self.code(), "message": "Internal server error" }),
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation { .. } => StatusCode::BAD_REQUEST,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    match self {
      AppError::Validation { message, .. } => tracing::warn!(%message, "Rejecting request with validation error"),
      AppError::NotFound(resource) => tracing::info!(%resource, "Responding with not found"),
      other => tracing::error!(application_error = %other, "Responding with internal error"),
    }
    HttpResponse::build(self.status_code()).json(self.envelope())
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
