//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error renders as `{"errors": ["<message>"]}`.

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection, QueryRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tract_core::{IntegrityViolation, ValidationError, store::StoreError};
use uuid::Uuid;

/// Symbolic message returned for unknown project ids.
pub const PROJECT_NOT_FOUND: &str = "PROJECT_NOT_FOUND";

const UNEXPECTED: &str = "An unexpected error occurred.";

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("validation error: {0}")]
  Validation(#[from] ValidationError),

  #[error("project not found: {0}")]
  NotFound(Uuid),

  #[error("integrity error: {0}")]
  Integrity(IntegrityViolation),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Split a backend error into a constraint violation or an opaque failure.
  pub fn from_store<E: StoreError>(e: E) -> Self {
    match e.integrity_violation() {
      Some(violation) => ApiError::Integrity(violation),
      None => ApiError::Store(Box::new(e)),
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    ApiError::Validation(ValidationError::Malformed(rejection.body_text()))
  }
}

impl From<PathRejection> for ApiError {
  fn from(rejection: PathRejection) -> Self {
    ApiError::Validation(ValidationError::Malformed(rejection.body_text()))
  }
}

impl From<QueryRejection> for ApiError {
  fn from(rejection: QueryRejection) -> Self {
    ApiError::Validation(ValidationError::Malformed(rejection.body_text()))
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::Validation(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
      ApiError::NotFound(_) => (StatusCode::NOT_FOUND, PROJECT_NOT_FOUND.to_owned()),
      ApiError::Integrity(v) => (StatusCode::BAD_REQUEST, v.to_string()),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "unexpected store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, UNEXPECTED.to_owned())
      }
    };
    (status, Json(json!({ "errors": [message] }))).into_response()
  }
}
