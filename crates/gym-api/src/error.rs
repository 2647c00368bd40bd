//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use gym_core::{ErrorKind, store::StoreError};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Classify a backend error by the business rule it carries, if any.
  pub fn store<E: StoreError>(err: E) -> Self {
    match err.domain() {
      Some(domain) => Self::from_domain(domain),
      None => Self::Store(Box::new(err)),
    }
  }

  fn from_domain(err: &gym_core::Error) -> Self {
    let message = err.to_string();
    match err.kind() {
      ErrorKind::NotFound => Self::NotFound(message),
      ErrorKind::Conflict => Self::Conflict(message),
      ErrorKind::Invalid => Self::BadRequest(message),
    }
  }
}

impl From<gym_core::Error> for ApiError {
  fn from(err: gym_core::Error) -> Self { Self::from_domain(&err) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure in api handler");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
