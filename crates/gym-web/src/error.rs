//! Error types and axum `IntoResponse` implementation.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
};
use gym_core::{ErrorKind, store::StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// No session cookie, or one that is not a client id.
  #[error("not logged in")]
  Unauthenticated,
  /// The session cookie names a client that does not exist.
  #[error("unknown session")]
  UnknownSession,
  #[error("admin access required")]
  Forbidden,
  #[error("not found: {0}")]
  NotFound(String),
  #[error("bad request: {0}")]
  BadRequest(String),
  #[error("conflict: {0}")]
  Conflict(String),
  #[error("password hashing failed: {0}")]
  Hash(String),
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
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

impl From<gym_core::Error> for Error {
  fn from(err: gym_core::Error) -> Self { Self::from_domain(&err) }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    match self {
      Error::Unauthenticated | Error::UnknownSession => {
        (StatusCode::UNAUTHORIZED, self.to_string()).into_response()
      }
      Error::Forbidden => (StatusCode::FORBIDDEN, "Forbidden").into_response(),
      Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg).into_response(),
      Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
      Error::Conflict(msg) => (StatusCode::CONFLICT, msg).into_response(),
      Error::Hash(msg) => {
        tracing::error!(error = %msg, "password hashing failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
      }
      Error::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
      }
    }
  }
}
