//! Error type for `gym-store-sqlite`.

use gym_core::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A business rule refused the operation; nothing was written.
  #[error(transparent)]
  Core(#[from] gym_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  /// A stored value could not be decoded into its domain type.
  #[error("corrupt {column} value: {value:?}")]
  Decode { column: &'static str, value: String },
}

impl Error {
  pub(crate) fn decode(column: &'static str, value: impl Into<String>) -> Self {
    Self::Decode {
      column,
      value: value.into(),
    }
  }
}

impl StoreError for Error {
  fn domain(&self) -> Option<&gym_core::Error> {
    match self {
      Self::Core(e) => Some(e),
      _ => None,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
