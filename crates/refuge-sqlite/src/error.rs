//! Error type for `refuge-sqlite`.

use refuge_schemas::ValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] rusqlite::Error),

  #[error("connection error: {0}")]
  Connection(#[from] tokio_rusqlite::Error),

  /// A row came back from the database but did not fit the model.
  #[error("row {row}: {source}")]
  Validation {
    /// Zero-based position of the row in the result set.
    row:    usize,
    source: ValidationError,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
