//! Error types for `notices-core`.

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A required field was absent or empty, or a query parameter was out of
  /// range.
  #[error("validation error: {0}")]
  Validation(String),

  #[error("notice not found: {0}")]
  NotFound(i64),

  #[error("notice {id} was already closed on {closed_at}")]
  AlreadyClosed {
    id:        i64,
    closed_at: DateTime<Utc>,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
