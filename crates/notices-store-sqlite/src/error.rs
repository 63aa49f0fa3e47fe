//! Error type for `notices-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] notices_core::Error),

  /// A statement violated a schema constraint (e.g. `NOT NULL`).
  #[error("constraint violation: {message}")]
  Constraint {
    message: String,
    #[source]
    source:  tokio_rusqlite::Error,
  },

  #[error("database error: {0}")]
  Database(#[source] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A schema migration failed and was rolled back.
  #[error("migration to schema version {version} failed: {source}")]
  Migration {
    version: u32,
    #[source]
    source:  rusqlite::Error,
  },
}

impl From<tokio_rusqlite::Error> for Error {
  fn from(e: tokio_rusqlite::Error) -> Self {
    if let tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(failure, message)) = &e
      && failure.code == rusqlite::ErrorCode::ConstraintViolation
    {
      let message = message.clone().unwrap_or_else(|| failure.to_string());
      return Error::Constraint { message, source: e };
    }
    Error::Database(e)
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
