//! Close outcomes.
//!
//! Closing is the only mutation a notice ever sees. The outcome tells the
//! caller whether this call closed the notice, whether someone got there
//! first, or whether the id never existed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// The result of [`NoticeStore::close`](crate::store::NoticeStore::close).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CloseOutcome {
  /// This call set the close date.
  Closed {
    id:        i64,
    closed_at: DateTime<Utc>,
  },
  /// The notice was closed earlier; nothing changed.
  AlreadyClosed {
    id:        i64,
    closed_at: DateTime<Utc>,
  },
  /// No notice with this id; nothing changed.
  NotFound { id: i64 },
}

impl CloseOutcome {
  pub fn id(&self) -> i64 {
    match *self {
      Self::Closed { id, .. } | Self::AlreadyClosed { id, .. } | Self::NotFound { id } => id,
    }
  }

  /// Short machine-readable status, as used in redirect query strings.
  pub fn status(&self) -> &'static str {
    match self {
      Self::Closed { .. } => "closed",
      Self::AlreadyClosed { .. } => "already_closed",
      Self::NotFound { .. } => "not_found",
    }
  }

  pub fn is_closed(&self) -> bool { matches!(self, Self::Closed { .. }) }

  /// Treat anything but a fresh close as an error.
  pub fn into_result(self) -> Result<DateTime<Utc>> {
    match self {
      Self::Closed { closed_at, .. } => Ok(closed_at),
      Self::AlreadyClosed { id, closed_at } => Err(Error::AlreadyClosed { id, closed_at }),
      Self::NotFound { id } => Err(Error::NotFound(id)),
    }
  }
}
