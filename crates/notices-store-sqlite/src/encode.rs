//! Decoding helpers between SQLite rows and the domain types.
//!
//! Timestamps are written by SQLite itself (`CURRENT_TIMESTAMP`,
//! `DATETIME('now')`) and therefore use its `YYYY-MM-DD HH:MM:SS` UTC text
//! form rather than RFC 3339.

use chrono::{DateTime, NaiveDateTime, Utc};
use notices_core::notice::{Notice, NoticeSummary};

use crate::{Error, Result};

const SQLITE_DATETIME: &str = "%Y-%m-%d %H:%M:%S";

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  NaiveDateTime::parse_from_str(s, SQLITE_DATETIME)
    .map(|naive| naive.and_utc())
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Raw rows ─────────────────────────────────────────────────────────────────

/// A full `notices` row as read from SQLite.
pub struct RawNotice {
  pub id:        i64,
  pub name:      String,
  pub message:   String,
  pub postdate:  String,
  pub closedate: Option<String>,
}

impl RawNotice {
  pub fn into_notice(self) -> Result<Notice> {
    Ok(Notice {
      id:        self.id,
      name:      self.name,
      message:   self.message,
      posted_at: decode_dt(&self.postdate)?,
      closed_at: self.closedate.as_deref().map(decode_dt).transpose()?,
    })
  }
}

/// A listing row; `message` is already cut down by `SUBSTR`.
pub struct RawSummary {
  pub id:       i64,
  pub name:     String,
  pub postdate: String,
  pub message:  String,
}

impl RawSummary {
  pub fn into_summary(self) -> Result<NoticeSummary> {
    Ok(NoticeSummary {
      id:        self.id,
      name:      self.name,
      posted_at: decode_dt(&self.postdate)?,
      message:   self.message,
    })
  }
}

/// What the close statement found, before timestamps are decoded.
pub enum RawClose {
  Closed(String),
  AlreadyClosed(String),
  Missing,
}
