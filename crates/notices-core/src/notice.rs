//! The single record type the board persists.
//!
//! A notice is "open" while `closed_at` is `None`. Closing sets the timestamp
//! exactly once; nothing is ever deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Default number of rows per listing page.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Default width, in characters, of the message excerpt in listings.
pub const DEFAULT_SUMMARY_WIDTH: u32 = 72;

// ─── Stored record ───────────────────────────────────────────────────────────

/// A notice exactly as stored, with its full message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
  pub id:        i64,
  pub name:      String,
  pub message:   String,
  pub posted_at: DateTime<Utc>,
  pub closed_at: Option<DateTime<Utc>>,
}

/// A row of the open-notice listing. `message` is truncated for display; the
/// stored message is untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticeSummary {
  pub id:        i64,
  pub name:      String,
  pub posted_at: DateTime<Utc>,
  pub message:   String,
}

// ─── Input ───────────────────────────────────────────────────────────────────

/// A validated submission, ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNotice {
  pub name:    String,
  pub message: String,
}

impl NewNotice {
  /// Build a submission from possibly-missing form fields.
  ///
  /// Both fields are required; an empty string counts as missing.
  pub fn new(name: Option<String>, message: Option<String>) -> Result<Self> {
    let name = require("name", name)?;
    let message = require("message", message)?;
    Ok(Self { name, message })
  }
}

fn require(field: &str, value: Option<String>) -> Result<String> {
  match value {
    Some(v) if !v.is_empty() => Ok(v),
    _ => Err(Error::Validation(format!("missing required field `{field}`"))),
  }
}

// ─── Listing ─────────────────────────────────────────────────────────────────

/// Parameters for [`NoticeStore::list_open`](crate::store::NoticeStore::list_open).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageQuery {
  /// Maximum number of rows on a page. Must be at least 1.
  pub count:  u32,
  /// Zero-based page index; the store skips `offset * count` rows.
  pub offset: u32,
  /// Number of characters of each message to return.
  pub width:  u32,
}

impl Default for PageQuery {
  fn default() -> Self {
    Self {
      count:  DEFAULT_PAGE_SIZE,
      offset: 0,
      width:  DEFAULT_SUMMARY_WIDTH,
    }
  }
}

impl PageQuery {
  pub fn page(offset: u32) -> Self { Self { offset, ..Self::default() } }

  pub fn validate(&self) -> Result<()> {
    if self.count == 0 {
      return Err(Error::Validation("page size must be at least 1".into()));
    }
    Ok(())
  }

  /// Number of rows to skip.
  pub fn skip(&self) -> u64 { u64::from(self.offset) * u64::from(self.count) }

  /// `floor(open / count)`: the number of pages *after* the first.
  ///
  /// An exact multiple lands on the same boundary as a remainder would, so a
  /// board with exactly `count` open notices reports one further (empty)
  /// page.
  pub fn page_count(&self, open: u64) -> u64 { open / u64::from(self.count.max(1)) }
}

/// One page of open notices plus the page count for navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenPage {
  pub rows:       Vec<NoticeSummary>,
  pub page_count: u64,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn new_notice_requires_both_fields() {
    assert!(NewNotice::new(Some("Alice".into()), Some("Hello".into())).is_ok());
    assert!(matches!(
      NewNotice::new(None, Some("Hello".into())),
      Err(Error::Validation(_))
    ));
    assert!(matches!(
      NewNotice::new(Some("Alice".into()), None),
      Err(Error::Validation(_))
    ));
    assert!(matches!(
      NewNotice::new(Some(String::new()), Some("Hello".into())),
      Err(Error::Validation(_))
    ));
  }

  #[test]
  fn page_count_is_floor_division() {
    let q = PageQuery { count: 1, ..PageQuery::default() };
    assert_eq!(q.page_count(3), 3);

    let q = PageQuery::default();
    assert_eq!(q.page_count(0), 0);
    assert_eq!(q.page_count(19), 0);
    assert_eq!(q.page_count(20), 1);
    assert_eq!(q.page_count(41), 2);
  }

  #[test]
  fn skip_multiplies_offset_by_count() {
    let q = PageQuery { count: 20, offset: 3, width: 72 };
    assert_eq!(q.skip(), 60);
  }

  #[test]
  fn zero_page_size_is_rejected() {
    let q = PageQuery { count: 0, ..PageQuery::default() };
    assert!(matches!(q.validate(), Err(Error::Validation(_))));
  }
}
