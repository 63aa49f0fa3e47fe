//! [`SqliteStore`]: the SQLite implementation of [`NoticeStore`].

use std::{path::Path, sync::Arc};

use rusqlite::{OptionalExtension as _, TransactionBehavior};

use notices_core::{
  lifecycle::CloseOutcome,
  notice::{NewNotice, Notice, OpenPage, PageQuery},
  store::NoticeStore,
};

use crate::{
  encode::{RawClose, RawNotice, RawSummary, decode_dt},
  schema::{MIGRATIONS, NOTICES_TABLE, SCHEMA_COMPONENT, VERSIONS_TABLE, latest_version},
  Error, Result,
};

// ─── Schema reconciliation ───────────────────────────────────────────────────

/// What happened to the schema when the store was opened.
///
/// A failed migration does not make [`SqliteStore::open`] fail: the store is
/// still usable with the old layout, and the caller decides whether that is
/// acceptable.
#[derive(Debug)]
pub enum Reconciliation {
  /// Nothing to do; the stored version is already the latest (or newer).
  UpToDate { version: u32 },
  /// Pending migrations were applied and committed.
  Migrated { from: Option<u32>, to: u32 },
  /// A migration failed; everything was rolled back and the stored version
  /// is unchanged.
  Failed { from: Option<u32>, error: Error },
}

impl Reconciliation {
  pub fn is_failed(&self) -> bool { matches!(self, Self::Failed { .. }) }

  pub fn error(&self) -> Option<&Error> {
    match self {
      Self::Failed { error, .. } => Some(error),
      _ => None,
    }
  }
}

pub(crate) fn stored_version(conn: &rusqlite::Connection) -> rusqlite::Result<Option<u32>> {
  conn
    .query_row(
      "SELECT version FROM versions WHERE component = ?1",
      rusqlite::params![SCHEMA_COMPONENT],
      |row| row.get(0),
    )
    .optional()
}

/// Apply every migration newer than `current` inside one transaction.
///
/// On failure returns the version that was being applied.
fn apply_migrations(
  conn: &mut rusqlite::Connection,
  current: u32,
) -> std::result::Result<u32, (u32, rusqlite::Error)> {
  let tx = conn.transaction().map_err(|e| (current, e))?;
  let mut applied = current;

  for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
    tx.execute_batch(migration.sql)
      .map_err(|e| (migration.version, e))?;
    tx.execute(
      "INSERT OR REPLACE INTO versions (component, version) VALUES (?1, ?2)",
      rusqlite::params![SCHEMA_COMPONENT, migration.version],
    )
    .map_err(|e| (migration.version, e))?;
    applied = migration.version;
  }

  tx.commit().map_err(|e| (applied, e))?;
  Ok(applied)
}

fn reconcile(conn: &mut rusqlite::Connection) -> rusqlite::Result<Reconciliation> {
  let stored = stored_version(conn)?;
  let latest = latest_version();

  if let Some(version) = stored
    && version >= latest
  {
    if version > latest {
      tracing::warn!(version, latest, "database schema is newer than this binary");
    }
    return Ok(Reconciliation::UpToDate { version });
  }

  let outcome = match apply_migrations(conn, stored.unwrap_or(0)) {
    Ok(to) => Reconciliation::Migrated { from: stored, to },
    Err((version, source)) => Reconciliation::Failed {
      from:  stored,
      error: Error::Migration { version, source },
    },
  };
  Ok(outcome)
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A notice store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn:    tokio_rusqlite::Connection,
  reconciliation:     Arc<Reconciliation>,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  ///
  /// Existing tables and rows are kept; opening the same file repeatedly is
  /// safe.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::init(conn).await
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::init(conn).await
  }

  async fn init(conn: tokio_rusqlite::Connection) -> Result<Self> {
    let reconciliation = conn
      .call(|conn| {
        conn.execute_batch(NOTICES_TABLE)?;
        conn.execute_batch(VERSIONS_TABLE)?;
        Ok(reconcile(conn)?)
      })
      .await?;

    match &reconciliation {
      Reconciliation::UpToDate { version } => {
        tracing::debug!(version, "schema up to date");
      }
      Reconciliation::Migrated { from, to } => {
        tracing::info!(from = ?from, to, "schema migrated");
      }
      Reconciliation::Failed { from, error } => {
        tracing::error!(from = ?from, %error, "schema migration failed");
      }
    }

    Ok(Self { conn, reconciliation: Arc::new(reconciliation) })
  }

  /// The outcome of schema reconciliation performed when this store was
  /// opened.
  pub fn reconciliation(&self) -> &Reconciliation { &self.reconciliation }
}

// ─── NoticeStore impl ────────────────────────────────────────────────────────

impl NoticeStore for SqliteStore {
  type Error = Error;

  async fn count_open(&self) -> Result<u64> {
    let count: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row(
          "SELECT COUNT(id) FROM notices WHERE closedate IS NULL",
          [],
          |row| row.get(0),
        )?)
      })
      .await?;
    Ok(count as u64)
  }

  async fn list_open(&self, query: PageQuery) -> Result<OpenPage> {
    query.validate()?;

    let width = i64::from(query.width);
    let limit = i64::from(query.count);
    let skip  = i64::try_from(query.skip()).unwrap_or(i64::MAX);

    let raws: Vec<RawSummary> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, name, postdate, SUBSTR(message, 1, ?1)
           FROM notices
           WHERE closedate IS NULL
           ORDER BY id DESC
           LIMIT ?2 OFFSET ?3",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![width, limit, skip], |row| {
            Ok(RawSummary {
              id:       row.get(0)?,
              name:     row.get(1)?,
              postdate: row.get(2)?,
              message:  row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let rows = raws
      .into_iter()
      .map(RawSummary::into_summary)
      .collect::<Result<Vec<_>>>()?;
    let page_count = query.page_count(self.count_open().await?);

    Ok(OpenPage { rows, page_count })
  }

  async fn create(&self, input: NewNotice) -> Result<i64> {
    let NewNotice { name, message } = input;

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO notices (name, message) VALUES (?1, ?2)",
          rusqlite::params![name, message],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    tracing::debug!(id, "notice created");
    Ok(id)
  }

  async fn close(&self, id: i64) -> Result<CloseOutcome> {
    // The conditional update is the only write; whoever loses a race falls
    // through to the lookup and sees the winner's close date.
    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let closed: Option<String> = tx
          .query_row(
            "UPDATE notices SET closedate = DATETIME('now')
             WHERE id = ?1 AND closedate IS NULL
             RETURNING closedate",
            rusqlite::params![id],
            |row| row.get(0),
          )
          .optional()?;

        let raw = match closed {
          Some(at) => RawClose::Closed(at),
          None => tx
            .query_row(
              "SELECT closedate FROM notices WHERE id = ?1 AND closedate IS NOT NULL",
              rusqlite::params![id],
              |row| row.get(0),
            )
            .optional()?
            .map_or(RawClose::Missing, RawClose::AlreadyClosed),
        };

        tx.commit()?;
        Ok(raw)
      })
      .await?;

    let outcome = match raw {
      RawClose::Closed(at) => CloseOutcome::Closed { id, closed_at: decode_dt(&at)? },
      RawClose::AlreadyClosed(at) => {
        CloseOutcome::AlreadyClosed { id, closed_at: decode_dt(&at)? }
      }
      RawClose::Missing => CloseOutcome::NotFound { id },
    };

    tracing::debug!(id, status = outcome.status(), "close requested");
    Ok(outcome)
  }

  async fn get(&self, id: i64) -> Result<Option<Notice>> {
    let raw: Option<RawNotice> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT id, name, message, postdate, closedate FROM notices WHERE id = ?1",
            rusqlite::params![id],
            |row| {
              Ok(RawNotice {
                id:        row.get(0)?,
                name:      row.get(1)?,
                message:   row.get(2)?,
                postdate:  row.get(3)?,
                closedate: row.get(4)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawNotice::into_notice).transpose()
  }
}
