//! Integration tests for `SqliteStore` against in-memory and on-disk
//! databases.

use notices_core::{
  lifecycle::CloseOutcome,
  notice::{NewNotice, PageQuery},
  store::NoticeStore,
};

use crate::{Error, Reconciliation, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn notice(name: &str, message: &str) -> NewNotice {
  NewNotice::new(Some(name.into()), Some(message.into())).unwrap()
}

async fn table_count(s: &SqliteStore, table: &'static str) -> i64 {
  s.conn
    .call(move |conn| {
      Ok(conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        rusqlite::params![table],
        |row| row.get(0),
      )?)
    })
    .await
    .unwrap()
}

async fn schema_version(s: &SqliteStore) -> Option<u32> {
  s.conn
    .call(|conn| Ok(crate::store::stored_version(conn)?))
    .await
    .unwrap()
}

async fn has_parent_column(s: &SqliteStore) -> bool {
  s.conn
    .call(|conn| {
      let mut stmt = conn.prepare("SELECT name FROM pragma_table_info('notices')")?;
      let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
      Ok(names.iter().any(|n| n == "parent_id"))
    })
    .await
    .unwrap()
}

// ─── Creation and listing ────────────────────────────────────────────────────

#[tokio::test]
async fn alice_and_bob() {
  let s = store().await;

  let alice = s.create(notice("Alice", "Hello")).await.unwrap();
  let bob = s.create(notice("Bob", "World")).await.unwrap();
  assert_eq!(alice, 1);
  assert_eq!(bob, 2);

  let page = s
    .list_open(PageQuery { count: 10, offset: 0, width: 72 })
    .await
    .unwrap();
  assert_eq!(page.page_count, 0);
  let rows: Vec<_> = page
    .rows
    .iter()
    .map(|r| (r.id, r.name.as_str(), r.message.as_str()))
    .collect();
  assert_eq!(rows, [(2, "Bob", "World"), (1, "Alice", "Hello")]);

  let first = s.close(1).await.unwrap();
  assert!(matches!(first, CloseOutcome::Closed { id: 1, .. }));

  let second = s.close(1).await.unwrap();
  match (first, second) {
    (
      CloseOutcome::Closed { closed_at: first_at, .. },
      CloseOutcome::AlreadyClosed { id, closed_at },
    ) => {
      assert_eq!(id, 1);
      assert_eq!(closed_at, first_at);
    }
    other => panic!("unexpected outcomes: {other:?}"),
  }

  assert_eq!(s.count_open().await.unwrap(), 1);
}

#[tokio::test]
async fn new_notice_is_listed_first() {
  let s = store().await;
  for i in 0..5 {
    s.create(notice(&format!("n{i}"), "older")).await.unwrap();
  }
  let id = s.create(notice("Carol", "newest")).await.unwrap();

  let page = s.list_open(PageQuery::default()).await.unwrap();
  assert_eq!(page.rows[0].id, id);
  assert_eq!(page.rows[0].name, "Carol");
  assert_eq!(page.rows[0].message, "newest");
}

#[tokio::test]
async fn created_notice_is_open_with_post_date() {
  let s = store().await;
  let before = chrono::Utc::now() - chrono::Duration::seconds(2);
  let id = s.create(notice("Dave", "ping")).await.unwrap();

  let n = s.get(id).await.unwrap().unwrap();
  assert!(n.closed_at.is_none());
  assert!(n.posted_at >= before);
  assert_eq!(n.name, "Dave");
}

#[tokio::test]
async fn get_missing_returns_none() {
  let s = store().await;
  assert!(s.get(404).await.unwrap().is_none());
}

// ─── Pagination and truncation ───────────────────────────────────────────────

#[tokio::test]
async fn pagination_with_single_row_pages() {
  let s = store().await;
  let first = s.create(notice("a", "first")).await.unwrap();
  s.create(notice("b", "second")).await.unwrap();
  s.create(notice("c", "third")).await.unwrap();

  let page = s
    .list_open(PageQuery { count: 1, offset: 0, width: 72 })
    .await
    .unwrap();
  assert_eq!(page.rows.len(), 1);
  assert_eq!(page.page_count, 3);

  let page = s
    .list_open(PageQuery { count: 1, offset: 2, width: 72 })
    .await
    .unwrap();
  assert_eq!(page.rows.len(), 1);
  assert_eq!(page.rows[0].id, first);
}

#[tokio::test]
async fn page_past_the_end_is_empty() {
  let s = store().await;
  s.create(notice("a", "only")).await.unwrap();

  let page = s.list_open(PageQuery::page(5)).await.unwrap();
  assert!(page.rows.is_empty());
  assert_eq!(page.page_count, 0);
}

#[tokio::test]
async fn zero_page_size_is_a_validation_error() {
  let s = store().await;
  let err = s
    .list_open(PageQuery { count: 0, offset: 0, width: 72 })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Core(notices_core::Error::Validation(_))));
}

#[tokio::test]
async fn listing_truncates_without_touching_storage() {
  let s = store().await;
  let long: String = ('a'..='z').cycle().take(100).collect();
  let id = s.create(notice("Erin", &long)).await.unwrap();

  let page = s.list_open(PageQuery::default()).await.unwrap();
  assert_eq!(page.rows[0].message.chars().count(), 72);
  assert_eq!(page.rows[0].message, &long[..72]);

  let stored = s.get(id).await.unwrap().unwrap();
  assert_eq!(stored.message, long);
}

#[tokio::test]
async fn truncation_counts_characters_not_bytes() {
  let s = store().await;
  let message = "é".repeat(10);
  s.create(notice("Frank", &message)).await.unwrap();

  let page = s
    .list_open(PageQuery { count: 20, offset: 0, width: 4 })
    .await
    .unwrap();
  assert_eq!(page.rows[0].message, "éééé");
}

// ─── Closing ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn close_missing_id_is_not_found() {
  let s = store().await;
  s.create(notice("a", "b")).await.unwrap();

  let outcome = s.close(99).await.unwrap();
  assert_eq!(outcome, CloseOutcome::NotFound { id: 99 });
  assert_eq!(s.count_open().await.unwrap(), 1);
}

#[tokio::test]
async fn closing_decrements_open_count_once() {
  let s = store().await;
  let a = s.create(notice("a", "x")).await.unwrap();
  s.create(notice("b", "y")).await.unwrap();
  s.create(notice("c", "z")).await.unwrap();
  assert_eq!(s.count_open().await.unwrap(), 3);

  s.close(a).await.unwrap();
  assert_eq!(s.count_open().await.unwrap(), 2);

  s.close(a).await.unwrap();
  assert_eq!(s.count_open().await.unwrap(), 2);

  let page = s.list_open(PageQuery::default()).await.unwrap();
  assert!(page.rows.iter().all(|r| r.id != a));
}

#[tokio::test]
async fn second_close_keeps_original_close_date() {
  let s = store().await;
  let id = s.create(notice("a", "x")).await.unwrap();

  s.close(id).await.unwrap();
  let closed_at = s.get(id).await.unwrap().unwrap().closed_at;
  assert!(closed_at.is_some());

  let outcome = s.close(id).await.unwrap();
  assert!(!outcome.is_closed());
  assert_eq!(s.get(id).await.unwrap().unwrap().closed_at, closed_at);
}

#[tokio::test]
async fn closers_on_separate_connections_see_exactly_one_close() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("shared.db");
  let a = SqliteStore::open(&path).await.unwrap();
  let b = SqliteStore::open(&path).await.unwrap();

  for round in 0..20 {
    let id = a.create(notice("a", &format!("round {round}"))).await.unwrap();
    let (x, y) = tokio::join!(a.close(id), b.close(id));

    match (x.unwrap(), y.unwrap()) {
      (
        CloseOutcome::Closed { closed_at: won, .. },
        CloseOutcome::AlreadyClosed { closed_at: lost, .. },
      )
      | (
        CloseOutcome::AlreadyClosed { closed_at: lost, .. },
        CloseOutcome::Closed { closed_at: won, .. },
      ) => assert_eq!(won, lost, "round {round}"),
      other => panic!("round {round}: expected exactly one close, got {other:?}"),
    }
  }

  assert_eq!(b.count_open().await.unwrap(), 0);
}

// ─── Storage errors ──────────────────────────────────────────────────────────

#[tokio::test]
async fn not_null_violation_is_a_constraint_error() {
  let s = store().await;
  let err: Error = s
    .conn
    .call(|conn| {
      conn.execute("INSERT INTO notices (name, message) VALUES (NULL, 'x')", [])?;
      Ok(())
    })
    .await
    .unwrap_err()
    .into();
  assert!(matches!(err, Error::Constraint { .. }), "{err:?}");
  assert!(std::error::Error::source(&err).is_some());
}

#[tokio::test]
async fn database_error_keeps_its_cause() {
  let s = store().await;
  let err: Error = s
    .conn
    .call(|conn| {
      conn.execute("SELECT nonsense FROM nowhere", [])?;
      Ok(())
    })
    .await
    .unwrap_err()
    .into();
  assert!(matches!(err, Error::Database(_)), "{err:?}");
  assert!(std::error::Error::source(&err).is_some());
}

// ─── Schema initialisation and migration ─────────────────────────────────────

#[tokio::test]
async fn fresh_store_is_migrated_to_latest() {
  let s = store().await;
  assert!(matches!(
    s.reconciliation(),
    Reconciliation::Migrated { from: None, to: 1 }
  ));
  assert_eq!(schema_version(&s).await, Some(1));
  assert!(has_parent_column(&s).await);
}

#[tokio::test]
async fn reopening_a_file_is_idempotent() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("notifications.db");

  let first = SqliteStore::open(&path).await.unwrap();
  first.create(notice("Alice", "Hello")).await.unwrap();
  first.create(notice("Bob", "World")).await.unwrap();
  drop(first);

  let second = SqliteStore::open(&path).await.unwrap();
  assert!(matches!(
    second.reconciliation(),
    Reconciliation::UpToDate { version: 1 }
  ));
  assert_eq!(second.count_open().await.unwrap(), 2);
  assert_eq!(table_count(&second, "notices").await, 1);
  assert_eq!(table_count(&second, "versions").await, 1);
  assert_eq!(schema_version(&second).await, Some(1));

  let id = second.create(notice("Carol", "Again")).await.unwrap();
  assert_eq!(id, 3);
}

#[tokio::test]
async fn legacy_file_without_versions_is_migrated_and_keeps_rows() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("legacy.db");

  {
    let conn = rusqlite::Connection::open(&path).unwrap();
    conn
      .execute_batch(
        "CREATE TABLE notices
           (id INTEGER PRIMARY KEY ASC AUTOINCREMENT,
            name TEXT NOT NULL,
            message TEXT NOT NULL,
            postdate DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
            closedate DATETIME DEFAULT NULL);
         INSERT INTO notices (name, message, postdate)
           VALUES ('Old', 'kept', '2012-01-02 03:04:05');",
      )
      .unwrap();
  }

  let s = SqliteStore::open(&path).await.unwrap();
  assert!(matches!(
    s.reconciliation(),
    Reconciliation::Migrated { from: None, to: 1 }
  ));
  assert!(has_parent_column(&s).await);

  let old = s.get(1).await.unwrap().unwrap();
  assert_eq!(old.message, "kept");
  assert_eq!(old.posted_at.to_rfc3339(), "2012-01-02T03:04:05+00:00");
}

#[tokio::test]
async fn failed_migration_is_reported_and_not_recorded() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("half.db");

  // `parent_id` already exists but no version was recorded, so the ALTER
  // fails.
  {
    let conn = rusqlite::Connection::open(&path).unwrap();
    conn
      .execute_batch(
        "CREATE TABLE notices
           (id INTEGER PRIMARY KEY ASC AUTOINCREMENT,
            name TEXT NOT NULL,
            message TEXT NOT NULL,
            postdate DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
            closedate DATETIME DEFAULT NULL,
            parent_id INTEGER);",
      )
      .unwrap();
  }

  let s = SqliteStore::open(&path).await.unwrap();
  assert!(s.reconciliation().is_failed());
  assert!(matches!(
    s.reconciliation().error(),
    Some(Error::Migration { version: 1, .. })
  ));
  assert_eq!(schema_version(&s).await, None);

  // The store still works with the existing layout.
  let id = s.create(notice("a", "b")).await.unwrap();
  assert!(s.close(id).await.unwrap().is_closed());
}
