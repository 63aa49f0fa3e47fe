//! SQL schema for the notice store.
//!
//! The base tables are created with `CREATE TABLE IF NOT EXISTS` on every
//! open. Later structural changes are gated on the `schema` row of the
//! `versions` table and applied from [`MIGRATIONS`].

/// Base notice table, as created by the very first release.
pub const NOTICES_TABLE: &str = "
CREATE TABLE IF NOT EXISTS notices (
    id        INTEGER PRIMARY KEY ASC AUTOINCREMENT,
    name      TEXT NOT NULL,
    message   TEXT NOT NULL,
    postdate  DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
    closedate DATETIME DEFAULT NULL  -- NULL while open
);
";

/// Per-component version bookkeeping.
pub const VERSIONS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS versions (
    component TEXT UNIQUE NOT NULL,
    version   INTEGER NOT NULL
);
";

/// The `versions.component` row that tracks the table layout.
pub const SCHEMA_COMPONENT: &str = "schema";

#[derive(Debug, Clone, Copy)]
pub struct Migration {
  pub version: u32,
  pub sql:     &'static str,
}

/// Registered migrations, in strictly increasing version order.
pub const MIGRATIONS: &[Migration] = &[
  // `parent_id` is carried in the table but never written or read.
  Migration {
    version: 1,
    sql:     "ALTER TABLE notices ADD COLUMN parent_id INTEGER;",
  },
];

/// The latest schema version known by this binary.
pub fn latest_version() -> u32 {
  MIGRATIONS.last().map_or(0, |migration| migration.version)
}
