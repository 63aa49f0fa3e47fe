//! SQLite backend for the notice board.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. The [`backup`] module snapshots the
//! same database file through the external `sqlite3` tool.

mod encode;
mod schema;
mod store;

pub mod backup;
pub mod error;

pub use error::{Error, Result};
pub use store::{Reconciliation, SqliteStore};

#[cfg(test)]
mod tests;
