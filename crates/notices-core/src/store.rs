//! The `NoticeStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `notices-store-sqlite`).
//! Higher layers (`notices-api`, `notices-web`) depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use crate::{
  lifecycle::CloseOutcome,
  notice::{NewNotice, Notice, OpenPage, PageQuery},
};

/// Abstraction over a notice store backend.
///
/// Notices are never deleted. The only mutation is [`close`](Self::close),
/// which sets the close date at most once.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait NoticeStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Number of notices that have not been closed.
  fn count_open(&self) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// One page of open notices, newest first, with messages cut to
  /// `query.width` characters.
  ///
  /// `page_count` is `floor(count_open / query.count)`.
  fn list_open(
    &self,
    query: PageQuery,
  ) -> impl Future<Output = Result<OpenPage, Self::Error>> + Send + '_;

  /// Persist a new open notice and return its id. The post date is set by
  /// the store.
  fn create(
    &self,
    input: NewNotice,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  /// Close a notice. Never mutates anything unless the outcome is
  /// [`CloseOutcome::Closed`].
  fn close(&self, id: i64) -> impl Future<Output = Result<CloseOutcome, Self::Error>> + Send + '_;

  /// Retrieve a notice with its full message. Returns `None` if not found.
  fn get(&self, id: i64) -> impl Future<Output = Result<Option<Notice>, Self::Error>> + Send + '_;
}
