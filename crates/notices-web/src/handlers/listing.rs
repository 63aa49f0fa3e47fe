//! `GET /` and `GET /{page}`: the open-notice listing.

use axum::{
  extract::{Path, Query, State},
  response::Html,
};
use notices_core::{notice::PageQuery, store::NoticeStore};
use serde::Deserialize;

use crate::{AppState, error::Error, html};

// ─── Pagination ──────────────────────────────────────────────────────────────

/// Navigation for one listing page.
///
/// `page_count` is the store's `floor(open / page_size)`, i.e. the index of
/// the last page that may hold rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
  pub page:       u64,
  pub page_count: u64,
}

impl Pager {
  /// Target of the "previous" link, if any.
  pub fn prev(&self) -> Option<u64> {
    (self.page >= 1).then(|| self.page - 1)
  }

  /// Target of the "next" link, if any.
  pub fn next(&self) -> Option<u64> {
    (self.page < self.page_count).then(|| (self.page + 1).min(self.page_count))
  }

  /// Whether to print "`page` of `page_count` pages".
  pub fn show_position(&self) -> bool { self.page_count > 1 }
}

// ─── Result banner ───────────────────────────────────────────────────────────

/// Query string set by the close redirect. Unparseable values are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct ListingParams {
  pub result: Option<String>,
  pub entry:  Option<String>,
}

impl ListingParams {
  fn entry_id(&self) -> Option<i64> { self.entry.as_deref().and_then(|e| e.parse().ok()) }
}

async fn banner<S>(state: &AppState<S>, params: &ListingParams) -> Result<Option<String>, Error>
where
  S: NoticeStore,
{
  let Some(result) = params.result.as_deref() else {
    return Ok(None);
  };
  let text = match (result, params.entry_id()) {
    ("closed", Some(id)) => format!("Entry {id} closed"),
    ("already_closed", Some(id)) => {
      let closed_at = state
        .store
        .get(id)
        .await
        .map_err(Error::store)?
        .and_then(|n| n.closed_at);
      match closed_at {
        Some(at) => format!("Entry {id} was already closed on {}", html::format_dt(at)),
        None => format!("Entry {id} was already closed"),
      }
    }
    ("not_found", _) => "Bad entry: cannot close".to_owned(),
    _ => return Ok(None),
  };
  Ok(Some(text))
}

// ─── Handlers ────────────────────────────────────────────────────────────────

async fn render<S>(state: &AppState<S>, page: u32, params: &ListingParams) -> Result<Html<String>, Error>
where
  S: NoticeStore,
{
  let query = PageQuery {
    count: state.config.page_size,
    width: state.config.summary_width,
    ..PageQuery::page(page)
  };
  query.validate()?;

  let listing = state.store.list_open(query).await.map_err(Error::store)?;
  let pager = Pager { page: u64::from(page), page_count: listing.page_count };
  let banner = banner(state, params).await?;

  Ok(html::listing(&listing.rows, &pager, banner.as_deref()))
}

/// `GET /`
pub async fn root<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<ListingParams>,
) -> Result<Html<String>, Error>
where
  S: NoticeStore,
{
  render(&state, 0, &params).await
}

/// `GET /{page}`. Only integer pages exist.
pub async fn page<S>(
  State(state): State<AppState<S>>,
  Path(page): Path<String>,
  Query(params): Query<ListingParams>,
) -> Result<Html<String>, Error>
where
  S: NoticeStore,
{
  let page: u32 = page.parse().map_err(|_| Error::NotFound)?;
  render(&state, page, &params).await
}
