//! `POST /close` closes a notice and bounces back to the listing.

use axum::{Form, extract::State, response::Redirect};
use notices_core::store::NoticeStore;
use serde::Deserialize;

use crate::{AppState, error::Error};

#[derive(Debug, Deserialize)]
pub struct CloseForm {
  pub entry: Option<String>,
}

/// Redirects to `/?result=<status>&entry=<id>`. An entry that is not an
/// integer cannot name a notice and is reported as `not_found`.
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  Form(form): Form<CloseForm>,
) -> Result<Redirect, Error>
where
  S: NoticeStore,
{
  let Some(id) = form.entry.as_deref().and_then(|e| e.trim().parse::<i64>().ok()) else {
    return Ok(Redirect::to("/?result=not_found"));
  };

  let outcome = state.store.close(id).await.map_err(Error::store)?;
  tracing::info!(id, status = outcome.status(), "close action");

  Ok(Redirect::to(&format!("/?result={}&entry={}", outcome.status(), outcome.id())))
}
