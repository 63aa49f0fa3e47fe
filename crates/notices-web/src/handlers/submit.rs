//! `GET /notify` and `/confirmation`: the submission form and the step that
//! actually creates the notice.

use axum::{
  Form,
  extract::State,
  response::{Html, Redirect},
};
use notices_core::{notice::NewNotice, store::NoticeStore};
use serde::Deserialize;

use crate::{AppState, error::Error, html};

/// `GET /notify`
pub async fn form() -> Html<String> { html::form() }

/// `GET /confirmation`: nothing to confirm, go home.
pub async fn back_to_root() -> Redirect { Redirect::to("/") }

#[derive(Debug, Deserialize)]
pub struct SubmitForm {
  pub name:    Option<String>,
  pub message: Option<String>,
}

/// `POST /confirmation`
pub async fn confirm<S>(
  State(state): State<AppState<S>>,
  Form(form): Form<SubmitForm>,
) -> Result<Html<String>, Error>
where
  S: NoticeStore,
{
  let input = NewNotice::new(form.name, form.message)?;
  let (name, message) = (input.name.clone(), input.message.clone());

  let id = state.store.create(input).await.map_err(Error::store)?;
  tracing::info!(id, "notice submitted");

  Ok(html::confirmation(id, &name, &message))
}
