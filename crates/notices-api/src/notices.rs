//! Handlers for `/notices` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/notices` | Optional `?count`, `offset` (page index), `width` |
//! | `POST` | `/notices` | Body: `{"name":"...","message":"..."}`; returns 201 + `{"id":n}` |
//! | `GET`  | `/notices/count` | `{"open":n}` |
//! | `GET`  | `/notices/:id` | Full notice; 404 if not found |
//! | `POST` | `/notices/:id/close` | 200 on close, 404 if missing, 409 if already closed |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use notices_core::{
  lifecycle::CloseOutcome,
  notice::{NewNotice, Notice, OpenPage, PageQuery},
  store::NoticeStore,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /notices[?count=<n>&offset=<page>&width=<chars>]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(query): Query<PageQuery>,
) -> Result<Json<OpenPage>, ApiError>
where
  S: NoticeStore,
{
  query.validate()?;
  let page = store.list_open(query).await.map_err(ApiError::store)?;
  Ok(Json(page))
}

// ─── Count ────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct OpenCount {
  pub open: u64,
}

/// `GET /notices/count`
pub async fn count<S>(State(store): State<Arc<S>>) -> Result<Json<OpenCount>, ApiError>
where
  S: NoticeStore,
{
  let open = store.count_open().await.map_err(ApiError::store)?;
  Ok(Json(OpenCount { open }))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name:    Option<String>,
  pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Created {
  pub id: i64,
}

/// `POST /notices` with body: `{"name":"Alice","message":"Hello"}`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: NoticeStore,
{
  let input = NewNotice::new(body.name, body.message)?;
  let id = store.create(input).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(Created { id })))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /notices/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Notice>, ApiError>
where
  S: NoticeStore,
{
  let notice = store
    .get(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("notice {id} not found")))?;
  Ok(Json(notice))
}

// ─── Close ────────────────────────────────────────────────────────────────────

/// `POST /notices/:id/close`
pub async fn close_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<CloseOutcome>, ApiError>
where
  S: NoticeStore,
{
  let outcome = store.close(id).await.map_err(ApiError::store)?;
  outcome.into_result()?;
  Ok(Json(outcome))
}
