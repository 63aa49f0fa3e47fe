//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  /// The request conflicts with the notice's current state.
  #[error("conflict: {message}")]
  Conflict {
    message: String,
    details: serde_json::Value,
  },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    ApiError::Store(Box::new(e))
  }
}

impl From<notices_core::Error> for ApiError {
  fn from(e: notices_core::Error) -> Self {
    use notices_core::Error;
    match e {
      Error::Validation(m) => ApiError::BadRequest(m),
      Error::NotFound(id) => ApiError::NotFound(format!("notice {id} not found")),
      Error::AlreadyClosed { id, closed_at } => ApiError::Conflict {
        message: format!("notice {id} was already closed on {closed_at}"),
        details: json!({ "id": id, "closed_at": closed_at }),
      },
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, body) = match self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, json!({ "error": m })),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, json!({ "error": m })),
      ApiError::Conflict { message, details } => {
        (StatusCode::CONFLICT, json!({ "error": message, "notice": details }))
      }
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store error");
        (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": e.to_string() }))
      }
    };
    (status, Json(body)).into_response()
  }
}
