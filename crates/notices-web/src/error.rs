//! Error types and axum `IntoResponse` implementation.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::html;

#[derive(Debug, Error)]
pub enum Error {
  #[error("not found")]
  NotFound,
  #[error("bad request: {0}")]
  BadRequest(String),
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Error::Store(Box::new(e))
  }
}

impl From<notices_core::Error> for Error {
  fn from(e: notices_core::Error) -> Self {
    match e {
      notices_core::Error::NotFound(_) => Error::NotFound,
      other => Error::BadRequest(other.to_string()),
    }
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let (status, detail) = match &self {
      Error::NotFound => (StatusCode::NOT_FOUND, "Not Found".to_owned()),
      Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
      Error::Store(e) => {
        tracing::error!(error = %e, "store error");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    (status, html::error_page(status, &detail)).into_response()
  }
}
