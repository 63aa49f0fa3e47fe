//! HTML front end for the notice board.
//!
//! Exposes an axum [`Router`] serving the listing, submission and close
//! pages backed by any [`NoticeStore`], with the JSON API from
//! [`notices_api`] mounted under `/api`.

pub mod error;
pub mod handlers;
pub mod html;
pub mod settings;

pub use error::Error;
pub use settings::ServerConfig;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use notices_core::store::NoticeStore;
use notices_store_sqlite::Reconciliation;
use tower_http::trace::TraceLayer;

use handlers::{close, listing, submit};

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: NoticeStore> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router: HTML pages plus `/api`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: NoticeStore + Clone + 'static,
{
  let api = notices_api::api_router(state.store.clone());

  Router::new()
    .route("/",             get(listing::root::<S>))
    .route("/{page}",       get(listing::page::<S>))
    .route("/notify",       get(submit::form))
    .route("/confirmation", get(submit::back_to_root).post(submit::confirm::<S>))
    .route("/close",        post(close::handler::<S>))
    .with_state(state)
    .nest("/api", api)
    .layer(TraceLayer::new_for_http())
}

// ─── Startup ──────────────────────────────────────────────────────────────────

/// The schema of the opened store could not be brought up to date.
#[derive(Debug, thiserror::Error)]
#[error("schema migration failed: {0}")]
pub struct SchemaError(String);

/// Decide whether the server may start on a store opened with
/// `reconciliation`. A failed migration is fatal when `strict`; otherwise it
/// is logged and the old layout is served.
pub fn check_schema(reconciliation: &Reconciliation, strict: bool) -> Result<(), SchemaError> {
  if !reconciliation.is_failed() {
    return Ok(());
  }
  let detail = reconciliation
    .error()
    .map(ToString::to_string)
    .unwrap_or_default();

  if strict {
    return Err(SchemaError(detail));
  }
  tracing::warn!(error = %detail, "continuing with the un-migrated schema");
  Ok(())
}
