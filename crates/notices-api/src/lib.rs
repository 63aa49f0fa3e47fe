//! JSON REST API for the notice board.
//!
//! Exposes an axum [`Router`] backed by any [`notices_core::store::NoticeStore`].
//! Transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", notices_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod notices;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use notices_core::store::NoticeStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: NoticeStore + 'static,
{
  Router::new()
    .route("/notices", get(notices::list::<S>).post(notices::create::<S>))
    .route("/notices/count", get(notices::count::<S>))
    .route("/notices/{id}", get(notices::get_one::<S>))
    .route("/notices/{id}/close", post(notices::close_one::<S>))
    .with_state(store)
}
