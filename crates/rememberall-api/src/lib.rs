//! JSON REST API for RememberAll.
//!
//! Exposes an axum [`Router`] backed by any
//! [`rememberall_core::store::ContactStore`]. Transport concerns (binding,
//! tracing layers) are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", rememberall_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod groups;
pub mod notes;
pub mod people;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, post},
};
use rememberall_core::store::ContactStore;
use serde::{Deserialize, Serialize};

pub use error::ApiError;

/// Response body for a create: the store-generated id.
#[derive(Debug, Serialize, Deserialize)]
pub struct Created<T> {
  pub id: T,
}

/// Response body for an update or delete: how many records changed.
#[derive(Debug, Serialize, Deserialize)]
pub struct Affected {
  pub affected: u64,
}

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: ContactStore + Clone + Send + Sync + 'static,
{
  Router::new()
    // Groups
    .route("/groups", get(groups::list::<S>).post(groups::create::<S>))
    .route("/groups/rename", post(groups::rename::<S>))
    .route("/groups/clean", post(groups::clean::<S>))
    .route("/groups/{id}", delete(groups::delete_one::<S>))
    // People
    .route("/people", get(people::list::<S>).post(people::create::<S>))
    .route(
      "/people/{id}",
      get(people::get_one::<S>)
        .put(people::update::<S>)
        .delete(people::delete_one::<S>),
    )
    // Notes
    .route(
      "/people/{id}/notes",
      get(notes::list::<S>).post(notes::create::<S>),
    )
    .route("/people/{id}/notes/latest", get(notes::latest::<S>))
    .with_state(store)
}
