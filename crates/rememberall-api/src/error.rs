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

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Classify a backend error by the domain error it carries, if any.
  ///
  /// Backends wrap [`rememberall_core::Error`] either directly or as the
  /// `source()` of their own error type; anything else is a store failure.
  pub fn from_store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    let as_dyn: &(dyn std::error::Error + 'static) = &err;
    let domain = as_dyn
      .downcast_ref::<rememberall_core::Error>()
      .or_else(|| {
        as_dyn
          .source()
          .and_then(|s| s.downcast_ref::<rememberall_core::Error>())
      })
      .map(|e| (e.is_not_found(), e.is_conflict(), e.to_string()));

    match domain {
      Some((true, _, msg)) => ApiError::NotFound(msg),
      Some((_, true, msg)) => ApiError::Conflict(msg),
      Some((_, _, msg)) => ApiError::BadRequest(msg),
      None => ApiError::Store(Box::new(err)),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
