//! Handlers for `/people/:id/notes` endpoints.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use rememberall_core::{note::Note, person::PersonId, store::ContactStore};
use serde::Deserialize;

use crate::{Created, error::ApiError};

/// `GET /people/:id/notes`: newest first.
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Path(person_id): Path<PersonId>,
) -> Result<Json<Vec<Note>>, ApiError>
where
  S: ContactStore,
{
  let notes = store
    .list_notes_by_person(person_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(notes))
}

/// `GET /people/:id/notes/latest`
pub async fn latest<S>(
  State(store): State<Arc<S>>,
  Path(person_id): Path<PersonId>,
) -> Result<Json<Note>, ApiError>
where
  S: ContactStore,
{
  let note = store
    .latest_note(person_id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| {
      ApiError::NotFound(format!("person {person_id} has no notes"))
    })?;
  Ok(Json(note))
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub content: String,
}

/// `POST /people/:id/notes`: body: `{"content":"..."}`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Path(person_id): Path<PersonId>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ContactStore,
{
  let id = store
    .add_note(person_id, body.content)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(Created { id })))
}
