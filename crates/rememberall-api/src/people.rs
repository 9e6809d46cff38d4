//! Handlers for `/people` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/people` | Optional `q` (name/notes text) and `group` filters |
//! | `POST`   | `/people` | Body: `{"name":"..","groups":"A,B"}`; returns 201 + `{"id":..}` |
//! | `GET`    | `/people/:id` | 404 if not found |
//! | `PUT`    | `/people/:id` | Body as for `POST`; returns `{"affected":..}` |
//! | `DELETE` | `/people/:id` | Also removes the person's notes |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use rememberall_core::{
  person::{Person, PersonEntry, PersonId, PersonInput},
  search::PersonFilter,
  store::ContactStore,
};
use serde::Deserialize;

use crate::{Affected, Created, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// Case-insensitive text matched against names and notes.
  pub q:     Option<String>,
  /// Only members of this group.
  pub group: Option<String>,
}

/// `GET /people[?q=...][&group=...]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<PersonEntry>>, ApiError>
where
  S: ContactStore,
{
  let filter = PersonFilter { text: params.q, group: params.group };
  let people = store
    .search_people(&filter)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(people))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /people/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<PersonId>,
) -> Result<Json<Person>, ApiError>
where
  S: ContactStore,
{
  let person = store
    .get_person(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("person {id} not found")))?;
  Ok(Json(person))
}

// ─── Create / update ──────────────────────────────────────────────────────────

/// JSON body accepted by `POST /people` and `PUT /people/:id`.
#[derive(Debug, Deserialize)]
pub struct PersonBody {
  #[serde(default)]
  pub name:   String,
  /// Comma-joined group names.
  #[serde(default)]
  pub groups: String,
}

impl From<PersonBody> for PersonInput {
  fn from(b: PersonBody) -> Self { PersonInput::new(b.name, &b.groups) }
}

/// `POST /people`: returns 201 + `{"id":..}`.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<PersonBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ContactStore,
{
  let id = store
    .add_person(PersonInput::from(body))
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(Created { id })))
}

/// `PUT /people/:id`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<PersonId>,
  Json(body): Json<PersonBody>,
) -> Result<Json<Affected>, ApiError>
where
  S: ContactStore,
{
  let affected = store
    .update_person(id, PersonInput::from(body))
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(Affected { affected }))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /people/:id`
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<PersonId>,
) -> Result<Json<Affected>, ApiError>
where
  S: ContactStore,
{
  let affected = store.delete_person(id).await.map_err(ApiError::from_store)?;
  Ok(Json(Affected { affected }))
}
