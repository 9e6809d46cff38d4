//! Handlers for `/groups` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/groups` | Sorted by name |
//! | `POST`   | `/groups` | Body: `{"name":"..."}`; returns 201 + `{"id":..}` |
//! | `POST`   | `/groups/rename` | Body: `{"old_name":"..","new_name":".."}` |
//! | `DELETE` | `/groups/:id` | `?name=` must be the group's current name |
//! | `POST`   | `/groups/clean` | Orphaned-membership sweep |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use rememberall_core::{
  group::{Group, GroupId},
  store::ContactStore,
};
use serde::{Deserialize, Serialize};

use crate::{Affected, Created, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /groups`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Group>>, ApiError>
where
  S: ContactStore,
{
  let groups = store.list_groups().await.map_err(ApiError::from_store)?;
  Ok(Json(groups))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name: String,
}

/// `POST /groups`: body: `{"name":"Family"}`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ContactStore,
{
  let id = store.add_group(body.name).await.map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(Created { id })))
}

// ─── Rename ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RenameBody {
  pub old_name: String,
  pub new_name: String,
}

/// `POST /groups/rename`
pub async fn rename<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<RenameBody>,
) -> Result<Json<Affected>, ApiError>
where
  S: ContactStore,
{
  let affected = store
    .rename_group(body.old_name, body.new_name)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(Affected { affected }))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct DeleteParams {
  pub name: String,
}

/// `DELETE /groups/:id?name=<current name>`
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<GroupId>,
  Query(params): Query<DeleteParams>,
) -> Result<Json<Affected>, ApiError>
where
  S: ContactStore,
{
  let affected = store
    .delete_group(id, params.name)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(Affected { affected }))
}

// ─── Clean ────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct Removed {
  pub removed: u64,
}

/// `POST /groups/clean`
pub async fn clean<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Removed>, ApiError>
where
  S: ContactStore,
{
  let removed = store
    .clean_orphaned_memberships()
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(Removed { removed }))
}
