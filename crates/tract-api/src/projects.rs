//! Handlers for `/projects` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/projects` | Optional `?limit`, `?offset` |
//! | `POST`   | `/projects` | Body: create payload; returns 201 + stored project |
//! | `GET`    | `/projects/{id}` | Served from the details cache when fresh |
//! | `PUT`    | `/projects/{id}` | Body: any subset of fields; invalidates the cache |
//! | `PATCH`  | `/projects/{id}` | Same as `PUT` |
//! | `DELETE` | `/projects/{id}` | 204; invalidates the cache |

use axum::{
  Json,
  extract::{
    Path,
    Query,
    State,
    rejection::{JsonRejection, PathRejection, QueryRejection},
  },
  http::StatusCode,
  response::IntoResponse,
};
use serde::Serialize;
use serde_json::Value;
use tract_core::{
  project::{Project, parse_create, parse_update},
  store::{Page, ProjectStore},
};
use uuid::Uuid;

use crate::{ApiState, cache::details_key, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ListResponse {
  pub items:  Vec<Project>,
  pub total:  u64,
  pub limit:  u32,
  pub offset: u32,
}

/// `GET /projects[?limit=<n>][&offset=<n>]`; `limit` is capped at
/// [`tract_core::store::MAX_PAGE_LIMIT`].
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  query: Result<Query<Page>, QueryRejection>,
) -> Result<Json<ListResponse>, ApiError>
where
  S: ProjectStore,
{
  let Query(page) = query?;
  let page = page.clamped();
  let result = state.store.list(page).await.map_err(ApiError::from_store)?;
  Ok(Json(ListResponse {
    items:  result.items,
    total:  result.total,
    limit:  page.limit,
    offset: page.offset,
  }))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /projects`: returns 201 + the stored [`Project`].
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ProjectStore,
{
  let Json(body) = body?;
  let input = parse_create(body)?;

  let project = state
    .store
    .create(input)
    .await
    .map_err(ApiError::from_store)?;

  tracing::info!(project_id = %project.id, name = %project.name, "project created");
  Ok((StatusCode::CREATED, Json(project)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /projects/{id}`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Project>, ApiError>
where
  S: ProjectStore,
{
  let Path(id) = path?;
  let key = details_key(id);
  if let Some(project) = state.cache.get(&key) {
    tracing::debug!(project_id = %id, "details cache hit");
    return Ok(Json(project));
  }

  let generation = state.cache.generation();
  let project = state
    .store
    .get(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or(ApiError::NotFound(id))?;

  if !state.cache.set_if_current(key, project.clone(), generation) {
    tracing::debug!(project_id = %id, "details cache fill skipped after invalidation");
  }
  Ok(Json(project))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT|PATCH /projects/{id}`: only the supplied fields are written.
pub async fn update<S>(
  State(state): State<ApiState<S>>,
  path: Result<Path<Uuid>, PathRejection>,
  body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Project>, ApiError>
where
  S: ProjectStore,
{
  let Path(id) = path?;
  let Json(body) = body?;
  let patch = parse_update(body)?;

  let project = state
    .store
    .update(id, patch)
    .await
    .map_err(ApiError::from_store)?
    .ok_or(ApiError::NotFound(id))?;

  state.cache.clear(Some(&details_key(id)));
  tracing::info!(project_id = %id, "project updated");
  Ok(Json(project))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /projects/{id}`
pub async fn delete_one<S>(
  State(state): State<ApiState<S>>,
  path: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, ApiError>
where
  S: ProjectStore,
{
  let Path(id) = path?;
  let removed = state.store.delete(id).await.map_err(ApiError::from_store)?;
  if !removed {
    return Err(ApiError::NotFound(id));
  }

  state.cache.clear(Some(&details_key(id)));
  tracing::info!(project_id = %id, "project deleted");
  Ok(StatusCode::NO_CONTENT)
}
