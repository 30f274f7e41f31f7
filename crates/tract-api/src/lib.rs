//! JSON REST API for Tract.
//!
//! Exposes an axum [`Router`] backed by any [`tract_core::store::ProjectStore`].
//! CORS, TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", tract_api::api_router(state))
//! ```

pub mod cache;
pub mod error;
pub mod projects;

use std::sync::Arc;

use axum::{Router, routing::get};
use tract_core::{project::Project, store::ProjectStore};

pub use cache::TtlCache;
pub use error::ApiError;

/// Shared state threaded through all handlers.
pub struct ApiState<S> {
  pub store: Arc<S>,
  pub cache: Arc<TtlCache<Project>>,
}

impl<S> ApiState<S> {
  pub fn new(store: Arc<S>, cache: TtlCache<Project>) -> Self {
    Self {
      store,
      cache: Arc::new(cache),
    }
  }
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      store: Arc::clone(&self.store),
      cache: Arc::clone(&self.cache),
    }
  }
}

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: ProjectStore + 'static,
{
  Router::new()
    .route(
      "/projects",
      get(projects::list::<S>).post(projects::create::<S>),
    )
    .route(
      "/projects/{id}",
      get(projects::get_one::<S>)
        .put(projects::update::<S>)
        .patch(projects::update::<S>)
        .delete(projects::delete_one::<S>),
    )
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use serde_json::{Value, json};
  use tower::ServiceExt as _;
  use tract_core::store::ProjectStore as _;
  use tract_store_sqlite::{SqliteStore, StoreOptions};
  use uuid::Uuid;

  async fn make_state() -> ApiState<SqliteStore> {
    let store = SqliteStore::open_in_memory(StoreOptions::default())
      .await
      .unwrap();
    ApiState::new(Arc::new(store), TtlCache::default())
  }

  async fn send(
    state:  ApiState<SqliteStore>,
    method: &str,
    uri:    &str,
    body:   Option<&str>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
    }
    let req = builder
      .body(Body::from(body.unwrap_or_default().to_owned()))
      .unwrap();

    let resp   = api_router(state).oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes  = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    let value  = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
  }

  fn payload(start: &str, end: &str, ring: Value) -> String {
    json!({
      "name": "P",
      "description": "pilot",
      "start_date": start,
      "end_date": end,
      "area_of_interest": {
        "type": "Feature",
        "properties": {},
        "geometry": { "type": "MultiPolygon", "coordinates": [[ring]] },
      },
    })
    .to_string()
  }

  fn square() -> Value { json!([[0, 0], [0, 1], [1, 1], [1, 0]]) }

  async fn create(state: &ApiState<SqliteStore>) -> Uuid {
    let body = payload("2024-01-01", "2024-01-31", square());
    let (status, project) =
      send(state.clone(), "POST", "/projects", Some(&body)).await;
    assert_eq!(status, StatusCode::CREATED, "{project}");
    project["id"].as_str().unwrap().parse().unwrap()
  }

  fn first_error(body: &Value) -> &str { body["errors"][0].as_str().unwrap() }

  // ── Create ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_returns_201_with_generated_id() {
    let state = make_state().await;
    let body  = payload("2024-01-01", "2024-01-31", square());

    let (status, project) = send(state, "POST", "/projects", Some(&body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(project["id"].as_str().unwrap().parse::<Uuid>().is_ok());
    assert_eq!(project["name"], "P");
    assert_eq!(project["start_date"], "2024-01-01");
    assert_eq!(
      project["area_of_interest"]["geometry"]["type"],
      "MultiPolygon"
    );
  }

  #[tokio::test]
  async fn create_with_end_before_start_returns_422() {
    let state = make_state().await;
    let body  = payload("2024-01-10", "2024-01-01", square());

    let (status, err) = send(state, "POST", "/projects", Some(&body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(first_error(&err), "end_date must be after start_date");
  }

  #[tokio::test]
  async fn create_with_three_point_ring_returns_422() {
    let state = make_state().await;
    let body  = payload("2024-01-01", "2024-01-10", json!([[0, 0], [0, 1], [1, 1]]));

    let (status, err) = send(state, "POST", "/projects", Some(&body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(first_error(&err).starts_with("Invalid 'MultiPolygon' structure"));
  }

  #[tokio::test]
  async fn create_with_polygon_geometry_returns_422() {
    let state = make_state().await;
    let body  = json!({
      "name": "P",
      "start_date": "2024-01-01",
      "end_date": "2024-01-10",
      "area_of_interest": {
        "type": "Feature",
        "geometry": { "type": "Polygon", "coordinates": [square()] },
      },
    })
    .to_string();

    let (status, err) = send(state, "POST", "/projects", Some(&body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
      first_error(&err),
      "Only 'MultiPolygon' geometry type is allowed"
    );
  }

  #[tokio::test]
  async fn create_with_invalid_json_returns_422() {
    let state = make_state().await;
    let (status, err) =
      send(state, "POST", "/projects", Some("{\"name\": ")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(!first_error(&err).is_empty());
  }

  // ── Get ─────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn get_nonexistent_returns_404_project_not_found() {
    let state = make_state().await;
    let uri   = format!("/projects/{}", Uuid::new_v4());

    let (status, err) = send(state, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err, json!({ "errors": ["PROJECT_NOT_FOUND"] }));
  }

  #[tokio::test]
  async fn get_returns_created_project() {
    let state = make_state().await;
    let id    = create(&state).await;

    let (status, project) =
      send(state, "GET", &format!("/projects/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(project["id"], id.to_string());
    assert_eq!(project["description"], "pilot");
  }

  #[tokio::test]
  async fn get_is_served_from_cache() {
    let state = make_state().await;
    let id    = create(&state).await;
    let uri   = format!("/projects/{id}");

    let (status, _) = send(state.clone(), "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(state.cache.get(&cache::details_key(id)).is_some());

    // Removed behind the API's back: the cached copy is still served.
    assert!(state.store.delete(id).await.unwrap());
    let (status, project) = send(state, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(project["id"], id.to_string());
  }

  // ── Update ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn update_invalidates_cached_details() {
    let state = make_state().await;
    let id    = create(&state).await;
    let uri   = format!("/projects/{id}");

    send(state.clone(), "GET", &uri, None).await;

    let (status, updated) = send(
      state.clone(),
      "PUT",
      &uri,
      Some(r#"{"name": "Renamed", "description": null}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Renamed");
    assert_eq!(updated["description"], Value::Null);
    assert_eq!(updated["start_date"], "2024-01-01");

    let (_, fetched) = send(state, "GET", &uri, None).await;
    assert_eq!(fetched["name"], "Renamed");
  }

  #[tokio::test]
  async fn update_with_both_dates_reversed_returns_422() {
    let state = make_state().await;
    let id    = create(&state).await;

    let (status, err) = send(
      state,
      "PATCH",
      &format!("/projects/{id}"),
      Some(r#"{"start_date": "2024-03-01", "end_date": "2024-02-01"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(first_error(&err), "end_date must be after start_date");
  }

  #[tokio::test]
  async fn update_start_only_past_stored_end_returns_400() {
    let state = make_state().await;
    let id    = create(&state).await;

    // Passes input validation; the storage constraint rejects it.
    let (status, err) = send(
      state,
      "PATCH",
      &format!("/projects/{id}"),
      Some(r#"{"start_date": "2030-01-01"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
      first_error(&err),
      "start_date must not be later than end_date"
    );
  }

  #[tokio::test]
  async fn update_nonexistent_returns_404() {
    let state = make_state().await;
    let (status, err) = send(
      state,
      "PUT",
      &format!("/projects/{}", Uuid::new_v4()),
      Some(r#"{"name": "Ghost"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(first_error(&err), "PROJECT_NOT_FOUND");
  }

  // ── Delete ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn delete_returns_204_then_404() {
    let state = make_state().await;
    let id    = create(&state).await;
    let uri   = format!("/projects/{id}");

    send(state.clone(), "GET", &uri, None).await;

    let (status, _) = send(state.clone(), "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(state.cache.get(&cache::details_key(id)).is_none());

    let (status, _) = send(state.clone(), "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(state, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── List ────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn list_reports_total_and_window() {
    let state = make_state().await;
    for _ in 0..3 {
      create(&state).await;
    }

    let (status, page) =
      send(state, "GET", "/projects?limit=2&offset=1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 3);
    assert_eq!(page["limit"], 2);
    assert_eq!(page["offset"], 1);
    assert_eq!(page["items"].as_array().unwrap().len(), 2);
  }

  #[tokio::test]
  async fn list_caps_oversized_limit() {
    let state = make_state().await;
    create(&state).await;

    let (status, page) =
      send(state, "GET", "/projects?limit=4294967295", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["limit"], tract_core::store::MAX_PAGE_LIMIT);
    assert_eq!(page["items"].as_array().unwrap().len(), 1);
  }

  // ── Malformed request parts ─────────────────────────────────────────────────

  #[tokio::test]
  async fn malformed_id_returns_422_envelope() {
    let state = make_state().await;

    for method in ["GET", "DELETE"] {
      let (status, err) =
        send(state.clone(), method, "/projects/not-a-uuid", None).await;
      assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{method}");
      assert!(!first_error(&err).is_empty(), "{method}: {err}");
    }

    let (status, err) = send(
      state,
      "PATCH",
      "/projects/not-a-uuid",
      Some(r#"{"name": "X"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(!first_error(&err).is_empty());
  }

  #[tokio::test]
  async fn malformed_query_returns_422_envelope() {
    let state = make_state().await;
    let (status, err) = send(state, "GET", "/projects?limit=-1", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(!first_error(&err).is_empty(), "{err}");
  }

  #[tokio::test]
  async fn five_digit_year_returns_422() {
    let state = make_state().await;
    let body  = payload("9999-12-31", "+10000-01-01", square());

    let (status, err) = send(state, "POST", "/projects", Some(&body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(first_error(&err).contains("invalid date"), "{err}");
  }
}
