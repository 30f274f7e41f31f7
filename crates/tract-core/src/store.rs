//! The `ProjectStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `tract-store-sqlite`).
//! The HTTP layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  error::IntegrityViolation,
  project::{NewProject, Project, ProjectPatch},
};

// ─── Pagination ──────────────────────────────────────────────────────────────

pub const DEFAULT_PAGE_LIMIT: u32 = 100;
pub const MAX_PAGE_LIMIT: u32 = DEFAULT_PAGE_LIMIT * 10;

/// Window over the collection, in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Page {
  #[serde(default = "default_limit")]
  pub limit:  u32,
  #[serde(default)]
  pub offset: u32,
}

fn default_limit() -> u32 { DEFAULT_PAGE_LIMIT }

impl Page {
  /// The same window with `limit` capped at [`MAX_PAGE_LIMIT`].
  pub fn clamped(self) -> Self {
    Self {
      limit: self.limit.min(MAX_PAGE_LIMIT),
      ..self
    }
  }
}

impl Default for Page {
  fn default() -> Self {
    Self {
      limit:  DEFAULT_PAGE_LIMIT,
      offset: 0,
    }
  }
}

/// One page of projects plus the size of the whole collection.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectPage {
  pub items: Vec<Project>,
  pub total: u64,
}

// ─── Error classification ────────────────────────────────────────────────────

/// Lets callers tell a persisted-constraint violation apart from any other
/// backend failure without knowing the backend's error type.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn integrity_violation(&self) -> Option<IntegrityViolation>;
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a project store backend.
///
/// Stores enforce `start_date <= end_date` themselves and never rely on the
/// caller having validated its input.
pub trait ProjectStore: Send + Sync {
  type Error: StoreError;

  /// Persist a new project and return it with its generated id.
  fn create(
    &self,
    input: NewProject,
  ) -> impl Future<Output = Result<Project, Self::Error>> + Send + '_;

  /// Retrieve a project by id. Returns `None` if not found.
  fn get(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Project>, Self::Error>> + Send + '_;

  /// Apply the supplied fields of `patch` in place. Returns `None` if the
  /// project does not exist.
  fn update(
    &self,
    id: Uuid,
    patch: ProjectPatch,
  ) -> impl Future<Output = Result<Option<Project>, Self::Error>> + Send + '_;

  /// Remove a project. Returns `false` if it did not exist.
  fn delete(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// List one page of projects together with the total count.
  fn list(
    &self,
    page: Page,
  ) -> impl Future<Output = Result<ProjectPage, Self::Error>> + Send + '_;
}
