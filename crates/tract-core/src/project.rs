//! Project records and the request shapes that create and modify them.
//!
//! Incoming payloads are decoded into [`CreateProject`] / [`UpdateProject`]
//! with the area of interest still raw, then validated field by field into a
//! [`NewProject`] or [`ProjectPatch`] that a store can persist.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::{
  area::{AreaOfInterest, RawAreaOfInterest},
  date,
  error::ValidationError,
  validate::{check_date_range, check_name},
};

// ─── Persisted entity ────────────────────────────────────────────────────────

/// A stored project. `id` is assigned by the store and never changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Project {
  pub id:               Uuid,
  pub name:             String,
  pub description:      Option<String>,
  pub start_date:       NaiveDate,
  pub end_date:         NaiveDate,
  pub area_of_interest: AreaOfInterest,
}

/// Validated input to [`crate::store::ProjectStore::create`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewProject {
  pub name:             String,
  pub description:      Option<String>,
  pub start_date:       NaiveDate,
  pub end_date:         NaiveDate,
  pub area_of_interest: AreaOfInterest,
}

/// Validated input to [`crate::store::ProjectStore::update`]. Only the fields
/// that are `Some` are written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectPatch {
  pub name:             Option<String>,
  /// `Some(None)` clears the description.
  pub description:      Option<Option<String>>,
  pub start_date:       Option<NaiveDate>,
  pub end_date:         Option<NaiveDate>,
  pub area_of_interest: Option<AreaOfInterest>,
}

impl ProjectPatch {
  pub fn is_empty(&self) -> bool { *self == Self::default() }
}

// ─── Request bodies ──────────────────────────────────────────────────────────

/// Body of a create request.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
  pub name:             String,
  #[serde(default)]
  pub description:      Option<String>,
  #[serde(deserialize_with = "date::deserialize")]
  pub start_date:       NaiveDate,
  #[serde(deserialize_with = "date::deserialize")]
  pub end_date:         NaiveDate,
  pub area_of_interest: RawAreaOfInterest,
}

impl CreateProject {
  /// Check the name, then the date range, then the geometry.
  pub fn validate(self) -> Result<NewProject, ValidationError> {
    check_name(&self.name)?;
    check_date_range(Some(self.start_date), Some(self.end_date))?;
    let area_of_interest = AreaOfInterest::try_from(self.area_of_interest)?;

    Ok(NewProject {
      name: self.name,
      description: self.description,
      start_date: self.start_date,
      end_date: self.end_date,
      area_of_interest,
    })
  }
}

/// Body of an update request; every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProject {
  #[serde(default)]
  pub name:             Option<String>,
  #[serde(default, deserialize_with = "present")]
  pub description:      Option<Option<String>>,
  #[serde(default, deserialize_with = "date::deserialize_opt")]
  pub start_date:       Option<NaiveDate>,
  #[serde(default, deserialize_with = "date::deserialize_opt")]
  pub end_date:         Option<NaiveDate>,
  #[serde(default)]
  pub area_of_interest: Option<RawAreaOfInterest>,
}

impl UpdateProject {
  /// Validate only the fields that were supplied. The date range is compared
  /// only when both bounds are present in this payload.
  pub fn validate(self) -> Result<ProjectPatch, ValidationError> {
    if let Some(name) = &self.name {
      check_name(name)?;
    }
    check_date_range(self.start_date, self.end_date)?;
    let area_of_interest = self
      .area_of_interest
      .map(AreaOfInterest::try_from)
      .transpose()?;

    Ok(ProjectPatch {
      name: self.name,
      description: self.description,
      start_date: self.start_date,
      end_date: self.end_date,
      area_of_interest,
    })
  }
}

/// Distinguish an explicit `null` (`Some(None)`) from an absent field (`None`).
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  T::deserialize(deserializer).map(Some)
}

// ─── Entry points ────────────────────────────────────────────────────────────

/// Decode and validate an arbitrary JSON create payload.
pub fn parse_create(body: Value) -> Result<NewProject, ValidationError> {
  serde_json::from_value::<CreateProject>(body)
    .map_err(|e| ValidationError::Malformed(e.to_string()))?
    .validate()
}

/// Decode and validate an arbitrary JSON update payload.
pub fn parse_update(body: Value) -> Result<ProjectPatch, ValidationError> {
  serde_json::from_value::<UpdateProject>(body)
    .map_err(|e| ValidationError::Malformed(e.to_string()))?
    .validate()
}
