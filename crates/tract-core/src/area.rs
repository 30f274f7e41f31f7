//! The GeoJSON-like feature describing a project's area of interest.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
  Result,
  error::{GeometryError, ValidationError},
  geometry::MultiPolygon,
};

/// An area of interest as it arrives on the wire, before its geometry has
/// been validated.
#[derive(Debug, Clone, Deserialize)]
pub struct RawAreaOfInterest {
  #[serde(rename = "type")]
  pub kind:       String,
  #[serde(default)]
  pub properties: Map<String, Value>,
  pub geometry:   Value,
}

/// A feature descriptor whose geometry is a validated [`MultiPolygon`].
///
/// `kind` is a free-form label (usually `"Feature"`) and is not checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawAreaOfInterest")]
pub struct AreaOfInterest {
  #[serde(rename = "type")]
  pub kind:       String,
  pub properties: Map<String, Value>,
  pub geometry:   MultiPolygon,
}

impl TryFrom<RawAreaOfInterest> for AreaOfInterest {
  type Error = GeometryError;

  fn try_from(raw: RawAreaOfInterest) -> Result<Self, Self::Error> {
    Ok(Self {
      kind:       raw.kind,
      properties: raw.properties,
      geometry:   MultiPolygon::from_value(raw.geometry)?,
    })
  }
}

impl AreaOfInterest {
  /// Serialise for storage as an opaque JSON blob.
  pub fn to_json(&self) -> Result<String> { Ok(serde_json::to_string(self)?) }

  /// Decode a stored blob, re-running the geometry validator.
  pub fn from_json(s: &str) -> Result<Self> {
    let raw: RawAreaOfInterest = serde_json::from_str(s)?;
    Ok(Self::try_from(raw).map_err(ValidationError::from)?)
  }
}
