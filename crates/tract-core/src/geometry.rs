//! GeoJSON `MultiPolygon` geometry and its structural validator.
//!
//! Only the nesting shape is checked: a multipolygon is an array of polygons,
//! a polygon is an array of rings, and a ring is an array of at least
//! [`MIN_RING_POINTS`] points. Points themselves are kept as opaque JSON; their
//! arity, closure and coordinate ranges are not inspected.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::GeometryError;

/// Fewest points a ring may carry.
pub const MIN_RING_POINTS: usize = 4;

/// One boundary loop of a polygon.
pub type Ring = Vec<Value>;

/// An outer boundary followed by zero or more holes.
pub type Polygon = Vec<Ring>;

// ─── Validator ───────────────────────────────────────────────────────────────

/// Decide whether `raw` is a structurally valid `MultiPolygon` geometry.
///
/// Runs on the untyped JSON so completely malformed shapes are rejected with a
/// specific reason rather than a generic deserialisation failure. An empty
/// `coordinates` array, or a polygon with no rings, passes vacuously.
pub fn validate_geometry(raw: &Value) -> Result<(), GeometryError> {
  let object = raw.as_object().ok_or(GeometryError::NotAnObject)?;

  if object.get("type").and_then(Value::as_str) != Some("MultiPolygon") {
    return Err(GeometryError::UnsupportedType);
  }

  let polygons = object
    .get("coordinates")
    .and_then(Value::as_array)
    .ok_or(GeometryError::MissingCoordinates)?;

  let well_formed = polygons.iter().all(|polygon| {
    polygon.as_array().is_some_and(|rings| {
      rings.iter().all(|ring| {
        ring
          .as_array()
          .is_some_and(|points| points.len() >= MIN_RING_POINTS)
      })
    })
  });

  if !well_formed {
    return Err(GeometryError::InvalidStructure);
  }
  Ok(())
}

// ─── Typed geometry ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GeometryType {
  MultiPolygon,
}

/// A validated `MultiPolygon`. The only way to obtain one is through
/// [`MultiPolygon::from_value`], which serde deserialisation also routes
/// through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct MultiPolygon {
  #[serde(rename = "type")]
  kind:            GeometryType,
  pub coordinates: Vec<Polygon>,
  /// Any other members of the source object (`bbox`, foreign members).
  #[serde(flatten)]
  pub extra:       Map<String, Value>,
}

impl MultiPolygon {
  /// Validate `raw` and take it apart into a typed geometry.
  pub fn from_value(raw: Value) -> Result<Self, GeometryError> {
    validate_geometry(&raw)?;

    let Value::Object(mut object) = raw else {
      return Err(GeometryError::NotAnObject);
    };
    object.remove("type");

    let coordinates = match object.remove("coordinates") {
      Some(Value::Array(polygons)) => polygons
        .into_iter()
        .map(into_polygon)
        .collect::<Option<Vec<_>>>(),
      _ => None,
    }
    .ok_or(GeometryError::InvalidStructure)?;

    Ok(Self {
      kind: GeometryType::MultiPolygon,
      coordinates,
      extra: object,
    })
  }

  pub fn kind(&self) -> GeometryType { self.kind }
}

impl TryFrom<Value> for MultiPolygon {
  type Error = GeometryError;

  fn try_from(raw: Value) -> Result<Self, Self::Error> { Self::from_value(raw) }
}

fn into_polygon(polygon: Value) -> Option<Polygon> {
  let Value::Array(rings) = polygon else {
    return None;
  };
  rings
    .into_iter()
    .map(|ring| match ring {
      Value::Array(points) => Some(points),
      _ => None,
    })
    .collect()
}
