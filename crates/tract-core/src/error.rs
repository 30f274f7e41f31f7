//! Error types for `tract-core`.

use thiserror::Error;

/// Why a raw `geometry` value was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeometryError {
  #[error("geometry must be a dictionary")]
  NotAnObject,

  #[error("Only 'MultiPolygon' geometry type is allowed")]
  UnsupportedType,

  #[error("geometry must contain a 'coordinates' list")]
  MissingCoordinates,

  #[error(
    "Invalid 'MultiPolygon' structure. Each polygon must contain at least one \
     area with 4+ points."
  )]
  InvalidStructure,
}

/// Malformed or constraint-violating input. The `Display` output is the
/// reason string surfaced to clients.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  /// The payload did not have the expected shape (missing field, wrong type,
  /// unparseable date, invalid JSON).
  #[error("{0}")]
  Malformed(String),

  #[error("name must be between 1 and 32 characters")]
  NameLength,

  #[error("end_date must be after start_date")]
  EndBeforeStart,

  #[error(transparent)]
  Geometry(#[from] GeometryError),
}

/// A persisted-constraint violation reported by a storage backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IntegrityViolation {
  #[error("start_date must not be later than end_date")]
  DateOrder,

  #[error("a project with this name already exists")]
  DuplicateName,

  #[error("name must be between 1 and 32 characters")]
  NameLength,
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("validation error: {0}")]
  Validation(#[from] ValidationError),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
