//! Error type for `tract-store-sqlite`.

use thiserror::Error;
use tract_core::{IntegrityViolation, store::StoreError};

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] tract_core::Error),

  #[error("database error: {0}")]
  Database(#[source] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date parse error: {0}")]
  DateParse(String),

  #[error("date out of storable range: {0}")]
  DateOutOfRange(chrono::NaiveDate),

  /// A write was rejected by one of the table constraints.
  #[error("integrity error: {0}")]
  Integrity(IntegrityViolation),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<tokio_rusqlite::Error> for Error {
  fn from(e: tokio_rusqlite::Error) -> Self {
    match constraint_violation(&e) {
      Some(violation) => Error::Integrity(violation),
      None => Error::Database(e),
    }
  }
}

/// Map a SQLite constraint failure onto the constraint it names.
fn constraint_violation(e: &tokio_rusqlite::Error) -> Option<IntegrityViolation> {
  let tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(
    failure,
    Some(message),
  )) = e
  else {
    return None;
  };

  if failure.code != rusqlite::ErrorCode::ConstraintViolation {
    return None;
  }

  if message.contains("check_start_end_date") {
    Some(IntegrityViolation::DateOrder)
  } else if message.contains("check_name_length") {
    Some(IntegrityViolation::NameLength)
  } else if message.contains("projects.name") {
    Some(IntegrityViolation::DuplicateName)
  } else {
    None
  }
}

impl StoreError for Error {
  fn integrity_violation(&self) -> Option<IntegrityViolation> {
    match self {
      Error::Integrity(violation) => Some(*violation),
      _ => None,
    }
  }
}
