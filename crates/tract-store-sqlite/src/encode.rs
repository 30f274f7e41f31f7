//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Dates are stored as `YYYY-MM-DD`. The area of interest is stored as compact
//! JSON. UUIDs are stored as hyphenated lowercase strings.

use chrono::NaiveDate;
use tract_core::{area::AreaOfInterest, date, project::Project};
use uuid::Uuid;

use crate::{Error, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── NaiveDate ───────────────────────────────────────────────────────────────

/// Dates outside four-digit years are refused: their text would not sort in
/// date order under the `check_start_end_date` constraint.
pub fn encode_date(d: NaiveDate) -> Result<String> {
  if !date::is_supported(d) {
    return Err(Error::DateOutOfRange(d));
  }
  Ok(d.format(DATE_FORMAT).to_string())
}

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `projects` row.
pub struct RawProject {
  pub project_id:       String,
  pub name:             String,
  pub description:      Option<String>,
  pub start_date:       String,
  pub end_date:         String,
  pub area_of_interest: String,
}

impl RawProject {
  /// Column order expected by [`RawProject::from_row`].
  pub const COLUMNS: &'static str =
    "project_id, name, description, start_date, end_date, area_of_interest";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      project_id:       row.get(0)?,
      name:             row.get(1)?,
      description:      row.get(2)?,
      start_date:       row.get(3)?,
      end_date:         row.get(4)?,
      area_of_interest: row.get(5)?,
    })
  }

  pub fn into_project(self) -> Result<Project> {
    Ok(Project {
      id:               decode_uuid(&self.project_id)?,
      name:             self.name,
      description:      self.description,
      start_date:       decode_date(&self.start_date)?,
      end_date:         decode_date(&self.end_date)?,
      area_of_interest: AreaOfInterest::from_json(&self.area_of_interest)?,
    })
  }
}
